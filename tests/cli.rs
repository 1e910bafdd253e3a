use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn quizsheet() -> Command {
    Command::cargo_bin("quizsheet").unwrap()
}

fn publish() -> Command {
    Command::cargo_bin("quizsheet-publish").unwrap()
}

/// One page, one text object per line.
fn write_pdf(path: &Path, lines: &[&str]) {
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut operations = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let y = 780 - (index as i64) * 20;
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![40.into(), y.into()]),
            Operation::new("Tj", vec![Object::string_literal(*line)]),
            Operation::new("ET", vec![]),
        ]);
    }

    let content_id = pdf.add_object(Stream::new(
        dictionary! {},
        Content { operations }.encode().unwrap(),
    ));
    let page_id = pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });

    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    pdf.save(path).unwrap();
}

#[test]
fn test_empty_folder_succeeds_without_output() {
    let temp_dir = TempDir::new().unwrap();

    quizsheet()
        .arg(temp_dir.path())
        .arg("--no-images")
        .assert()
        .success()
        .stdout(predicate::str::contains("No PDF files found"));

    assert!(!temp_dir.path().join("tracnghiem_tonghop.xlsx").exists());
}

#[test]
fn test_missing_folder_fails() {
    let temp_dir = TempDir::new().unwrap();

    quizsheet()
        .arg(temp_dir.path().join("does-not-exist"))
        .arg("--no-images")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));
}

#[test]
fn test_invalid_repository_flag_is_rejected() {
    quizsheet()
        .args(["--repo", "https://github.com/octocat/quiz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner/name"));
}

#[test]
fn test_generate_config_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("quizsheet.toml");

    quizsheet()
        .arg("--generate-config")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated sample configuration file"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("sheet_name = \"tracnghiem\""));
}

#[test]
fn test_dry_run_lists_pdfs() {
    let temp_dir = TempDir::new().unwrap();
    write_pdf(&temp_dir.path().join("bai1.pdf"), &["Question 1: unused"]);

    quizsheet()
        .arg(temp_dir.path())
        .args(["--dry-run", "--no-images"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bai1.pdf"))
        .stdout(predicate::str::contains("Images: disabled"));

    assert!(!temp_dir.path().join("tracnghiem_tonghop.xlsx").exists());
}

#[test]
fn test_extracts_questions_into_spreadsheet() {
    let temp_dir = TempDir::new().unwrap();
    let folder = temp_dir.path().join("pdfs");
    std::fs::create_dir(&folder).unwrap();
    write_pdf(
        &folder.join("lesson1.pdf"),
        &[
            "Lesson 1: Forces",
            "Question 1: What is 2+2? A. 3 B. 4 C. 5 D. 6",
            "Question 2: Which one is a vector? A. speed B. velocity",
        ],
    );

    let config_path = temp_dir.path().join("quizsheet.toml");
    std::fs::write(
        &config_path,
        "[text]\nquestion_marker = \"Question\"\nlesson_keywords = [\"lesson\"]\n",
    )
    .unwrap();

    let output = temp_dir.path().join("out.xlsx");
    let report = temp_dir.path().join("report.json");

    quizsheet()
        .arg(&folder)
        .arg("--config")
        .arg(&config_path)
        .arg("--output")
        .arg(&output)
        .arg("--report")
        .arg(&report)
        .args(["--no-images", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Questions: 2"));

    assert_eq!(&std::fs::read(&output).unwrap()[..2], b"PK");

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_questions"], 2);
    assert_eq!(json["documents"][0]["file_name"], "lesson1.pdf");
}

#[test]
fn test_publish_dry_run_lists_git_commands() {
    let temp_dir = TempDir::new().unwrap();

    publish()
        .arg(temp_dir.path())
        .args(["--dry-run", "--message", "cap nhat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git add ."))
        .stdout(predicate::str::contains("git commit -m \"cap nhat ("))
        .stdout(predicate::str::contains("git push"));
}

#[test]
fn test_publish_reports_failures_and_exits_zero() {
    // Not a git repository: every git step fails, the tool still finishes.
    let temp_dir = TempDir::new().unwrap();
    if git2::Repository::discover(temp_dir.path()).is_ok() {
        return;
    }

    publish()
        .arg(temp_dir.path())
        .args(["--output-format", "plain"])
        .assert()
        .success()
        .stderr(predicate::str::contains("ERROR: stage failed"));
}
