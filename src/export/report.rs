use crate::error::{QuizSheetError, Result};
use crate::extractor::{DocumentSummary, Extraction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub input_directory: String,
    /// `None` when nothing was written.
    pub spreadsheet: Option<String>,
    pub sheet_name: String,
    pub documents: Vec<DocumentSummary>,
    pub summary: ExtractionSummary,
    pub extraction_time: DateTime<Utc>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total_documents: usize,
    pub total_pages: usize,
    pub total_questions: usize,
    pub total_images: usize,
    pub skipped_images: usize,
    pub extraction_duration: Duration,
}

impl ExtractionReport {
    pub fn new(
        input_directory: &Path,
        spreadsheet: Option<&Path>,
        sheet_name: &str,
        extraction: &Extraction,
    ) -> Self {
        let documents = extraction.documents.clone();

        let summary = ExtractionSummary {
            total_documents: documents.len(),
            total_pages: documents.iter().map(|d| d.pages).sum(),
            total_questions: extraction.records.len(),
            total_images: documents.iter().map(|d| d.images).sum(),
            skipped_images: documents.iter().map(|d| d.skipped_images.len()).sum(),
            extraction_duration: extraction.progress.elapsed(),
        };

        Self {
            input_directory: input_directory.display().to_string(),
            spreadsheet: spreadsheet.map(|p| p.display().to_string()),
            sheet_name: sheet_name.to_string(),
            documents,
            summary,
            extraction_time: Utc::now(),
            warnings: Vec::new(),
        }
    }

    pub fn add_warning<S: Into<String>>(&mut self, warning: S) {
        self.warnings.push(warning.into());
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total_questions == 0
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuizSheetError::Config {
            message: format!("Failed to serialize report to JSON: {}", e),
        })
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_text(&self) -> String {
        let mut text = String::new();

        text.push_str("QuizSheet Extraction Report\n");
        text.push_str("===========================\n\n");
        text.push_str(&format!("Input directory: {}\n", self.input_directory));
        match self.spreadsheet {
            Some(ref path) => text.push_str(&format!("Spreadsheet: {} (sheet '{}')\n", path, self.sheet_name)),
            None => text.push_str("Spreadsheet: not written\n"),
        }
        text.push_str(&format!(
            "Extracted at: {}\n",
            self.extraction_time.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        text.push_str(&format!("Duration: {:?}\n\n", self.summary.extraction_duration));

        text.push_str(&format!(
            "Documents: {}  Pages: {}  Questions: {}  Images: {}\n",
            self.summary.total_documents,
            self.summary.total_pages,
            self.summary.total_questions,
            self.summary.total_images
        ));

        if !self.documents.is_empty() {
            text.push_str("\nDocuments:\n");
            for document in &self.documents {
                text.push_str(&format!(
                    "  {} -> {} ({} questions, {} images)\n",
                    document.file_name, document.title, document.questions, document.images
                ));
            }
        }

        if !self.warnings.is_empty() {
            text.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                text.push_str(&format!("  - {}\n", warning));
            }
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{ExtractionProgress, QuestionRecord};
    use tempfile::TempDir;

    fn extraction() -> Extraction {
        Extraction {
            records: vec![
                QuestionRecord {
                    question: "Câu 1: a".to_string(),
                    title: "Lực".to_string(),
                },
                QuestionRecord {
                    question: "Câu 2: b".to_string(),
                    title: "Lực".to_string(),
                },
            ],
            documents: vec![DocumentSummary {
                file_name: "luc.pdf".to_string(),
                title: "Lực".to_string(),
                pages: 3,
                questions: 2,
                images: 1,
                skipped_images: vec!["page 2: Im2: 16 bits per component".to_string()],
            }],
            progress: ExtractionProgress::new(1),
        }
    }

    #[test]
    fn test_report_totals() {
        let report = ExtractionReport::new(
            Path::new("/data"),
            Some(Path::new("/data/out.xlsx")),
            "tracnghiem",
            &extraction(),
        );

        assert_eq!(report.summary.total_documents, 1);
        assert_eq!(report.summary.total_pages, 3);
        assert_eq!(report.summary.total_questions, 2);
        assert_eq!(report.summary.total_images, 1);
        assert_eq!(report.summary.skipped_images, 1);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_report_text_and_json() {
        let mut report = ExtractionReport::new(Path::new("."), None, "tracnghiem", &extraction());
        report.add_warning("images disabled");

        let text = report.to_text();
        assert!(text.contains("Spreadsheet: not written"));
        assert!(text.contains("luc.pdf -> Lực"));
        assert!(text.contains("images disabled"));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.json");
        report.save_json(&path).unwrap();

        let loaded: ExtractionReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.summary.total_questions, 2);
        assert_eq!(loaded.documents[0].title, "Lực");
    }
}
