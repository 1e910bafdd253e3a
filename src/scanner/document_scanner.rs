use crate::error::{QuizSheetError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PdfFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl PdfFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            size,
        }
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Lists the PDFs sitting directly in one directory.
pub struct DocumentScanner {
    root: PathBuf,
}

impl DocumentScanner {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    }

    /// Files with a `.pdf` extension (any case), not recursing, sorted by
    /// file name. An empty list is not an error.
    pub fn scan(&self) -> Result<Vec<PdfFile>> {
        if !self.root.is_dir() {
            return Err(QuizSheetError::InvalidPath {
                path: self.root.display().to_string(),
            });
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => QuizSheetError::Io(io),
                None => QuizSheetError::InvalidPath {
                    path: self.root.display().to_string(),
                },
            })?;

            if !entry.file_type().is_file() || !Self::is_pdf(entry.path()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            files.push(PdfFile::new(entry.path().to_path_buf(), size));
        }

        Ok(files)
    }

    pub fn get_statistics(&self, files: &[PdfFile]) -> ScanStatistics {
        let (largest_file_size, largest_file_name) = files
            .iter()
            .max_by_key(|f| f.size)
            .map(|f| (f.size, f.file_name.clone()))
            .unwrap_or_default();

        ScanStatistics {
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            largest_file_size,
            largest_file_name,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub largest_file_size: u64,
    pub largest_file_name: String,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  PDF files: {}\n  Total size: {}\n",
            self.total_files,
            format_bytes(self.total_size)
        );

        if self.largest_file_size > 0 {
            summary.push_str(&format!(
                "  Largest file: {} ({})\n",
                self.largest_file_name,
                format_bytes(self.largest_file_size)
            ));
        }

        summary
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_finds_pdfs_case_insensitively_in_name_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("b_dong_luong.pdf"), b"%PDF").unwrap();
        fs::write(root.join("a_luc.PDF"), b"%PDF").unwrap();
        fs::write(root.join("notes.txt"), b"text").unwrap();
        fs::write(root.join("pdf"), b"no extension").unwrap();

        let files = DocumentScanner::new(root).scan().unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["a_luc.PDF", "b_dong_luong.pdf"]);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("archive")).unwrap();
        fs::write(root.join("archive").join("old.pdf"), b"%PDF").unwrap();
        fs::create_dir(root.join("folder.pdf")).unwrap();

        let files = DocumentScanner::new(root).scan().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_directory_is_invalid_path() {
        let result = DocumentScanner::new("/definitely/not/a/dir").scan();
        assert!(matches!(result, Err(QuizSheetError::InvalidPath { .. })));
    }

    #[test]
    fn test_scan_statistics() {
        let files = vec![
            PdfFile::new(PathBuf::from("a.pdf"), 100),
            PdfFile::new(PathBuf::from("b.pdf"), 2048),
        ];

        let stats = DocumentScanner::new(".").get_statistics(&files);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_size, 2148);
        assert_eq!(stats.largest_file_name, "b.pdf");
        assert!(stats.display_summary().contains("2.0 KB"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
    }
}
