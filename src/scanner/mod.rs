pub mod document_scanner;

pub use document_scanner::{DocumentScanner, PdfFile, ScanStatistics};
