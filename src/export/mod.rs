pub mod report;
pub mod spreadsheet;

pub use report::ExtractionReport;
pub use spreadsheet::SpreadsheetExporter;
