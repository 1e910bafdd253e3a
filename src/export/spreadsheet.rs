use crate::config::OutputConfig;
use crate::error::Result;
use crate::extractor::QuestionRecord;
use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook, XlsxError};
use std::path::Path;

pub const QUESTION_HEADER: &str = "Question";
pub const TITLE_HEADER: &str = "Lesson Title";

const QUESTION_COLUMN: ColNum = 0;
// Column B stays empty.
const TITLE_COLUMN: ColNum = 2;

/// Writes question records to a single-sheet workbook.
pub struct SpreadsheetExporter {
    sheet_name: String,
    question_column_width: f64,
    title_column_width: f64,
}

impl SpreadsheetExporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            question_column_width: config.question_column_width,
            title_column_width: config.title_column_width,
        }
    }

    /// Overwrites `path`. Returns the number of data rows written.
    pub fn export<P: AsRef<Path>>(&self, records: &[QuestionRecord], path: P) -> Result<usize> {
        let mut workbook = self.build_workbook(records)?;
        workbook.save(path.as_ref())?;
        Ok(records.len())
    }

    pub fn to_buffer(&self, records: &[QuestionRecord]) -> Result<Vec<u8>> {
        let mut workbook = self.build_workbook(records)?;
        Ok(workbook.save_to_buffer()?)
    }

    fn build_workbook(&self, records: &[QuestionRecord]) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let cell_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;
        worksheet.set_column_width(QUESTION_COLUMN, self.question_column_width)?;
        worksheet.set_column_width(TITLE_COLUMN, self.title_column_width)?;

        worksheet.write_string(0, QUESTION_COLUMN, QUESTION_HEADER)?;
        worksheet.write_string(0, TITLE_COLUMN, TITLE_HEADER)?;

        for (index, record) in records.iter().enumerate() {
            let row = RowNum::try_from(index + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            worksheet.write_string_with_format(row, QUESTION_COLUMN, &record.question, &cell_format)?;
            worksheet.write_string_with_format(row, TITLE_COLUMN, &record.title, &cell_format)?;
        }

        Ok(workbook)
    }
}
