pub mod pipeline;

pub use pipeline::{DocumentSummary, Extraction, ExtractionPipeline, ExtractionProgress, QuestionRecord};
