pub mod images;
pub mod reader;

pub use images::{EmbeddedImage, ImageExtractor};
pub use reader::{Document, Page, PdfReader};
