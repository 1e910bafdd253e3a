use crate::error::{QuizSheetError, Result};
use crate::pdf::images::{decode_image_stream, EmbeddedImage};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// One input PDF, fully read into memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: String,
    pub stem: String,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map_or("", |page| page.text.as_str())
    }

    pub fn image_count(&self) -> usize {
        self.pages.iter().map(|page| page.images.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based.
    pub number: u32,
    /// NFC-normalized text as laid out by the PDF content stream.
    pub text: String,
    pub images: Vec<EmbeddedImage>,
    /// Why each undecodable image on the page was left out.
    pub skipped_images: Vec<String>,
}

pub struct PdfReader {
    load_images: bool,
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReader {
    pub fn new() -> Self {
        Self { load_images: true }
    }

    pub fn with_images(mut self, load_images: bool) -> Self {
        self.load_images = load_images;
        self
    }

    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let path = path.as_ref();
        let pdf = LopdfDocument::load(path).map_err(|e| pdf_error(path, e))?;
        self.read(&pdf, path)
    }

    /// Reads every page of an already parsed PDF, in page order.
    pub fn read(&self, pdf: &LopdfDocument, path: &Path) -> Result<Document> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());

        let mut pages = Vec::new();

        for (number, page_id) in pdf.get_pages() {
            let text = pdf
                .extract_text(&[number])
                .map_err(|e| QuizSheetError::Pdf {
                    path: path.display().to_string(),
                    message: format!("page {}: {}", number, e),
                })?
                .nfc()
                .collect::<String>();

            let (images, skipped_images) = if self.load_images {
                self.page_images(pdf, page_id)
            } else {
                (Vec::new(), Vec::new())
            };

            pages.push(Page {
                number,
                text,
                images,
                skipped_images,
            });
        }

        Ok(Document {
            file_name,
            stem,
            pages,
        })
    }

    fn page_images(&self, pdf: &LopdfDocument, page_id: ObjectId) -> (Vec<EmbeddedImage>, Vec<String>) {
        let mut images = Vec::new();
        let mut skipped = Vec::new();

        let xobjects = match page_xobjects(pdf, page_id) {
            Ok(Some(xobjects)) => xobjects,
            Ok(None) => return (images, skipped),
            Err(e) => {
                skipped.push(format!("cannot resolve page resources: {}", e));
                return (images, skipped);
            }
        };

        for (name, object) in xobjects.iter() {
            let Ok(object_id) = object.as_reference() else {
                continue;
            };
            let Ok(stream) = pdf.get_object(object_id).and_then(Object::as_stream) else {
                continue;
            };

            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name_str)
                .is_ok_and(|subtype| subtype == "Image");
            if !is_image {
                continue;
            }

            match decode_image_stream(pdf, stream) {
                Ok(image) => images.push(image),
                Err(reason) => skipped.push(format!("{}: {}", String::from_utf8_lossy(name), reason)),
            }
        }

        (images, skipped)
    }
}

fn resolve_dictionary<'a>(pdf: &'a LopdfDocument, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => pdf.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// The nearest `XObject` table, looking at the page first and then at the
/// resources it inherits from its `Pages` ancestors.
fn page_xobjects(pdf: &LopdfDocument, page_id: ObjectId) -> lopdf::Result<Option<&Dictionary>> {
    let (inline, inherited) = pdf.get_page_resources(page_id)?;

    let xobjects = inline
        .into_iter()
        .chain(inherited.into_iter().filter_map(|id| pdf.get_dictionary(id).ok()))
        .find_map(|resources| resolve_dictionary(pdf, resources.get(b"XObject").ok()?));

    Ok(xobjects)
}

fn pdf_error(path: &Path, error: lopdf::Error) -> QuizSheetError {
    QuizSheetError::Pdf {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
