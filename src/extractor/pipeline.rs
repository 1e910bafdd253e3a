use crate::config::TextConfig;
use crate::error::Result;
use crate::pdf::{Document, ImageExtractor, PdfReader};
use crate::scanner::PdfFile;
use crate::text::{PageSplitter, QuestionFormatter, TitleExtractor};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub file_name: String,
    pub title: String,
    pub pages: usize,
    pub questions: usize,
    pub images: usize,
    pub skipped_images: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub documents_processed: usize,
    pub total_documents: usize,
    pub questions_found: usize,
    pub current_document: Option<String>,
    pub start_time: Instant,
}

impl ExtractionProgress {
    pub fn new(total_documents: usize) -> Self {
        Self {
            documents_processed: 0,
            total_documents,
            questions_found: 0,
            current_document: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_document(&mut self, file_name: String, questions: usize) {
        self.documents_processed += 1;
        self.questions_found += questions;
        self.current_document = Some(file_name);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_documents == 0 {
            0.0
        } else {
            (self.documents_processed as f64 / self.total_documents as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Everything one run pulled out of the input folder.
#[derive(Debug)]
pub struct Extraction {
    pub records: Vec<QuestionRecord>,
    pub documents: Vec<DocumentSummary>,
    pub progress: ExtractionProgress,
}

impl Extraction {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            documents: Vec::new(),
            progress: ExtractionProgress::new(0),
        }
    }
}

/// Title, split and format stages applied to each document in turn.
pub struct ExtractionPipeline {
    titles: TitleExtractor,
    splitter: PageSplitter,
    formatter: QuestionFormatter,
    images: Option<ImageExtractor>,
}

impl ExtractionPipeline {
    pub fn new(config: &TextConfig) -> Result<Self> {
        Ok(Self {
            titles: TitleExtractor::new(config)?,
            splitter: PageSplitter::new(config)?,
            formatter: QuestionFormatter::new()?,
            images: None,
        })
    }

    pub fn with_images(mut self, images: ImageExtractor) -> Self {
        self.images = Some(images);
        self
    }

    pub fn saves_images(&self) -> bool {
        self.images.is_some()
    }

    /// Opens each file in order and collects its records. The first unreadable
    /// file aborts the run.
    pub fn run(
        &self,
        files: &[PdfFile],
        reader: &PdfReader,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<Extraction> {
        let mut progress = ExtractionProgress::new(files.len());
        let mut records = Vec::new();
        let mut documents = Vec::with_capacity(files.len());

        if let Some(ref images) = self.images {
            images.prepare()?;
        }

        for file in files {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let document = reader.open(&file.path)?;
            let (document_records, summary) = self.process_document(&document)?;

            progress.update_document(file.file_name.clone(), document_records.len());
            records.extend(document_records);
            documents.push(summary);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(Extraction {
            records,
            documents,
            progress,
        })
    }

    /// Records for one document in page order, then split order.
    ///
    /// Text ahead of the first marker on the first page is the page header.
    /// On later pages it finishes the previous page's last question and is
    /// appended to that block before formatting.
    pub fn process_document(&self, document: &Document) -> Result<(Vec<QuestionRecord>, DocumentSummary)> {
        let title = self
            .titles
            .extract(document.first_page_text(), &document.file_name);

        // Raw block text and the image markup of the page it started on.
        let mut blocks: Vec<(String, String)> = Vec::new();
        let mut image_count = 0;
        let mut skipped_images = Vec::new();

        for (index, page) in document.pages.iter().enumerate() {
            let markup = match self.images {
                Some(ref images) => {
                    let names = images.save_page_images(&document.stem, page)?;
                    image_count += names.len();
                    images.markup(&names)
                }
                None => String::new(),
            };

            skipped_images.extend(
                page.skipped_images
                    .iter()
                    .map(|reason| format!("page {}: {}", page.number, reason)),
            );

            if index > 0 {
                if let Some(tail) = self.splitter.continuation(&page.text) {
                    match blocks.last_mut() {
                        Some((raw, _)) => {
                            raw.push('\n');
                            raw.push_str(tail);
                        }
                        None => blocks.push((tail.to_string(), markup.clone())),
                    }
                }
            }

            for block in self.splitter.split(&page.text) {
                blocks.push((block.to_string(), markup.clone()));
            }
        }

        let records: Vec<QuestionRecord> = blocks
            .into_iter()
            .map(|(raw, markup)| {
                let formatted = self.formatter.format(&raw);
                let question = if markup.is_empty() {
                    formatted
                } else {
                    format!("{}\n{}", markup, formatted)
                };

                QuestionRecord {
                    question,
                    title: title.clone(),
                }
            })
            .collect();

        let summary = DocumentSummary {
            file_name: document.file_name.clone(),
            title,
            pages: document.pages.len(),
            questions: records.len(),
            images: image_count,
            skipped_images,
        };

        Ok((records, summary))
    }
}
