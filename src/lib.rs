pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod extractor;
pub mod pdf;
pub mod publish;
pub mod scanner;
pub mod text;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat, PublishCli};
pub use config::{CliOverrides, Config, ImageConfig, InputConfig, OutputConfig, TextConfig};
pub use error::{QuizSheetError, Result, UserFriendlyError};

// Core functionality re-exports
pub use export::{ExtractionReport, SpreadsheetExporter};
pub use extractor::{Extraction, ExtractionPipeline, ExtractionProgress, QuestionRecord};
pub use pdf::{ImageExtractor, PdfReader};
pub use publish::{Publisher, RepositoryInfo, StepOutcome};
pub use scanner::{DocumentScanner, PdfFile};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for the extraction tool.
pub struct QuizSheet {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl QuizSheet {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_formatter = OutputFormatter::new(
            cli_args.output_format.into(),
            cli_args.verbosity_level(),
            cli_args.quiet,
        );

        Ok(Self {
            config,
            output_formatter,
            progress_manager: ProgressManager::new(cli_args.show_progress()),
        })
    }

    /// Scans the input folder, extracts every question and writes the
    /// spreadsheet. Finding no PDFs, or no questions in them, is not an
    /// error: the report comes back without a spreadsheet path.
    pub fn run_extraction(&self) -> Result<ExtractionReport> {
        let input = &self.config.input.directory;
        let mut warnings = Vec::new();

        self.output_formatter
            .start_operation(&format!("Scanning {} for PDF files", input.display()));
        let files = self.scan_pdfs()?;

        if files.is_empty() {
            let warning = format!("No PDF files found in {}", input.display());
            self.output_formatter.warning(&warning);
            let mut report = ExtractionReport::new(input, None, &self.config.output.sheet_name, &Extraction::empty());
            report.add_warning(warning);
            return Ok(report);
        }

        self.output_formatter
            .info(&format!("Found {} PDF files", files.len()));

        let image_repository = self.resolve_image_repository(&mut warnings);
        let extraction = self.extract_questions(&files, image_repository.as_deref())?;

        for document in &extraction.documents {
            for reason in &document.skipped_images {
                self.output_formatter
                    .debug(&format!("{}: skipped image ({})", document.file_name, reason));
            }
        }

        let spreadsheet_path = if extraction.records.is_empty() {
            let warning = "No questions found; spreadsheet not written".to_string();
            self.output_formatter.warning(&warning);
            warnings.push(warning);
            None
        } else {
            Some(self.export_records(&extraction)?)
        };

        let mut report = ExtractionReport::new(
            input,
            spreadsheet_path.as_deref(),
            &self.config.output.sheet_name,
            &extraction,
        );
        for warning in warnings {
            report.add_warning(warning);
        }

        Ok(report)
    }

    fn scan_pdfs(&self) -> Result<Vec<PdfFile>> {
        let scanner = DocumentScanner::new(&self.config.input.directory);
        let files = scanner.scan()?;

        let stats = scanner.get_statistics(&files);
        self.output_formatter.debug(&stats.display_summary());

        Ok(files)
    }

    /// The configured repository, else the GitHub `origin` of the working
    /// tree holding the input folder. `None` turns image extraction off.
    fn resolve_image_repository(&self, warnings: &mut Vec<String>) -> Option<String> {
        if !self.config.images.enabled {
            return None;
        }

        if let Some(ref repository) = self.config.images.repository {
            return Some(repository.clone());
        }

        let warning = match RepositoryInfo::discover(&self.config.input.directory) {
            Ok(info) => match info.github_id {
                Some(id) => {
                    self.output_formatter
                        .debug(&format!("Image repository from origin: {}", id));
                    return Some(id);
                }
                None => "The origin remote is not a GitHub repository; images will not be extracted. Use --repo to name one.".to_string(),
            },
            Err(e) => format!(
                "{}; images will not be extracted. Use --repo to name the image repository.",
                e.user_message()
            ),
        };

        self.output_formatter.warning(&warning);
        warnings.push(warning);
        None
    }

    fn extract_questions(&self, files: &[PdfFile], image_repository: Option<&str>) -> Result<Extraction> {
        self.output_formatter.start_operation("Extracting questions");

        let mut pipeline = ExtractionPipeline::new(&self.config.text)?;
        if let Some(repository) = image_repository {
            let images = ImageExtractor::new(&self.config, repository);
            self.output_formatter
                .debug(&format!("Saving images to {}", images.directory().display()));
            pipeline = pipeline.with_images(images);
        }

        let reader = PdfReader::new().with_images(pipeline.saves_images());

        let document_progress = self.progress_manager.create_document_progress(files.len() as u64);
        let progress_callback = {
            let pb = document_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_document_progress(&pb, progress);
            }
        };

        let result = pipeline.run(files, &reader, Some(&progress_callback));

        match result {
            Ok(extraction) => {
                ui::progress::finish_progress_with_summary(
                    &document_progress,
                    &format!("Extracted {} questions", extraction.records.len()),
                    extraction.progress.elapsed(),
                );
                Ok(extraction)
            }
            Err(e) => {
                document_progress.abandon();
                Err(e)
            }
        }
    }

    fn export_records(&self, extraction: &Extraction) -> Result<std::path::PathBuf> {
        let path = self.config.spreadsheet_path();
        self.output_formatter
            .start_operation(&format!("Writing {}", path.display()));

        let rows = SpreadsheetExporter::new(&self.config.output).export(&extraction.records, &path)?;
        self.output_formatter
            .debug(&format!("{} rows written to sheet '{}'", rows, self.config.output.sheet_name));

        Ok(path)
    }

    /// Lists what a run would read and where it would write, without
    /// touching the filesystem.
    pub fn dry_run(&self) -> Result<Vec<PdfFile>> {
        let formatter = &self.output_formatter;
        let files = self.scan_pdfs()?;

        formatter.info("DRY RUN MODE - No files will be written");
        formatter.print_separator();

        if formatter.mode() == OutputMode::Json {
            let listing = serde_json::json!({
                "type": "dry_run",
                "input_directory": self.config.input.directory.display().to_string(),
                "spreadsheet": self.config.spreadsheet_path().display().to_string(),
                "sheet_name": self.config.output.sheet_name,
                "images": self.config.images.enabled,
                "files": files.iter().map(|f| f.file_name.clone()).collect::<Vec<_>>(),
            });
            println!("{}", listing);
            return Ok(files);
        }

        formatter.info("Configuration that would be used:");
        println!("  Input directory: {}", self.config.input.directory.display());
        println!("  Spreadsheet: {}", self.config.spreadsheet_path().display());
        println!("  Sheet name: {}", self.config.output.sheet_name);
        println!("  Question marker: {}", self.config.text.question_marker);
        if self.config.images.enabled {
            println!("  Images: {}", self.config.images_path().display());
            println!(
                "  Image repository: {}",
                self.config.images.repository.as_deref().unwrap_or("(from origin remote)")
            );
        } else {
            println!("  Images: disabled");
        }
        formatter.print_separator();

        if files.is_empty() {
            formatter.warning("No PDF files found");
        } else {
            formatter.info(&format!("{} PDF files would be processed:", files.len()));
            for file in &files {
                println!("  {} ({})", file.file_name, file.format_size());
            }
        }

        Ok(files)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &QuizSheetError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
