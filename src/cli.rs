use crate::config::{validate_repository_id, CliOverrides, Config};
use crate::error::Result;
use crate::publish::DEFAULT_MESSAGE_PREFIX;
use crate::ui::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quizsheet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract quiz questions from a folder of PDFs into a spreadsheet")]
#[command(
    long_about = "QuizSheet reads every PDF in a folder, splits each page into numbered \
                  questions, lays out the answer choices one per line and writes one \
                  spreadsheet row per question together with the lesson title."
)]
#[command(before_help = "📝 QuizSheet - PDF Quiz Extraction Tool")]
#[command(after_help = "EXAMPLES:\n  \
    quizsheet\n  \
    quizsheet ./de-thi --output tonghop.xlsx\n  \
    quizsheet ./de-thi --repo octocat/quiz-images --verbose\n  \
    quizsheet ./de-thi --no-images --dry-run\n  \
    quizsheet --generate-config")]
pub struct Cli {
    /// Folder containing the PDF files (defaults to the configured input directory)
    pub directory: Option<PathBuf>,

    /// Spreadsheet file to write
    #[arg(short, long, help = "Spreadsheet path (default: tracnghiem_tonghop.xlsx in DIR)")]
    pub output: Option<PathBuf>,

    /// Worksheet name
    #[arg(long)]
    pub sheet_name: Option<String>,

    /// GitHub repository hosting the extracted images
    #[arg(long, value_parser = validate_repository_arg, help = "Image host repository as owner/name")]
    pub repo: Option<String>,

    /// Skip image extraction
    #[arg(long)]
    pub no_images: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Write the extraction report as JSON
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (list the PDFs without writing anything)
    #[arg(long, help = "Show what would be extracted without actually doing it")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Parser, Debug)]
#[command(name = "quizsheet-publish")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Stage, commit and push the working tree with a timestamped message")]
#[command(after_help = "EXAMPLES:\n  \
    quizsheet-publish\n  \
    quizsheet-publish ./de-thi --message \"cap nhat de\"\n  \
    quizsheet-publish --dry-run")]
pub struct PublishCli {
    /// Working tree to publish
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Commit message prefix; the local timestamp is appended
    #[arg(short, long, default_value = DEFAULT_MESSAGE_PREFIX)]
    pub message: String,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the git commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl From<OutputFormat> for OutputMode {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        // An explicit output path is taken relative to the current directory,
        // not to the input folder.
        let spreadsheet = self.output.as_ref().map(|o| {
            if o.is_absolute() {
                o.clone()
            } else {
                std::env::current_dir().unwrap_or_default().join(o)
            }
        });

        CliOverrides::new()
            .with_directory(self.directory.clone())
            .with_spreadsheet(spreadsheet)
            .with_sheet_name(self.sheet_name.clone())
            .with_repository(self.repo.clone())
            .with_no_images(self.no_images)
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

impl PublishCli {
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn validate_repository_arg(s: &str) -> std::result::Result<String, String> {
    let trimmed = s.trim();
    validate_repository_id(trimmed)
        .map(|_| trimmed.to_string())
        .map_err(|_| {
            "Repository must be owner/name using letters, digits, '-', '_' or '.' (e.g. octocat/quiz-images)"
                .to_string()
        })
}
