use crate::error::{QuizSheetError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Characters Excel refuses in worksheet names.
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub text: TextConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Spreadsheet path; relative paths resolve against the input directory.
    pub spreadsheet: PathBuf,
    pub sheet_name: String,
    pub question_column_width: f64,
    pub title_column_width: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TextConfig {
    pub lesson_keywords: Vec<String>,
    pub noise_words: Vec<String>,
    pub fallback_boilerplate: Vec<String>,
    pub question_marker: String,
    pub min_block_chars: usize,
    /// Keep the text that precedes a page's first question marker.
    pub keep_preamble: bool,
    pub title_seed_chars: usize,
    pub min_title_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImageConfig {
    pub enabled: bool,
    /// Directory name under the input directory, also used in the raw URL.
    pub directory: String,
    /// `owner/name` on GitHub. Derived from the `origin` remote when unset.
    pub repository: Option<String>,
    pub branch: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            spreadsheet: PathBuf::from("tracnghiem_tonghop.xlsx"),
            sheet_name: "tracnghiem".to_string(),
            question_column_width: 80.0,
            title_column_width: 30.0,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            lesson_keywords: vec![
                "bài".to_string(),
                "dạng".to_string(),
                "bổ trợ".to_string(),
            ],
            noise_words: vec![
                "vật lý".to_string(),
                "physics".to_string(),
                "đề".to_string(),
                "trắc nghiệm".to_string(),
                "đúng sai".to_string(),
            ],
            fallback_boilerplate: vec!["(đề)".to_string(), ".pdf".to_string()],
            question_marker: "Câu".to_string(),
            min_block_chars: 10,
            keep_preamble: false,
            title_seed_chars: 100,
            min_title_chars: 3,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: "images".to_string(),
            repository: None,
            branch: "main".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(QuizSheetError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| QuizSheetError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| QuizSheetError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["quizsheet.toml", ".quizsheet.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref directory) = cli_args.directory {
            self.input.directory = directory.clone();
        }

        if let Some(ref spreadsheet) = cli_args.spreadsheet {
            self.output.spreadsheet = spreadsheet.clone();
        }

        if let Some(ref sheet_name) = cli_args.sheet_name {
            self.output.sheet_name = sheet_name.clone();
        }

        if let Some(ref repository) = cli_args.repository {
            self.images.repository = Some(repository.clone());
        }

        if cli_args.no_images {
            self.images.enabled = false;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| QuizSheetError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| QuizSheetError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.text.lesson_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(QuizSheetError::Config {
                message: "At least one lesson keyword must be specified".to_string(),
            });
        }

        if self.text.question_marker.trim().is_empty() {
            return Err(QuizSheetError::Config {
                message: "Question marker must not be empty".to_string(),
            });
        }

        if self.text.min_block_chars == 0 || self.text.title_seed_chars == 0 {
            return Err(QuizSheetError::Config {
                message: "Block and title thresholds must be greater than 0".to_string(),
            });
        }

        let sheet_name = &self.output.sheet_name;
        if sheet_name.trim().is_empty() || sheet_name.chars().count() > 31 {
            return Err(QuizSheetError::Config {
                message: format!("Sheet name must be 1 to 31 characters: '{}'", sheet_name),
            });
        }

        if sheet_name.contains(INVALID_SHEET_CHARS) {
            return Err(QuizSheetError::Config {
                message: format!("Sheet name contains invalid characters: '{}'", sheet_name),
            });
        }

        if self.images.directory.trim().is_empty() || self.images.branch.trim().is_empty() {
            return Err(QuizSheetError::Config {
                message: "Image directory and branch must not be empty".to_string(),
            });
        }

        if let Some(ref repository) = self.images.repository {
            validate_repository_id(repository)?;
        }

        Ok(())
    }

    /// Absolute-or-relative spreadsheet location, anchored at the input directory.
    pub fn spreadsheet_path(&self) -> PathBuf {
        if self.output.spreadsheet.is_absolute() {
            self.output.spreadsheet.clone()
        } else {
            self.input.directory.join(&self.output.spreadsheet)
        }
    }

    pub fn images_path(&self) -> PathBuf {
        self.input.directory.join(&self.images.directory)
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

/// Accepts `owner/name` with GitHub's allowed characters.
pub fn validate_repository_id(repository: &str) -> Result<()> {
    let invalid = || QuizSheetError::InvalidRepository {
        repository: repository.to_string(),
    };

    let (owner, name) = repository.split_once('/').ok_or_else(invalid)?;

    let valid_chars = |s: &str| {
        !s.is_empty()
            && !s.starts_with('.')
            && s.len() <= 100
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    };

    if !valid_chars(owner) || !valid_chars(name) {
        return Err(invalid());
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub spreadsheet: Option<PathBuf>,
    pub sheet_name: Option<String>,
    pub repository: Option<String>,
    pub no_images: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directory(mut self, directory: Option<PathBuf>) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_spreadsheet(mut self, spreadsheet: Option<PathBuf>) -> Self {
        self.spreadsheet = spreadsheet;
        self
    }

    pub fn with_sheet_name(mut self, sheet_name: Option<String>) -> Self {
        self.sheet_name = sheet_name;
        self
    }

    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_no_images(mut self, no_images: bool) -> Self {
        self.no_images = no_images;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output.sheet_name, "tracnghiem");
        assert_eq!(config.text.min_block_chars, 10);
        assert_eq!(config.images.branch, "main");
        assert!(config.text.lesson_keywords.contains(&"bài".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.text.lesson_keywords.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.sheet_name = "bad/name".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.output.sheet_name = "x".repeat(32);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.images.repository = Some("no-slash".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let mut config = Config::default();
        config.images.repository = Some("octocat/quiz".to_string());
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.images.repository.as_deref(), Some("octocat/quiz"));
        assert_eq!(loaded.text.noise_words, config.text.noise_words);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[output]\nsheet_name = \"lop11\"").unwrap();

        let loaded = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.output.sheet_name, "lop11");
        assert_eq!(loaded.output.spreadsheet, PathBuf::from("tracnghiem_tonghop.xlsx"));
        assert!(loaded.images.enabled);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(QuizSheetError::Config { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = Config::default();

        let overrides = CliOverrides::new()
            .with_directory(Some(PathBuf::from("/tmp/quizzes")))
            .with_sheet_name(Some("lop10".to_string()))
            .with_repository(Some("octocat/quiz".to_string()))
            .with_no_images(true);

        config.merge_with_cli_args(&overrides);

        assert_eq!(config.input.directory, PathBuf::from("/tmp/quizzes"));
        assert_eq!(config.output.sheet_name, "lop10");
        assert_eq!(config.images.repository.as_deref(), Some("octocat/quiz"));
        assert!(!config.images.enabled);
    }

    #[test]
    fn test_spreadsheet_path_resolution() {
        let mut config = Config::default();
        config.input.directory = PathBuf::from("/data/pdfs");
        assert_eq!(
            config.spreadsheet_path(),
            PathBuf::from("/data/pdfs/tracnghiem_tonghop.xlsx")
        );

        config.output.spreadsheet = PathBuf::from("/out/all.xlsx");
        assert_eq!(config.spreadsheet_path(), PathBuf::from("/out/all.xlsx"));
        assert_eq!(config.images_path(), PathBuf::from("/data/pdfs/images"));
    }

    #[test]
    fn test_repository_id_validation() {
        assert!(validate_repository_id("octocat/quiz-images").is_ok());
        assert!(validate_repository_id("octo.cat/quiz_images").is_ok());
        assert!(validate_repository_id("octocat").is_err());
        assert!(validate_repository_id("/quiz").is_err());
        assert!(validate_repository_id("octocat/.hidden").is_err());
        assert!(validate_repository_id("octo cat/quiz").is_err());
    }

    #[test]
    fn test_sample_config_generation() {
        let sample = Config::create_sample_config();
        assert!(sample.contains("[input]"));
        assert!(sample.contains("[output]"));
        assert!(sample.contains("[text]"));
        assert!(sample.contains("[images]"));
    }
}
