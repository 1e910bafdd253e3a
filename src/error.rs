use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizSheetError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read PDF {path}: {message}")]
    Pdf { path: String, message: String },

    #[error("Failed to write spreadsheet: {message}")]
    Spreadsheet {
        message: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("Failed to save image {name}: {message}")]
    Image { name: String, message: String },

    #[error("Git operation failed: {message}")]
    Git {
        message: String,
        #[source]
        source: git2::Error,
    },

    #[error("Not a git working tree: {path}")]
    NotARepository { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Invalid repository identifier: {repository}")]
    InvalidRepository { repository: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for QuizSheetError {
    fn user_message(&self) -> String {
        match self {
            QuizSheetError::Pdf { path, message } => {
                format!("Could not read PDF {}: {}", path, message)
            }
            QuizSheetError::Spreadsheet { message, .. } => {
                format!("Could not write the spreadsheet: {}", message)
            }
            QuizSheetError::Image { name, message } => {
                format!("Could not save image {}: {}", name, message)
            }
            QuizSheetError::Git { message, .. } => {
                format!("Git operation failed: {}", message)
            }
            QuizSheetError::NotARepository { path } => {
                format!("{} is not inside a git working tree", path)
            }
            QuizSheetError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            QuizSheetError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            QuizSheetError::InvalidRepository { repository } => {
                format!("Invalid repository identifier: {}", repository)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            QuizSheetError::Pdf { .. } => Some(
                "Check that the file is a valid, unencrypted PDF. Remove it from the folder to process the others.".to_string()
            ),
            QuizSheetError::Spreadsheet { .. } => Some(
                "Close the spreadsheet if it is open in another program and make sure the output directory is writable.".to_string()
            ),
            QuizSheetError::Image { .. } => Some(
                "Ensure the images directory is writable, or run with --no-images.".to_string()
            ),
            QuizSheetError::NotARepository { .. } => Some(
                "Run the command inside a git working tree, or initialise one with `git init`.".to_string()
            ),
            QuizSheetError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            QuizSheetError::InvalidPath { .. } => Some(
                "Make sure the input directory exists and is readable.".to_string()
            ),
            QuizSheetError::InvalidRepository { .. } => Some(
                "Use the owner/name form, e.g. --repo octocat/quiz-images.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<git2::Error> for QuizSheetError {
    fn from(error: git2::Error) -> Self {
        QuizSheetError::Git {
            message: error.message().to_string(),
            source: error,
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for QuizSheetError {
    fn from(error: rust_xlsxwriter::XlsxError) -> Self {
        QuizSheetError::Spreadsheet {
            message: error.to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizSheetError>;
