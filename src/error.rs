use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValSplitError {
    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to parse JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid record structure in {}: {message}", .path.display())]
    Structure { path: PathBuf, message: String },

    #[error("Operation was cancelled by user")]
    Cancelled,

    #[error("Failed to write {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ValSplitError {
    pub fn structure<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        ValSplitError::Structure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValSplitError::FileNotFound { .. } => 2,
            ValSplitError::Parse { .. } => 3,
            ValSplitError::Structure { .. } => 4,
            ValSplitError::Export { .. } => 5,
            ValSplitError::Config { .. } => 6,
            ValSplitError::Cancelled => 130,
            ValSplitError::Io(_) => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ValSplitError {
    fn user_message(&self) -> String {
        match self {
            ValSplitError::FileNotFound { path } => {
                format!("File not found: {}", path.display())
            }
            ValSplitError::Parse { path, source } => {
                format!(
                    "{} is not valid JSON (line {}, column {})",
                    path.display(),
                    source.line(),
                    source.column()
                )
            }
            ValSplitError::Structure { message, .. } => {
                format!("Unexpected file structure: {}", message)
            }
            ValSplitError::Cancelled => "Operation was cancelled by user".to_string(),
            ValSplitError::Export { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            ValSplitError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ValSplitError::Io(_) => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ValSplitError::FileNotFound { .. } => Some(
                "Check the path and try again. Paths containing spaces must be quoted.".to_string()
            ),
            ValSplitError::Parse { .. } => Some(
                "Make sure the file is a JSON export (a single object or an array of objects).".to_string()
            ),
            ValSplitError::Structure { .. } => Some(
                "Each record needs an identifier field. Use --id-field if your export names it differently.".to_string()
            ),
            ValSplitError::Export { .. } => Some(
                "Ensure the target directory is writable and has free space, or choose another location with --output-dir.".to_string()
            ),
            ValSplitError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValSplitError>;
