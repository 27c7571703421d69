use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallerError {
    #[error("Config directory not found at {0}. Run 'taller init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Not logged in. Run 'taller login --token <TOKEN>' or set TALLER_TOKEN.")]
    NotLoggedIn,

    #[error("Session for {0} has expired. Run 'taller login' again.")]
    SessionExpired(String),

    #[error("Invalid API URL '{0}'")]
    InvalidApiUrl(String),

    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: ureq::Error,
    },

    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Unexpected response from {path}: {reason}")]
    InvalidResponse { path: String, reason: String },

    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD (e.g., '2025-03-14')")]
    InvalidDate(String),

    #[error("Work order #{0} not found")]
    OrderNotFound(String),

    #[error("Invoice #{0} not found")]
    InvoiceNotFound(String),

    #[error("Invoice #{0} is already void")]
    InvoiceAlreadyVoid(String),

    #[error("Proforma #{0} not found")]
    ProformaNotFound(String),

    #[error("Customer for work order #{0} has no phone number on file")]
    MissingPhone(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TallerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        TallerError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TallerError>;
