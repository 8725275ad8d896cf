use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImaraError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every missing and unparseable setting found in one pass.
    #[error("{}", settings_message(missing, invalid))]
    Settings {
        missing: Vec<String>,
        invalid: Vec<InvalidVar>,
    },

    #[error("Mail error: {0}")]
    Mail(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ImaraResult<T> = Result<T, ImaraError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVar {
    pub name: String,
    pub value: String,
}

impl fmt::Display for InvalidVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid value for {}: '{}'", self.name, self.value)
    }
}

fn settings_message(missing: &[String], invalid: &[InvalidVar]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("Missing required env vars: {}", missing.join(", ")));
    }
    parts.extend(invalid.iter().map(InvalidVar::to_string));
    parts.join("; ")
}
