use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Pinata API keys are not set in environment variables ({0})")]
    MissingCredentials(String),
    #[error("The directory '{}' does not exist. Please run a build step first", .path.display())]
    SourceNotFound { path: PathBuf },
    #[error("Invalid settings file '{}'", .path.display())]
    InvalidSettings {
        path: PathBuf,
        #[source]
        cause: serde_yaml::Error,
    },
    #[error("Cannot walk the source directory")]
    Pattern(#[from] glob::PatternError),
    #[error("Cannot serialize pin metadata")]
    Metadata(#[source] serde_json::Error),
    #[error("HTTP request failed")]
    Request {
        #[source]
        cause: reqwest::Error,
    },
    #[error("Pinata responded with status {status}")]
    Status { status: u16, body: String },
    #[error("Failed to parse Pinata response")]
    MalformedResponse {
        body: String,
        #[source]
        cause: serde_json::Error,
    },
    #[error("Upload failed. Pinata response was missing IPFS hash")]
    MissingIdentifier { body: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Raw response body, for the variants that carry one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. }
            | Error::MalformedResponse { body, .. }
            | Error::MissingIdentifier { body } => Some(body),
            _ => None,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingCredentials(_)
                | Error::SourceNotFound { .. }
                | Error::InvalidSettings { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(cause: reqwest::Error) -> Self {
        Error::Request { cause }
    }
}
