use std::{io, path::PathBuf};

use thiserror::Error;

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Failures surfaced by the validator client.
///
/// A child process that runs and exits non-zero is not an error; its code is
/// reported through [`crate::process::InvocationResult`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to launch {program}: {source}")]
    ProcessLaunch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading output of {program}: {source}")]
    ProcessIo {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("HTTP {status} from {url}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading response body from {url} (HTTP {status}): {source}")]
    ResponseBody {
        url: String,
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid validation URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ClientError {
    /// HTTP status read before the call failed. `None` when no status was read.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::HttpStatus { status, .. } | ClientError::ResponseBody { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// True when the connection failed before any response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_only_reported_for_http_status() {
        let err = ClientError::HttpStatus {
            url: "http://localhost:8080/help".to_string(),
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_network());
        assert!(err.to_string().contains("HTTP 404"));

        let launch = ClientError::ProcessLaunch {
            program: PathBuf::from("missing-arelle"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(launch.status_code(), None);
        assert!(launch.to_string().contains("missing-arelle"));
    }
}
