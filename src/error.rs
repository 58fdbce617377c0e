//! Error taxonomy for Cloud Director API access
//!
//! Accessors never terminate the process. They return a `VcdError` and the
//! binary decides, in one place, how to report it and which exit code to use.
//! The variants separate the cases a caller may want to handle differently:
//!
//! - transport and protocol failures (connection refused, undecodable body)
//! - lookups that found nothing (`NotFound`)
//! - lookups that were supposed to be unique but were not (`NotUnique`)
//! - bad user input (`InvalidInput`) and configuration problems (`Config`)

use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias used across the accessor layer.
pub type VcdResult<T> = Result<T, VcdError>;

#[derive(Debug, Error)]
pub enum VcdError {
    /// The request never produced a readable response.
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: String,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Login completed but the access token header was absent.
    #[error("login failed: no access token in response (status {status}, headers: {headers}, body: {body})")]
    MissingToken {
        status: StatusCode,
        headers: String,
        body: String,
    },

    /// The API answered with a non-success status.
    #[error("{method} {path} returned {status}: {body}")]
    Api {
        method: String,
        path: String,
        status: StatusCode,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    /// A name or filtered lookup matched nothing.
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    /// A lookup that must be unique matched several records.
    #[error("{kind} lookup for \"{name}\" returned {count} results, expected 1")]
    NotUnique {
        kind: &'static str,
        name: String,
        count: usize,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl VcdError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }

    /// Whether a caller could reasonably recover from this error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Process exit code used by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) | Self::Config(_) => 2,
            Self::NotFound { .. } => 3,
            Self::NotUnique { .. } => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_identifier() {
        let err = VcdError::not_found("org vdc", "tenant-a");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "org vdc \"tenant-a\" not found");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_codes_distinguish_categories() {
        let not_unique = VcdError::NotUnique {
            kind: "edge gateway",
            name: "edge-1".to_string(),
            count: 2,
        };
        assert_eq!(not_unique.exit_code(), 4);
        assert!(!not_unique.is_not_found());
        assert_eq!(VcdError::invalid_input("bad cidr").exit_code(), 2);
        assert_eq!(VcdError::Config("no site".into()).exit_code(), 2);
        assert_eq!(VcdError::decode("org list", "eof").exit_code(), 1);
    }
}
