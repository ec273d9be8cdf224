//! Error types for the ACS distance pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while deriving ACS distances.
///
/// Every variant carries the component and operation that failed so the
/// top-level diagnostic can be rendered as `Component::operation ERROR:
/// message`, matching the original tool's `Error::stopWithError` format.
#[derive(Error, Debug)]
pub enum AcsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{component}::{operation} ERROR: invalid usage: {message}")]
    Usage { component: String, operation: String, message: String },

    #[error("{component}::{operation} ERROR: could not open '{}': {source}", path.display())]
    Open {
        component: String,
        operation: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{component}::{operation} ERROR: {message}")]
    Integrity { component: String, operation: String, message: String },

    #[error("{component}::{operation} ERROR: {message}")]
    Contract { component: String, operation: String, message: String },
}

pub type Result<T> = std::result::Result<T, AcsError>;

impl AcsError {
    pub fn usage(component: &str, operation: &str, message: impl Into<String>) -> Self {
        AcsError::Usage {
            component: component.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn open(component: &str, operation: &str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        AcsError::Open {
            component: component.to_string(),
            operation: operation.to_string(),
            path: path.into(),
            source,
        }
    }

    pub fn integrity(component: &str, operation: &str, message: impl Into<String>) -> Self {
        AcsError::Integrity {
            component: component.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn contract(component: &str, operation: &str, message: impl Into<String>) -> Self {
        AcsError::Contract {
            component: component.to_string(),
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}
