// SPDX-License-Identifier: Apache-2.0

//! Uniform per-repository result type.
//!
//! Every batch operation reports one [`Response`] per repository step. A
//! response is a plain `Result`: the success payload is usually the message
//! returned by the remote service, and the failure is a [`Failure`] tagged
//! with an [`ErrorKind`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::error::GitpError;
use crate::request::InvalidRequest;

/// Result of one operation on one repository.
pub type Response<T = String> = std::result::Result<T, Failure>;

/// Classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Remote resource not found or conflicting.
    #[serde(rename = "ResourceError")]
    Resource,
    /// Caller-supplied input is invalid.
    #[serde(rename = "ParametersError")]
    Parameters,
    /// Unexpected or connectivity failure.
    #[serde(rename = "SystemError")]
    System,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Resource => write!(f, "ResourceError"),
            ErrorKind::Parameters => write!(f, "ParametersError"),
            ErrorKind::System => write!(f, "SystemError"),
        }
    }
}

/// A failed operation: its kind plus a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct Failure {
    /// Failure classification.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Message shown to the user.
    pub message: String,
}

impl Failure {
    /// Creates a failure with a verbatim message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for a [`ErrorKind::Resource`] failure.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Resource, message)
    }

    /// Shorthand for a [`ErrorKind::Parameters`] failure.
    pub fn parameters(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parameters, message)
    }

    /// Shorthand for a [`ErrorKind::System`] failure.
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System, message)
    }

    /// Builds a failure from an error value.
    ///
    /// The message is formatted as `"<ErrorTypeName>: <text>"`.
    #[must_use]
    pub fn from_error(kind: ErrorKind, err: &anyhow::Error) -> Self {
        Self::new(kind, format!("{}: {err:#}", error_name(err)))
    }

    /// Builds a parameters failure listing every error of an invalid request,
    /// one `"<parameter>: <message>"` per line.
    #[must_use]
    pub fn from_invalid_request(request: &InvalidRequest) -> Self {
        let message = request
            .errors()
            .iter()
            .map(|e| format!("{}: {}", e.parameter, e.message))
            .collect::<Vec<_>>()
            .join("\n");
        Self::parameters(message)
    }
}

fn error_name(err: &anyhow::Error) -> &'static str {
    if let Some(gitp_err) = err.downcast_ref::<GitpError>() {
        gitp_err.name()
    } else if err.downcast_ref::<octocrab::Error>().is_some() {
        "OctocrabError"
    } else if err.downcast_ref::<std::io::Error>().is_some() {
        "IoError"
    } else {
        "Error"
    }
}
