//! Error types for product-sales.
//!
//! Internally everything returns `Res<T>` (an `anyhow` result) and adds context as it goes.
//! At the boundary of an operation the error is classified with `pub_result`, which turns it
//! into the public `Error` carrying an `ErrorType`. The `ErrorType` decides what the HTTP
//! layer tells the caller.

use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// Public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies an error by where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The request was invalid, e.g. a required `month` was missing.
    Request,
    /// The seed feed could not be fetched or decoded.
    Upstream,
    /// A query or write against the transaction store failed.
    Database,
    /// The configuration or home directory is missing or invalid.
    Config,
    /// The server or a request exceeded its limits, or could not run.
    Service,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// The HTTP status a failure of this type is reported with.
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorType::Request => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The public error type.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Creates a `Request` error with a message meant for the caller.
    pub fn request(message: impl Display) -> Self {
        Self::new(ErrorType::Request, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The message that may be shown to a caller. Request errors describe what was wrong with
    /// the request. Every other type is replaced by `fallback` so that no internal detail leaks.
    pub fn public_message(&self, fallback: &str) -> String {
        match self.error_type {
            ErrorType::Request => self.inner.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal result into a public one by assigning an `ErrorType`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
