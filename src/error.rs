//! Error types for the public boundary of the crate.
//!
//! Internally everything is an `anyhow::Error` (see `Res`). When a result crosses into the
//! `commands` surface it is tagged with an `ErrorType` via `IntoResult::pub_result` so that the
//! caller can tell "you typed it wrong" from "the sheet is unreachable".

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Reply used when a store call fails.
const STORE_FAILURE: &str = "❌ Произошла ошибка при работе с таблицей.";

/// Reply used for anything that is neither a validation nor a store failure.
const INTERNAL_FAILURE: &str = "❌ Внутренняя ошибка бота.";

/// Broad classification of what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The message could not be parsed. The error text is meant for the user as-is.
    Validation,
    /// Reading from or writing to the spreadsheet failed.
    Store,
    /// The home directory or config file is missing or broken.
    Config,
    /// OAuth credentials are missing, invalid or could not be refreshed.
    Auth,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type: an `anyhow::Error` tagged with an `ErrorType`.
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

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    /// The text that should be sent back to whoever sent the message.
    ///
    /// Validation errors are returned verbatim. Everything else gets a generic line followed by the
    /// outermost error context only, so that internal details of the cause chain do not leak.
    pub fn reply(&self) -> String {
        match self.error_type {
            ErrorType::Validation => self.inner.to_string(),
            ErrorType::Store => format!("{STORE_FAILURE}\n{}", self.inner),
            ErrorType::Config | ErrorType::Auth | ErrorType::Internal => {
                format!("{INTERNAL_FAILURE}\n{}", self.inner)
            }
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

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Self::new(ErrorType::Internal, value)
    }
}

/// Lifts an internal result into the public `Result`, tagging the error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
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
