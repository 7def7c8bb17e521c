//! Archive error types

use thiserror::Error;

/// Errors raised while converting, rendering, or (de)serializing articles
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A required field was unset under a strict policy, or a required
    /// element was missing from a document
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Malformed XML document
    #[error("XML error: {0}")]
    Xml(String),

    /// Field present but its text could not be interpreted
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Element or field name
        field: &'static str,
        /// Offending text
        value: String,
    },

    /// Document root element does not belong to the expected schema version
    #[error("Unexpected root element: expected <{expected}>, found <{found}>")]
    UnexpectedRoot {
        /// Root element name of the expected schema
        expected: &'static str,
        /// Root element name found in the document
        found: String,
    },

    /// IO error while inflating or deflating a document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias using ArchiveError
pub type Result<T> = std::result::Result<T, ArchiveError>;
