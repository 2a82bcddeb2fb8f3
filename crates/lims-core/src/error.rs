//! Errors that can occur when using this SDK.
//!
//! The taxonomy is fixed: callers branch on the variant (for example,
//! treating [`NotFoundError`] as "create instead"), so operations propagate
//! these unmodified and never retry or swallow them.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from performing network requests.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("Received error message from server: [{status}] {message}")]
    ResponseContent { status: StatusCode, message: String },
}

/// The server reported the requested URI as absent.
#[derive(Debug, Error)]
#[error("The record at {uri} does not exist: {message}")]
pub struct NotFoundError {
    pub uri: String,
    pub message: String,
}

/// The server rejected a write because its state no longer matches the
/// representation being written. Local state is left dirty and unchanged so
/// the caller can decide to reload-and-retry or overwrite.
#[derive(Debug, Error)]
#[error("The record at {uri} was changed on the server: {message}")]
pub struct ConflictError {
    pub uri: String,
    pub message: String,
}

/// A response or document did not match the schema shape an accessor
/// declared. Never papered over with a default value.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Xml(#[from] lims_xml::XmlError),

    #[error("The document was missing a required element: {0}")]
    MissingElement(String),

    #[error("The element '{element}' was missing the required attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("Could not decode '{value}' as a {kind} value")]
    Malformed { kind: &'static str, value: String },

    #[error("Unexpected document root '{0}'")]
    UnexpectedRoot(String),
}

/// A value an attribute codec cannot encode for its declared type.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Any error surfaced by a facade, entity or accessor operation.
#[derive(Debug, Error)]
pub enum LimsError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<reqwest::Error> for LimsError {
    fn from(error: reqwest::Error) -> Self {
        LimsError::Transport(TransportError::Reqwest(error))
    }
}

impl From<lims_xml::XmlError> for LimsError {
    fn from(error: lims_xml::XmlError) -> Self {
        LimsError::Parse(ParseError::Xml(error))
    }
}
