//! Error handling primitives shared across the crate.
//!
//! Every failure carries a stable [`ErrorCode`] for the log stream, and the
//! code decides which HTTP status the analysis page is rendered with.

use std::num::ParseIntError;
use std::path::PathBuf;

use axum::http::StatusCode;
use thiserror::Error;

/// Stable error codes written to the log stream.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// Model artefact was not available at startup.
    ModelMissing = 3,
    /// Submitted form data failed validation.
    InvalidInput = 4,
    /// Unexpected failure inside the predictor.
    Internal = 5,
    /// Model artefact was found but could not be turned into a predictor.
    ArtifactInvalid = 6,
}

impl ErrorCode {
    /// HTTP status the analysis page is rendered with for this code.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::Ok => StatusCode::OK,
            ErrorCode::ModelMissing | ErrorCode::ArtifactInvalid => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            // Predictor failures are reported to the user like bad input.
            ErrorCode::InvalidInput | ErrorCode::Internal => StatusCode::BAD_REQUEST,
        }
    }
}

/// Why a submitted form could not be turned into a feature vector.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' is not an integer ({value:?}): {source}")]
    NotAnInteger {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("could not read form data: {0}")]
    MalformedForm(String),
}

/// Canonical error type for the crate.
#[derive(Debug, Error)]
pub enum CytoError {
    #[error("the model is not loaded")]
    ModelUnavailable,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("prediction failed: {0}")]
    Prediction(String),
    #[error("cannot read model artefact {}: {source}", .path.display())]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model artefact: {0}")]
    ArtifactFormat(#[from] serde_json::Error),
    #[error("invalid model artefact: {0}")]
    ArtifactInvalid(String),
}

/// Result alias used throughout the crate.
pub type CytoResult<T> = Result<T, CytoError>;

impl CytoError {
    /// Machine parsable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CytoError::ModelUnavailable | CytoError::ArtifactIo { .. } => ErrorCode::ModelMissing,
            CytoError::Validation(_) => ErrorCode::InvalidInput,
            CytoError::Prediction(_) => ErrorCode::Internal,
            CytoError::ArtifactFormat(_) | CytoError::ArtifactInvalid(_) => {
                ErrorCode::ArtifactInvalid
            }
        }
    }

    /// Artefact validation helper.
    pub fn invalid_artifact(msg: impl Into<String>) -> Self {
        CytoError::ArtifactInvalid(msg.into())
    }
}
