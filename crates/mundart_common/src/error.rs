//! Error taxonomy for the lookup pipeline.
//!
//! Two families under one umbrella: `ValidationError` for rejected caller
//! input (never retried, reported with the violated constraint) and
//! `ApiError` for remote-corpus failures (absorbed per location unless every
//! location fails).

use crate::domain::LocationId;
use thiserror::Error;

/// Caller-supplied input violated a boundary constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("word must not be empty")]
    EmptyWord,

    #[error("word exceeds {max} bytes")]
    WordTooLong { max: usize },

    #[error("forbidden character {found:?} in {field}")]
    ForbiddenCharacter { field: &'static str, found: char },

    #[error("unknown scope: {0}")]
    UnknownScope(String),

    #[error("scope custom_town requires a town name")]
    TownMissing,

    #[error("town parameter is only valid with scope custom_town")]
    TownNotAllowed,

    #[error("town name exceeds {max} bytes")]
    TownTooLong { max: usize },

    #[error("town not in gazetteer: {0}")]
    UnknownTown(String),

    #[error("limit must be between 1 and {max}, got {got}")]
    LimitOutOfRange { got: usize, max: usize },
}

/// Remote corpus communication or document failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("connection failure for {location}: {reason}")]
    Transport { location: LocationId, reason: String },

    #[error("request for {location} timed out")]
    Timeout { location: LocationId },

    #[error("HTTP {status} from {location}")]
    HttpStatus { location: LocationId, status: u16 },

    #[error("empty response body from {location}")]
    EmptyBody { location: LocationId },

    #[error("malformed document from {location}: {reason}")]
    MalformedDocument { location: LocationId, reason: String },

    /// Every resolved location failed. Distinct from a zero-attestation
    /// success so the caller can tell "nothing attested" from "corpus down".
    #[error("all {} queried locations failed", .failures.len())]
    AllLocationsFailed { failures: Vec<(LocationId, String)> },
}

/// Umbrella error returned by the pipeline entry point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
