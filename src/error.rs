use crate::types::{WorkoutId, WorkoutKind};
use thiserror::Error;

/// User-facing message shown for any rejected form submission.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be a positive number!";

/// Rejected form input. Recoverable: the form stays open.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown workout type: {0:?}")]
    UnknownKind(String),

    #[error("{field} is not a finite number: {raw:?}")]
    NotFinite { field: &'static str, raw: String },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{metric} is out of range for the given distance and duration")]
    DerivedNotFinite { metric: &'static str },
}

/// A persisted record that cannot be turned back into a workout.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record has no \"kind\" field")]
    MissingKind,

    #[error("unrecognized workout kind: {0}")]
    UnknownKind(String),

    #[error("malformed {kind} record: {source}")]
    Malformed {
        kind: WorkoutKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("permission to read the current position was denied")]
    PermissionDenied,

    #[error("current position is unavailable")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no map location selected; click the map before submitting")]
    NoPendingLocation,

    #[error("no workout ids left to assign")]
    IdsExhausted,

    #[error("workout {id} was logged but could not be saved")]
    Persist {
        id: WorkoutId,
        #[source]
        source: anyhow::Error,
    },

    #[error("clearing saved workouts")]
    Reset(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected \"running\" or \"cycling\", got {0:?}")]
pub struct ParseKindError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected coordinates as LAT,LNG, got {0:?}")]
pub struct ParseCoordsError(pub String);
