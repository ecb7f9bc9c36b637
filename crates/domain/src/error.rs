//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`MultiClimateError`] via `#[from]` or an explicit `into_domain()`.

/// Top-level error returned by every port and use-case.
#[derive(Debug, thiserror::Error)]
pub enum MultiClimateError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("unsupported mode")]
    UnsupportedMode(#[from] UnsupportedModeError),

    /// Holiday-mode dates that could not be parsed.
    #[error("dates are incorrect {start} {end}")]
    InvalidDates { start: String, end: String },

    /// Failure reported by the vendor API, passed through untouched.
    #[error("vendor API error")]
    Api(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant or service-call schema was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("id must not be empty")]
    EmptyId,

    #[error("name must not be empty")]
    EmptyName,

    #[error("unknown service {0:?}")]
    UnknownService(String),

    #[error("service call data must be an object")]
    NotAnObject,

    #[error("required key {0:?} is missing")]
    MissingField(&'static str),

    #[error("extra key {0:?} not allowed")]
    UnknownField(String),

    #[error("expected {expected} for key {field:?}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("value {value:?} not allowed for key {field:?}")]
    NotAllowed { field: &'static str, value: String },
}

/// A lookup by identifier returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A host HVAC mode or preset that the entity does not support.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} {value:?} is not supported by {entity_id}")]
pub struct UnsupportedModeError {
    pub entity_id: String,
    /// `"hvac mode"` or `"preset"`.
    pub kind: &'static str,
    pub value: String,
}
