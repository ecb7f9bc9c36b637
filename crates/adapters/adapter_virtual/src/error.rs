//! Virtual adapter error types.

use multiclimate_domain::component::ComponentRef;
use multiclimate_domain::error::MultiClimateError;

/// Errors specific to the virtual installation.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The room or zone is not part of the installation.
    #[error("unknown component {0}")]
    UnknownComponent(ComponentRef),

    /// A ventilation level was set on an installation without ventilation.
    #[error("no ventilation unit behind {0}")]
    NoVentilation(String),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] MultiClimateError),
}

impl VirtualError {
    /// Convert into a [`MultiClimateError::Api`] for propagation across port
    /// boundaries, the way a real vendor client would report it.
    #[must_use]
    pub fn into_domain(self) -> MultiClimateError {
        match self {
            Self::Domain(err) => err,
            other => MultiClimateError::Api(Box::new(other)),
        }
    }
}

impl From<VirtualError> for MultiClimateError {
    fn from(err: VirtualError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use multiclimate_domain::error::ValidationError;
    use multiclimate_domain::id::RoomId;

    use super::*;

    #[test]
    fn should_display_unknown_component() {
        let err = VirtualError::UnknownComponent(ComponentRef::Room(RoomId::new("7").unwrap()));
        assert_eq!(err.to_string(), "unknown component room 7");
    }

    #[test]
    fn should_wrap_adapter_errors_as_api_errors() {
        let err = VirtualError::NoVentilation("fan.x".to_string()).into_domain();
        assert!(matches!(err, MultiClimateError::Api(_)));
    }

    #[test]
    fn should_unwrap_domain_errors() {
        let err = VirtualError::Domain(ValidationError::EmptyName.into()).into_domain();
        assert!(matches!(
            err,
            MultiClimateError::Validation(ValidationError::EmptyName)
        ));
    }
}
