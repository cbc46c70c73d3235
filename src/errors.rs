use serde::Serialize;

/// The single error type returned by every service operation.
///
/// All failures are local and synchronous: an operation either returns a new
/// state snapshot or one of these, and the input snapshot is left untouched.
#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Other error: {0}")]
    Other(
        #[from]
        #[serde(skip)]
        anyhow::Error,
    ),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Convenience constructor for id-resolution failures.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn validator_errors_map_to_validation_error() {
        let probe = Probe {
            name: String::new(),
        };
        let err: ServiceError = probe.validate().unwrap_err().into();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn not_found_includes_entity_and_id() {
        let err = ServiceError::not_found("product", "abc-123");
        assert_eq!(err.to_string(), "Not found: product abc-123 not found");
    }
}
