//! Error types for customer resource operations.
//!
//! [`ApiError`] carries the full failure taxonomy of the resource layer. The
//! caller (typically an HTTP adapter) maps each variant to a transport response.

use crate::acl::Privilege;

/// Main error type for resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required identifier was absent or empty
    #[error("Required parameter '{parameter}' is missing")]
    ParameterMissing { parameter: String },

    /// No record matches the identifier
    #[error("{message}")]
    NotFound { message: String },

    /// The ACL denied the role the privilege on the resource
    #[error("Role '{role}' is not allowed to '{privilege}' resource '{resource}'")]
    Privilege {
        role: String,
        resource: String,
        privilege: Privilege,
    },

    /// Structural or field validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// A business rule was violated; the message is meant for humans
    #[error("{message}")]
    CustomValidation { message: String },

    /// Errors from the storage backend
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A single failed validation constraint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute is missing or blank
    #[error("Required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Attribute is not a syntactically valid email address
    #[error("Attribute '{attribute}' is not a valid email address: '{value}'")]
    InvalidEmail { attribute: String, value: String },

    /// Attribute could not be parsed as a date or datetime
    #[error("Attribute '{attribute}' has invalid datetime format: {value}")]
    InvalidDateTimeFormat { attribute: String, value: String },

    /// Attribute value is not one of the allowed values
    #[error("Attribute '{attribute}' has invalid value '{value}', allowed values: {allowed:?}")]
    InvalidCanonicalValue {
        attribute: String,
        value: String,
        allowed: Vec<String>,
    },

    /// Payload does not have the expected structure or types
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// General validation error with custom message
    #[error("Attribute '{attribute}': {message}")]
    Custom { attribute: String, message: String },
}

impl ValidationError {
    /// Create a missing required attribute error
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid datetime error
    pub fn invalid_datetime(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDateTimeFormat {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create a custom validation error
    pub fn custom(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Custom {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// The property path the violation refers to, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredAttribute { attribute }
            | Self::InvalidEmail { attribute, .. }
            | Self::InvalidDateTimeFormat { attribute, .. }
            | Self::InvalidCanonicalValue { attribute, .. }
            | Self::Custom { attribute, .. } => Some(attribute),
            Self::MalformedPayload { .. } => None,
        }
    }
}

/// Every violation found while validating one entity.
#[derive(Debug, Clone, PartialEq, Eq, Default, thiserror::Error)]
#[error("{}", join_messages(.violations))]
pub struct ValidationErrors {
    violations: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty violation list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, violation: ValidationError) {
        self.violations.push(violation);
    }

    /// All recorded violations, in detection order.
    pub fn violations(&self) -> &[ValidationError] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Check whether any violation refers to the given property path.
    pub fn has_violation_for(&self, attribute: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.attribute() == Some(attribute))
    }

    /// `Ok(())` when empty, otherwise the list as an error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn join_messages(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ValidationError> for ValidationErrors {
    fn from(violation: ValidationError) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(violation: ValidationError) -> Self {
        Self::Validation(violation.into())
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(error: crate::storage::StorageError) -> Self {
        Self::Storage(Box::new(error))
    }
}

// Convenience methods for creating common errors
impl ApiError {
    /// Create a parameter missing error
    pub fn parameter_missing(parameter: impl Into<String>) -> Self {
        Self::ParameterMissing {
            parameter: parameter.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a business-rule error with a human readable message
    pub fn custom_validation(message: impl Into<String>) -> Self {
        Self::CustomValidation {
            message: message.into(),
        }
    }

    /// Wrap an error raised by a storage backend
    pub fn storage<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(error))
    }

    pub fn is_parameter_missing(&self) -> bool {
        matches!(self, Self::ParameterMissing { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_privilege(&self) -> bool {
        matches!(self, Self::Privilege { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_custom_validation(&self) -> bool {
        matches!(self, Self::CustomValidation { .. })
    }
}

// Result type aliases for convenience
pub type ApiResult<T> = Result<T, ApiError>;
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_validation_displays_message_verbatim() {
        let error = ApiError::custom_validation(
            "Emailaddress test@example.com for shopId 1 is not unique",
        );
        assert_eq!(
            error.to_string(),
            "Emailaddress test@example.com for shopId 1 is not unique"
        );
        assert!(error.is_custom_validation());
    }

    #[test]
    fn test_validation_errors_collect() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.push(ValidationError::missing_required("email"));
        errors.push(ValidationError::invalid_datetime("firstLogin", "yesterday"));

        assert_eq!(errors.len(), 2);
        assert!(errors.has_violation_for("email"));
        assert!(errors.has_violation_for("firstLogin"));
        assert!(!errors.has_violation_for("lastLogin"));
        assert_eq!(
            errors.to_string(),
            "Required attribute 'email' is missing; \
             Attribute 'firstLogin' has invalid datetime format: yesterday"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_error_chain() {
        let api_error = ApiError::from(ValidationError::missing_required("email"));
        assert!(api_error.is_validation());
        assert!(api_error.to_string().starts_with("Validation error"));
        assert!(api_error.to_string().contains("email"));
    }

    #[test]
    fn test_privilege_message() {
        let error = ApiError::Privilege {
            role: "dummy".to_string(),
            resource: "customer".to_string(),
            privilege: Privilege::Read,
        };
        assert_eq!(
            error.to_string(),
            "Role 'dummy' is not allowed to 'read' resource 'customer'"
        );
    }

    #[test]
    fn test_storage_error_wrapped() {
        let error = ApiError::from(crate::storage::StorageError::not_found("billing", 3));
        assert!(error.to_string().contains("billing/3"));
        assert!(std::error::Error::source(&error).is_some());
    }
}
