use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoodgramError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Font error: {message}")]
    FontError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    AlreadyExists { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Invalid or missing authentication token")]
    Unauthenticated,

    #[error("You do not have permission to perform this action")]
    PermissionDenied,
}

pub type Result<T> = std::result::Result<T, FoodgramError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Resource,
    Request,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FoodgramError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::FontError { .. } => ErrorCategory::Resource,
            Self::NotFound { .. }
            | Self::AlreadyExists { .. }
            | Self::BadRequest { .. }
            | Self::Unauthenticated
            | Self::PermissionDenied => ErrorCategory::Request,
            Self::SerializationError(_) | Self::RenderError { .. } | Self::StoreError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Resource => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Resource => format!("Required resource unavailable: {}", self),
            ErrorCategory::Request => self.to_string(),
            ErrorCategory::Internal => "Internal error while building the shopping list".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::FontError { .. } => "Check document.font_path points to a readable TrueType file",
            Self::MissingConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the TOML configuration file"
            }
            Self::InvalidConfigValueError { .. } => "Fix the reported value and restart",
            Self::IoError(_) => "Verify the file paths and permissions",
            Self::Unauthenticated => "Send 'Authorization: Token <key>' with a valid key",
            _ => "Retry the request; report the issue if it persists",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::AlreadyExists { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FoodgramError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = match self {
            FoodgramError::AlreadyExists { message } => json!({ "errors": message }),
            other if status.is_server_error() => json!({ "detail": other.user_friendly_message() }),
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            FoodgramError::not_found("Recipe").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            FoodgramError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            FoodgramError::PermissionDenied.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            FoodgramError::BadRequest {
                message: "bad flag".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FoodgramError::FontError {
                message: "missing".to_string()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_severity_follows_category() {
        let font = FoodgramError::FontError {
            message: "missing".to_string(),
        };
        assert_eq!(font.category(), ErrorCategory::Resource);
        assert_eq!(font.severity(), ErrorSeverity::Critical);

        let duplicate = FoodgramError::AlreadyExists {
            message: "dup".to_string(),
        };
        assert_eq!(duplicate.severity(), ErrorSeverity::Low);
    }
}
