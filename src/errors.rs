// SPDX-License-Identifier: MPL-2.0

//! Error types for the control surface

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
///
/// Cloneable so that request results can travel inside [`crate::app::Message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The request never produced a usable body
    Transport(TransportError),
    /// The server answered with `status != "ok"`
    Rejected {
        /// Endpoint that rejected the request
        endpoint: &'static str,
        /// Server-supplied message
        message: String,
    },
    /// The body parsed as JSON but did not have the expected shape
    Protocol(String),
    /// Local validation failed before any request was made
    Validation(ValidationError),
    /// Configuration errors
    Config(String),
    /// Local filesystem errors
    Storage(String),
}

/// Network and body-parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not connect to the server
    Connect(String),
    /// The request timed out
    Timeout,
    /// Any other HTTP-level failure
    Http(String),
    /// The body was not valid JSON
    Decode(String),
}

/// Input rejected locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Profile name was empty after trimming
    EmptyProfileName,
    /// The sole remaining color range cannot be deleted
    LastRangeNotDeletable,
    /// Slot index does not reference an existing range
    NoSuchRange(usize),
    /// The frame used for color sampling has no area
    ZeroSizedFrame,
    /// The click landed outside the frame
    OutsideFrame,
    /// Unknown built-in scene name
    UnknownScene(String),
    /// Malformed color string
    InvalidColor(String),
}

impl AppError {
    /// Message suitable for the notification channel
    pub fn user_message(&self) -> String {
        match self {
            AppError::Transport(e) => format!("Cannot reach server: {}", e),
            AppError::Rejected { message, .. } => message.clone(),
            AppError::Validation(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// True for network-level failures
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Transport(e) => write!(f, "Transport error: {}", e),
            AppError::Rejected { endpoint, message } => {
                write!(f, "Server rejected {}: {}", endpoint, message)
            }
            AppError::Protocol(msg) => write!(f, "Unexpected server reply: {}", msg),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connection failed: {}", msg),
            TransportError::Timeout => write!(f, "request timed out"),
            TransportError::Http(msg) => write!(f, "{}", msg),
            TransportError::Decode(msg) => write!(f, "invalid response body: {}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyProfileName => write!(f, "Enter a profile name first."),
            ValidationError::LastRangeNotDeletable => {
                write!(f, "At least one color range is required")
            }
            ValidationError::NoSuchRange(idx) => write!(f, "No color range #{}", idx + 1),
            ValidationError::ZeroSizedFrame => write!(f, "Video frame is not visible"),
            ValidationError::OutsideFrame => write!(f, "Click inside the video frame"),
            ValidationError::UnknownScene(name) => write!(f, "Unknown scene: {}", name),
            ValidationError::InvalidColor(value) => write!(f, "Invalid color: {}", value),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for TransportError {}
impl std::error::Error for ValidationError {}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::Transport(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Protocol(err.to_string())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_user_message_is_server_text() {
        let err = AppError::Rejected {
            endpoint: "/toggle",
            message: "Capture background first!".to_string(),
        };
        assert_eq!(err.user_message(), "Capture background first!");
        assert!(err.to_string().contains("/toggle"));
    }

    #[test]
    fn test_transport_user_message() {
        let err: AppError = TransportError::Timeout.into();
        assert!(err.is_transport());
        assert_eq!(err.user_message(), "Cannot reach server: request timed out");
    }

    #[test]
    fn test_validation_message() {
        let err: AppError = ValidationError::EmptyProfileName.into();
        assert_eq!(err.user_message(), "Enter a profile name first.");
    }

    #[test]
    fn test_protocol_user_message() {
        let err = AppError::Protocol("add reply carried no color ranges".to_string());
        assert_eq!(
            err.user_message(),
            "Unexpected server reply: add reply carried no color ranges"
        );
    }
}
