//! Error types for the render-list engine.

use std::fmt;

/// Errors returned by render context operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A draw-family call was made on a context with no graphics device.
    InvalidContext,

    /// A fixed-capacity table is full.
    OutOfResources {
        /// The table that overflowed.
        resource: &'static str,
    },

    /// An argument was outside its accepted range.
    InvalidParameter {
        /// Description of the rejected argument.
        message: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::InvalidContext => {
                write!(f, "Invalid render context: no graphics device attached")
            }
            RenderError::OutOfResources { resource } => {
                write!(f, "Out of resources: {} is full", resource)
            }
            RenderError::InvalidParameter { message } => {
                write!(f, "Invalid parameter: {}", message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// Result type for render context operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RenderError::OutOfResources {
            resource: "render object list",
        };
        assert_eq!(err.to_string(), "Out of resources: render object list is full");

        let err = RenderError::InvalidParameter {
            message: "texture unit 9".to_string(),
        };
        assert!(err.to_string().contains("texture unit 9"));
    }
}
