use thiserror::Error;

/// Failure of a single gateway call.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The API answered with a non-2xx status. `message` is meant for the user.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// No usable response arrived.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to build request: {0}")]
    Encode(String),

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for a toast. API messages pass through verbatim, everything
    /// else collapses to the caller's generic retry prompt.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected { message, .. } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Problems caught before anything goes over the network.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Verification token is required")]
    MissingToken,

    #[error("Invalid file type. Please upload .pptx, .docx, or .xlsx files only.")]
    UnsupportedFileType,

    #[error("Please select a file to upload")]
    NoFileSelected,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StorageError {
    #[error("durable storage unavailable")]
    Unavailable,

    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_is_verbatim() {
        let err = ApiError::Rejected {
            status: 401,
            message: "Invalid credentials".into(),
        };
        assert_eq!(err.user_message("Login failed. Please try again."), "Invalid credentials");
    }

    #[test]
    fn transport_uses_fallback() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(
            err.user_message("Login failed. Please try again."),
            "Login failed. Please try again."
        );
    }
}
