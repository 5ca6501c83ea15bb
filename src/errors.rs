use thiserror::Error;

/// Message used when the server gives no usable error text.
pub const SERVER_ERROR_FALLBACK: &str = "Server error";

/// StealthMate auth errors.
///
/// The `Display` output of every variant is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required form field was empty. Raised before any network call.
    #[error("{0}")]
    Validation(&'static str),

    /// The auth API answered with a non-success status, or could not be reached.
    /// Carries the server's `error` text or [`SERVER_ERROR_FALLBACK`].
    #[error("{0}")]
    Api(String),

    /// The auth API answered with a success status but the body was not what we expect.
    #[error("Failed to decode auth API response.")]
    FailedToDecode,

    /// Writing or removing the persisted session failed.
    #[error("Failed to update local session: {0}")]
    Storage(String),

    /// Login was attempted while a session is already held.
    #[error("Already logged in. Log out first.")]
    AlreadyLoggedIn,

    /// Another request is still in flight.
    #[error("Please wait for the current request to finish.")]
    Busy,

    /// The configured API base URL could not be parsed.
    #[error("Invalid API base URL. Must be an absolute http(s) URL.")]
    InvalidBaseUrl,

    /// No platform data directory could be found for local storage.
    #[error("Failed to locate a local storage directory.")]
    NoStorageDir,
}

impl AuthError {
    /// Builds an [`AuthError::Api`] from an optional server message, falling back to
    /// [`SERVER_ERROR_FALLBACK`] when it is missing or blank.
    pub fn api(message: Option<String>) -> Self {
        match message {
            Some(text) if !text.trim().is_empty() => AuthError::Api(text),
            _ => AuthError::Api(SERVER_ERROR_FALLBACK.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_falls_back_when_message_missing() {
        assert_eq!(AuthError::api(None).to_string(), "Server error");
        assert_eq!(AuthError::api(Some("  ".into())).to_string(), "Server error");
    }

    #[test]
    fn api_error_keeps_server_text() {
        let err = AuthError::api(Some("User already exists".into()));
        assert_eq!(err, AuthError::Api("User already exists".into()));
        assert_eq!(err.to_string(), "User already exists");
    }

    #[test]
    fn validation_displays_verbatim() {
        let err = AuthError::Validation("Please fill in all fields.");
        assert_eq!(err.to_string(), "Please fill in all fields.");
    }
}
