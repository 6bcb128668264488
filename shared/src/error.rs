use thiserror::Error;

/// Failures surfaced by the calendar client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Raised locally, the request never reaches the network
    #[error("No user")]
    Unauthenticated,
    #[error("Error while fetching your calendar")]
    CalendarFetch,
    #[error("Error while opening day {day}")]
    OpenDay { day: u32 },
    #[error("Error while fetching the image of day {day}")]
    ImageFetch { day: u32 },
    #[error("Invalid credentials")]
    Login,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to serialize request: {0}")]
    Encode(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ApiError::Unauthenticated | ApiError::Login | ApiError::Encode(_)
        )
    }
}

/// Map an HTTP status onto `error` unless it is a 2xx. The status itself is not kept.
pub fn ensure_success(status: u16, error: ApiError) -> Result<(), ApiError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(error)
    }
}

/// Token check: only a rejected token (401/403) means the user is signed out.
/// Any other failure is a server problem and may be retried.
pub fn ensure_authorized(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(ApiError::Unauthenticated),
        _ => Err(ApiError::Network(format!("Server returned {}", status))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_fetch_message_has_no_status() {
        assert_eq!(
            ApiError::CalendarFetch.to_string(),
            "Error while fetching your calendar"
        );
    }

    #[test]
    fn test_unauthorized_calendar_fetch() {
        let err = ensure_success(401, ApiError::CalendarFetch).unwrap_err();
        assert_eq!(err.to_string(), "Error while fetching your calendar");
        assert!(ensure_success(204, ApiError::CalendarFetch).is_ok());
        assert!(ensure_success(302, ApiError::CalendarFetch).is_err());
    }

    #[test]
    fn test_rejected_token_is_unauthenticated() {
        assert_eq!(ensure_authorized(401), Err(ApiError::Unauthenticated));
        assert_eq!(ensure_authorized(403), Err(ApiError::Unauthenticated));
        assert!(ensure_authorized(200).is_ok());
    }

    #[test]
    fn test_server_error_keeps_the_session() {
        let err = ensure_authorized(500).unwrap_err();
        assert_ne!(err, ApiError::Unauthenticated);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Network error: Server returned 500");
        assert!(ensure_authorized(502).unwrap_err().is_retryable());
    }

    #[test]
    fn test_messages() {
        assert_eq!(ApiError::Unauthenticated.to_string(), "No user");
        assert_eq!(ApiError::OpenDay { day: 5 }.to_string(), "Error while opening day 5");
        assert_eq!(
            ApiError::Network("timeout".to_string()).to_string(),
            "Network error: timeout"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::OpenDay { day: 1 }.is_retryable());
        assert!(ApiError::Network(String::new()).is_retryable());
        assert!(!ApiError::Unauthenticated.is_retryable());
        assert!(!ApiError::Login.is_retryable());
    }
}
