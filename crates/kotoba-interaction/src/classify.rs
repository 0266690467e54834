//! Failure classification for remote calls.
//!
//! Every authenticated call distinguishes three outcomes: a 401 is an
//! authentication failure (forces credential invalidation), any other
//! non-2xx or a failed request is a transport failure, and a 2xx with an
//! unparseable body is a shape failure.

use kotoba_core::error::KotobaError;
use reqwest::StatusCode;

/// Classifies a non-2xx response status.
pub fn classify_status(status: StatusCode, body: String) -> KotobaError {
    let message = if body.trim().is_empty() {
        format!("API Error: {}", status.as_u16())
    } else {
        body
    };

    if status == StatusCode::UNAUTHORIZED {
        KotobaError::Auth(message)
    } else {
        KotobaError::transport_status(status.as_u16(), message)
    }
}

/// Classifies a request that failed before any response arrived.
pub fn classify_failure(err: reqwest::Error) -> KotobaError {
    KotobaError::transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_is_auth() {
        let err = classify_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(err.is_auth());
    }

    #[test]
    fn test_other_statuses_are_transport() {
        for code in [400u16, 403, 404, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = classify_status(status, String::new());
            assert!(err.is_transport(), "status {} should be transport", code);
        }
    }

    #[test]
    fn test_empty_body_gets_status_message() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, String::new());
        assert!(err.to_string().contains("API Error: 500"));
    }

    #[test]
    fn test_body_is_preserved() {
        let err = classify_status(
            StatusCode::BAD_GATEWAY,
            r#"{"error": "upstream down"}"#.to_string(),
        );
        assert!(err.to_string().contains("upstream down"));
    }
}
