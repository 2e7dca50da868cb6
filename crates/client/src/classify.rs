//! Turns a [`Failure`] into an [`ApiException`].
//!
//! HTTP errors go through two stages: the body is decoded as a
//! [`ServerErrorResponse`] and its code looked up in the server-code table;
//! when that yields nothing the status-code table decides. A body that does
//! not decode never masks the HTTP failure, it only drops to the fallback.
use api_types::error::ServerErrorResponse;

use crate::{
    exception::{ApiException, ExceptionKind, ServerErrorCode},
    result::Failure,
};

/// Why the structured path was skipped for an HTTP error.
///
/// Reported to the hook passed to [`Failure::exception_with`]. It never
/// changes the classification outcome.
#[derive(Debug)]
pub enum Diagnostic<'a> {
    UndecodableBody(&'a serde_json::Error),
    UnrecognizedCode(&'a str),
}

impl Failure {
    pub fn exception(&self) -> ApiException {
        self.exception_with(|_| {})
    }

    pub fn exception_with(&self, on_diagnostic: impl FnMut(Diagnostic<'_>)) -> ApiException {
        match self {
            Failure::HttpError { code, body, .. } => classify_http_error(*code, body, on_diagnostic),
            Failure::NetworkError(cause) => ApiException::Transport(cause.clone()),
            Failure::UnknownApiError(cause) => ApiException::Unexpected(cause.clone()),
        }
    }
}

pub fn classify_http_error(
    status: u16,
    body: &str,
    mut on_diagnostic: impl FnMut(Diagnostic<'_>),
) -> ApiException {
    if body.trim().is_empty() {
        return ExceptionKind::from_status(status).into_exception(None);
    }

    let server_error = match serde_json::from_str::<ServerErrorResponse>(body) {
        Ok(server_error) => server_error,
        Err(err) => {
            tracing::debug!(status, "error body is not a server error envelope: {err}");
            on_diagnostic(Diagnostic::UndecodableBody(&err));
            return ExceptionKind::from_status(status).into_exception(None);
        }
    };

    let kind = match ServerErrorCode::from_code(&server_error.error_code) {
        Some(code) => code.kind(),
        None => {
            tracing::debug!(
                status,
                code = %server_error.error_code,
                "unrecognized server error code"
            );
            on_diagnostic(Diagnostic::UnrecognizedCode(&server_error.error_code));
            ExceptionKind::from_status(status)
        }
    };
    kind.into_exception(server_error.reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(code: &str) -> String {
        format!(r#"{{"errorCode":"{code}"}}"#)
    }

    #[test]
    fn empty_body_uses_status() {
        let failure = Failure::http(400, "Bad Request", "");
        assert_eq!(failure.exception(), ApiException::RequestFail { reason: None });
    }

    #[test]
    fn unrecognized_code_falls_back_to_status() {
        let failure = Failure::http(403, "Forbidden", body("SOMETHING_NEW"));
        assert_eq!(failure.exception(), ApiException::Forbidden { reason: None });
    }

    #[test]
    fn registered_code_wins_over_status() {
        for status in [200, 400, 404, 409, 500, 599] {
            let failure = Failure::http(status, "", body("NO_AUTHORITY"));
            assert_eq!(failure.exception(), ApiException::Forbidden { reason: None });
        }
    }

    #[test]
    fn structured_path_reaches_codes_the_status_would_not() {
        let failure = Failure::http(404, "Not Found", body("ALREADY_REGISTERED_USER"));
        assert_eq!(failure.exception().kind(), Some(ExceptionKind::RequestFail));

        let failure = Failure::http(404, "Not Found", body("RESOURCE_NOT_FOUND"));
        assert_eq!(failure.exception().kind(), Some(ExceptionKind::NotFound));
    }

    #[test]
    fn garbage_body_on_500_is_network() {
        let failure = Failure::http(500, "Internal", "not-json");
        assert_eq!(failure.exception(), ApiException::Network { reason: None });
    }

    #[test]
    fn reason_is_carried_over() {
        let failure = Failure::http(
            422,
            "Unprocessable Entity",
            r#"{"errorCode":"INVALID_PARAMETER","reason":"amount must be positive"}"#,
        );
        assert_eq!(
            failure.exception(),
            ApiException::RequestFail {
                reason: Some("amount must be positive".to_string())
            }
        );
    }

    #[test]
    fn unmapped_status_is_unknown() {
        let failure = Failure::http(401, "Unauthorized", "");
        assert_eq!(failure.exception(), ApiException::Unknown { reason: None });
    }

    #[test]
    fn diagnostics_do_not_change_the_outcome() {
        let mut seen = Vec::new();
        let failure = Failure::http(502, "Bad Gateway", "<html>");
        let with_hook = failure.exception_with(|diag| {
            seen.push(matches!(diag, Diagnostic::UndecodableBody(_)));
        });
        assert_eq!(with_hook, failure.exception());
        assert_eq!(seen, vec![true]);

        let mut codes = Vec::new();
        let failure = Failure::http(404, "Not Found", body("GONE_FISHING"));
        let with_hook = failure.exception_with(|diag| {
            if let Diagnostic::UnrecognizedCode(code) = diag {
                codes.push(code.to_string());
            }
        });
        assert_eq!(with_hook, ApiException::NotFound { reason: None });
        assert_eq!(codes, vec!["GONE_FISHING".to_string()]);
    }

    #[test]
    fn causes_pass_through_unchanged() {
        let failure = Failure::network(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "reset by peer",
        ));
        let Failure::NetworkError(cause) = &failure else {
            panic!("expected a network error");
        };
        match failure.exception() {
            ApiException::Transport(passed) => assert!(std::sync::Arc::ptr_eq(cause, &passed)),
            other => panic!("unexpected exception: {other:?}"),
        }

        let failure = Failure::unknown(std::io::Error::other("decode"));
        assert!(matches!(failure.exception(), ApiException::Unexpected(_)));
    }
}
