//! Outcome of a single remote call.
//!
//! [`ApiResult`] never carries a classified error: a [`Failure`] keeps the
//! raw material (status and verbatim body, or the captured cause) and is
//! turned into an [`ApiException`] only when a caller asks for it.
use crate::exception::{ApiException, Cause};

#[derive(Debug, Clone)]
pub enum ApiResult<T> {
    Success(T),
    Failure(Failure),
}

/// Why a call did not produce a payload.
#[derive(Debug, Clone)]
pub enum Failure {
    /// The server answered with a non-2xx status. `body` is the raw text.
    HttpError {
        code: u16,
        message: String,
        body: String,
    },
    /// No response was received.
    NetworkError(Cause),
    /// Anything else: decode errors, request building errors.
    UnknownApiError(Cause),
}

impl Failure {
    pub fn http(code: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::HttpError {
            code,
            message: message.into(),
            body: body.into(),
        }
    }

    pub fn network<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::NetworkError(std::sync::Arc::new(cause))
    }

    pub fn unknown<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UnknownApiError(std::sync::Arc::new(cause))
    }
}

impl<T> ApiResult<T> {
    pub fn success_of(value: T) -> Self {
        Self::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Returns the payload, or the classified exception of the failure.
    pub fn get_or_throw(self) -> Result<T, ApiException> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(failure) => Err(failure.exception()),
        }
    }

    pub fn get_or_null(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Classifies the failure. `None` on success.
    pub fn exception_or_null(&self) -> Option<ApiException> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.exception()),
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Returns the unclassified failure.
    ///
    /// # Panics
    ///
    /// Panics when called on a success: asking a success for its failure is
    /// a programming error, not an API error.
    pub fn failure_or_throw(&self) -> &Failure {
        match self {
            Self::Success(_) => panic!("failure_or_throw called on a successful result"),
            Self::Failure(failure) => failure,
        }
    }

    pub fn on_success(self, action: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            action(value);
        }
        self
    }

    pub fn on_failure(self, action: impl FnOnce(&Failure)) -> Self {
        if let Self::Failure(failure) = &self {
            action(failure);
        }
        self
    }

    pub fn map<U>(self, op: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            Self::Success(value) => ApiResult::Success(op(value)),
            Self::Failure(failure) => ApiResult::Failure(failure),
        }
    }
}

impl<T> From<Failure> for ApiResult<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl<T> From<ApiResult<T>> for Result<T, ApiException> {
    fn from(result: ApiResult<T>) -> Self {
        result.get_or_throw()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn failures() -> Vec<Failure> {
        vec![
            Failure::http(400, "Bad Request", ""),
            Failure::http(500, "Internal", "not-json"),
            Failure::network(std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out")),
            Failure::unknown(std::io::Error::other("boom")),
        ]
    }

    #[test]
    fn success_round_trips_payload() {
        let result = ApiResult::success_of(42);
        assert!(result.is_success());
        assert!(!result.is_failure());
        assert_eq!(result.exception_or_null(), None);
        assert!(result.failure().is_none());
        assert_eq!(result.get_or_throw(), Ok(42));
        assert_eq!(ApiResult::success_of("x").get_or_null(), Some("x"));
    }

    #[test]
    fn every_failure_throws_and_yields_nothing() {
        for failure in failures() {
            let result: ApiResult<i32> = failure.into();
            assert!(result.is_failure());
            assert_eq!(result.clone().get_or_null(), None);
            assert!(result.get_or_throw().is_err());
        }
    }

    #[test]
    fn exception_or_null_is_repeatable() {
        for failure in failures() {
            let result: ApiResult<()> = failure.into();
            assert_eq!(result.exception_or_null(), result.exception_or_null());
        }
    }

    #[test]
    fn continuations_only_run_for_their_variant() {
        let success_calls = Cell::new(0);
        let failure_calls = Cell::new(0);

        let ok = ApiResult::success_of(7)
            .on_failure(|_| failure_calls.set(failure_calls.get() + 1))
            .on_success(|value| success_calls.set(success_calls.get() + *value));
        assert_eq!(ok.get_or_null(), Some(7));
        assert_eq!(success_calls.get(), 7);
        assert_eq!(failure_calls.get(), 0);

        let failed = ApiResult::<i32>::from(Failure::http(404, "Not Found", ""))
            .on_success(|_| success_calls.set(0))
            .on_failure(|failure| {
                assert!(matches!(failure, Failure::HttpError { code: 404, .. }));
                failure_calls.set(failure_calls.get() + 1);
            });
        assert!(failed.is_failure());
        assert_eq!(success_calls.get(), 7);
        assert_eq!(failure_calls.get(), 1);
    }

    #[test]
    fn http_error_keeps_body_verbatim() {
        let body = "  {\"errorCode\": \"X\"}\n";
        let result: ApiResult<()> = Failure::http(418, "I'm a teapot", body).into();
        match result.failure_or_throw() {
            Failure::HttpError { body: kept, .. } => assert_eq!(kept, body),
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "failure_or_throw called on a successful result")]
    fn failure_or_throw_on_success_is_a_programming_error() {
        let _ = ApiResult::success_of(()).failure_or_throw();
    }

    #[test]
    fn map_preserves_failure() {
        let result: ApiResult<Vec<i32>> = Failure::http(403, "Forbidden", "").into();
        let mapped = result.map(|values| values.len());
        assert_eq!(
            mapped.get_or_throw(),
            Err(ApiException::Forbidden { reason: None })
        );
        assert_eq!(ApiResult::success_of(vec![1, 2]).map(|v| v.len()).get_or_null(), Some(2));
    }
}
