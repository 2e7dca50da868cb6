//! Caller-visible error taxonomy.
//!
//! Every failed call ends up as one [`ApiException`]. The classified kinds
//! are listed in [`ExceptionKind`]; transport and unexpected causes are
//! passed through untouched as [`Transport`] and [`Unexpected`].
//!
//! Two static tables feed the taxonomy:
//!
//! - [`ServerErrorCode::kind`] for codes the backend declares in the error
//!   body.
//! - [`ExceptionKind::from_status`] as the fallback when no usable code is
//!   present.
//!
//!  [`Transport`]: ApiException::Transport
//!  [`Unexpected`]: ApiException::Unexpected
use std::{fmt, sync::Arc};

use thiserror::Error;

/// Shared, type-erased cause of a transport or unexpected failure.
pub type Cause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Classified failure of a remote call.
#[derive(Error, Debug, Clone)]
pub enum ApiException {
    #[error("request rejected{}", fmt_reason(.reason))]
    RequestFail { reason: Option<String> },
    #[error("forbidden{}", fmt_reason(.reason))]
    Forbidden { reason: Option<String> },
    #[error("not found{}", fmt_reason(.reason))]
    NotFound { reason: Option<String> },
    #[error("server unavailable{}", fmt_reason(.reason))]
    Network { reason: Option<String> },
    #[error("unknown error{}", fmt_reason(.reason))]
    Unknown { reason: Option<String> },
    #[error("transport error: {0}")]
    Transport(#[source] Cause),
    #[error("unexpected error: {0}")]
    Unexpected(#[source] Cause),
}

fn fmt_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(": {reason}"),
        None => String::new(),
    }
}

impl ApiException {
    /// The classified kind, `None` for pass-through causes.
    pub fn kind(&self) -> Option<ExceptionKind> {
        match self {
            Self::RequestFail { .. } => Some(ExceptionKind::RequestFail),
            Self::Forbidden { .. } => Some(ExceptionKind::Forbidden),
            Self::NotFound { .. } => Some(ExceptionKind::NotFound),
            Self::Network { .. } => Some(ExceptionKind::Network),
            Self::Unknown { .. } => Some(ExceptionKind::Unknown),
            Self::Transport(_) | Self::Unexpected(_) => None,
        }
    }

    /// Server-declared reason, if the error body carried one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::RequestFail { reason }
            | Self::Forbidden { reason }
            | Self::NotFound { reason }
            | Self::Network { reason }
            | Self::Unknown { reason } => reason.as_deref(),
            Self::Transport(_) | Self::Unexpected(_) => None,
        }
    }
}

impl PartialEq for ApiException {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::RequestFail { reason: a }, Self::RequestFail { reason: b }) => a == b,
            (Self::Forbidden { reason: a }, Self::Forbidden { reason: b }) => a == b,
            (Self::NotFound { reason: a }, Self::NotFound { reason: b }) => a == b,
            (Self::Network { reason: a }, Self::Network { reason: b }) => a == b,
            (Self::Unknown { reason: a }, Self::Unknown { reason: b }) => a == b,
            (Self::Transport(a), Self::Transport(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
            (Self::Unexpected(a), Self::Unexpected(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

/// The closed set of classified exception kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    RequestFail,
    Forbidden,
    NotFound,
    Network,
    Unknown,
}

impl ExceptionKind {
    /// Fallback mapping used when the body holds no recognized server code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::RequestFail,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500..=505 => Self::Network,
            _ => Self::Unknown,
        }
    }

    pub fn into_exception(self, reason: Option<String>) -> ApiException {
        match self {
            Self::RequestFail => ApiException::RequestFail { reason },
            Self::Forbidden => ApiException::Forbidden { reason },
            Self::NotFound => ApiException::NotFound { reason },
            Self::Network => ApiException::Network { reason },
            Self::Unknown => ApiException::Unknown { reason },
        }
    }
}

/// Error codes the backend declares in its error body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServerErrorCode {
    InvalidRequestBody,
    InvalidParameter,
    MissingParameter,
    AlreadyRegisteredUser,
    DuplicatedVote,
    InvalidToken,
    ExpiredToken,
    NoAuthority,
    BlockedUser,
    ResourceNotFound,
    NotFoundUser,
    NotFoundEnvelope,
    NotFoundFriend,
    NotFoundLedger,
    NotFoundCategory,
    InternalServerError,
    ServiceUnavailable,
    ExternalApiError,
    UnknownError,
}

impl ServerErrorCode {
    pub const ALL: [ServerErrorCode; 19] = [
        Self::InvalidRequestBody,
        Self::InvalidParameter,
        Self::MissingParameter,
        Self::AlreadyRegisteredUser,
        Self::DuplicatedVote,
        Self::InvalidToken,
        Self::ExpiredToken,
        Self::NoAuthority,
        Self::BlockedUser,
        Self::ResourceNotFound,
        Self::NotFoundUser,
        Self::NotFoundEnvelope,
        Self::NotFoundFriend,
        Self::NotFoundLedger,
        Self::NotFoundCategory,
        Self::InternalServerError,
        Self::ServiceUnavailable,
        Self::ExternalApiError,
        Self::UnknownError,
    ];

    /// Parses the wire token. Unrecognized tokens yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.as_str() == code)
    }

    /// Wire token, exactly as the backend spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequestBody => "INVALID_REQUEST_BODY",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::AlreadyRegisteredUser => "ALREADY_REGISTERED_USER",
            Self::DuplicatedVote => "DUPLICATED_VOTE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::NoAuthority => "NO_AUTHORITY",
            Self::BlockedUser => "BLOCKED_USER",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::NotFoundUser => "NOT_FOUND_USER",
            Self::NotFoundEnvelope => "NOT_FOUND_ENVELOPE",
            Self::NotFoundFriend => "NOT_FOUND_FRIEND",
            Self::NotFoundLedger => "NOT_FOUND_LEDGER",
            Self::NotFoundCategory => "NOT_FOUND_CATEGORY",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::ExternalApiError => "EXTERNAL_API_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    pub fn kind(self) -> ExceptionKind {
        match self {
            Self::InvalidRequestBody
            | Self::InvalidParameter
            | Self::MissingParameter
            | Self::AlreadyRegisteredUser
            | Self::DuplicatedVote => ExceptionKind::RequestFail,
            Self::InvalidToken | Self::ExpiredToken | Self::NoAuthority | Self::BlockedUser => {
                ExceptionKind::Forbidden
            }
            Self::ResourceNotFound
            | Self::NotFoundUser
            | Self::NotFoundEnvelope
            | Self::NotFoundFriend
            | Self::NotFoundLedger
            | Self::NotFoundCategory => ExceptionKind::NotFound,
            Self::InternalServerError | Self::ServiceUnavailable | Self::ExternalApiError => {
                ExceptionKind::Network
            }
            Self::UnknownError => ExceptionKind::Unknown,
        }
    }
}

impl fmt::Display for ServerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_table() {
        assert_eq!(ExceptionKind::from_status(400), ExceptionKind::RequestFail);
        assert_eq!(ExceptionKind::from_status(403), ExceptionKind::Forbidden);
        assert_eq!(ExceptionKind::from_status(404), ExceptionKind::NotFound);
        for status in 500..=505 {
            assert_eq!(ExceptionKind::from_status(status), ExceptionKind::Network);
        }
        assert_eq!(ExceptionKind::from_status(401), ExceptionKind::Unknown);
        assert_eq!(ExceptionKind::from_status(409), ExceptionKind::Unknown);
        assert_eq!(ExceptionKind::from_status(506), ExceptionKind::Unknown);
    }

    #[test]
    fn every_code_parses_back_from_its_token() {
        for code in ServerErrorCode::ALL {
            assert_eq!(ServerErrorCode::from_code(code.as_str()), Some(code));
        }
    }

    #[test]
    fn unknown_token_is_not_a_code() {
        assert_eq!(ServerErrorCode::from_code("resource_not_found"), None);
        assert_eq!(ServerErrorCode::from_code(""), None);
    }

    #[test]
    fn reason_is_part_of_the_message() {
        let err = ExceptionKind::NotFound.into_exception(Some("envelope 3".to_string()));
        assert_eq!(err.to_string(), "not found: envelope 3");
        assert_eq!(ExceptionKind::Forbidden.into_exception(None).to_string(), "forbidden");
    }

    #[test]
    fn pass_through_causes_compare_by_message() {
        let a: Cause = Arc::new(std::io::Error::other("reset"));
        let b: Cause = Arc::new(std::io::Error::other("reset"));
        assert_eq!(ApiException::Transport(a.clone()), ApiException::Transport(b));
        assert_ne!(ApiException::Transport(a.clone()), ApiException::Unexpected(a));
    }
}
