//! Human readable messages for failed commands.
use susu_client::ApiException;

use crate::error::CliError;

pub fn describe(err: &CliError) -> String {
    match err {
        CliError::Api(err) => user_message(err),
        other => other.to_string(),
    }
}

pub fn user_message(err: &ApiException) -> String {
    let base = match err {
        ApiException::RequestFail { .. } => "The request was rejected by the server.",
        ApiException::Forbidden { .. } => "You are not allowed to do that. Try logging in again.",
        ApiException::NotFound { .. } => "Nothing found.",
        ApiException::Network { .. } => "The server is unavailable. Try again later.",
        ApiException::Unknown { .. } => "Something went wrong.",
        ApiException::Transport(cause) => {
            return format!("Could not reach the server ({cause}). Check your connection and retry.");
        }
        ApiException::Unexpected(cause) => {
            return format!("Unexpected response from the server: {cause}");
        }
    };

    match err.reason() {
        Some(reason) => format!("{base} ({reason})"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn reason_is_appended() {
        let err = ApiException::RequestFail {
            reason: Some("amount must be positive".to_string()),
        };
        assert_eq!(
            user_message(&err),
            "The request was rejected by the server. (amount must be positive)"
        );
    }

    #[test]
    fn transport_mentions_retry() {
        let err = ApiException::Transport(Arc::new(std::io::Error::other("connection refused")));
        let message = describe(&CliError::Api(err));
        assert!(message.contains("connection refused"));
        assert!(message.contains("retry"));
    }
}
