//! Client for the envelope ledger backend.
//!
//! Calls never fail across the call boundary: each one produces an
//! [`ApiResult`], and a failed result is classified into an
//! [`ApiException`] only when the caller asks for it
//! ([`ApiResult::get_or_throw`], [`ApiResult::exception_or_null`],
//! [`Failure::exception`]).

mod classify;
mod client;
mod error;
mod exception;
mod pager;
mod result;
mod services;

pub use classify::{Diagnostic, classify_http_error};
pub use client::{ApiClient, ApiClientBuilder, DEFAULT_TIMEOUT};
pub use error::ClientError;
pub use exception::{ApiException, Cause, ExceptionKind, ServerErrorCode};
pub use pager::{DEFAULT_PAGE_SIZE, EnvelopePager};
pub use result::{ApiResult, Failure};
pub use services::{EnvelopesService, FriendsService, UsersService, VotesService};

pub mod types {
    pub use api_types::*;
}
