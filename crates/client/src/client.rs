use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::ClientError,
    result::{ApiResult, Failure},
    services::{EnvelopesService, FriendsService, UsersService, VotesService},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the envelope backend.
///
/// Every call returns an [`ApiResult`]; nothing is raised across the call
/// boundary.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn envelopes(&self) -> EnvelopesService {
        EnvelopesService::new(self.clone())
    }

    pub fn friends(&self) -> FriendsService {
        FriendsService::new(self.clone())
    }

    pub fn users(&self) -> UsersService {
        UsersService::new(self.clone())
    }

    pub fn votes(&self) -> VotesService {
        VotesService::new(self.clone())
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ApiResult<T> {
        self.execute(Method::GET, path, |req| req.query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, |req| req.json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::PATCH, path, |req| req.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.execute(Method::DELETE, path, |req| req).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ApiResult<T> {
        let url = match self.base_url.join(path.trim_start_matches('/')) {
            Ok(url) => url,
            Err(err) => return Failure::unknown(err).into(),
        };

        tracing::debug!("--> {method} {url}");
        let request = build(self.http.request(method.clone(), url.clone()));

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!("<-- {method} {url} failed: {err}");
                return transport_failure(err).into();
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return transport_failure(err).into(),
        };
        tracing::debug!("<-- {} {method} {url}", status.as_u16());
        log_body(&body);

        if !status.is_success() {
            return Failure::http(
                status.as_u16(),
                status
                    .canonical_reason()
                    .map_or_else(|| status.to_string(), str::to_string),
                body,
            )
            .into();
        }

        decode_body(&body)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    // `Url::join` drops the last segment unless the base ends with a slash.
    let raw = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&raw).map_err(|err| ClientError::BaseUrl(format!("{raw}: {err}")))
}

/// Errors where no response was received are network errors; the rest
/// (builder, redirect, decode) are unexpected.
fn transport_failure(err: reqwest::Error) -> Failure {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        Failure::network(err)
    } else {
        Failure::unknown(err)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    // Empty bodies decode as `null` so that `()` payloads succeed.
    let body = if body.trim().is_empty() { "null" } else { body };
    match serde_json::from_str(body) {
        Ok(value) => ApiResult::Success(value),
        Err(err) => Failure::unknown(err).into(),
    }
}

fn log_body(body: &str) {
    if body.is_empty() || !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) if value.is_object() || value.is_array() => {
            match serde_json::to_string_pretty(&value) {
                Ok(pretty) => tracing::trace!("{pretty}"),
                Err(_) => tracing::trace!("{body}"),
            }
        }
        _ => tracing::trace!("body: {body}"),
    }
}

#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    base_url: String,
    access_token: Option<String>,
    timeout: Option<Duration>,
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: &str) -> ApiClientBuilder {
        self.base_url = base_url.to_string();
        self
    }

    pub fn access_token(mut self, token: Option<&str>) -> ApiClientBuilder {
        self.access_token = token.filter(|token| !token.is_empty()).map(str::to_string);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> ApiClientBuilder {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        tracing::info!("Initializing api client for {}...", self.base_url);

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.access_token {
            let mut auth = header::HeaderValue::try_from(format!("Bearer {token}"))?;
            auth.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, auth);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        ApiClient::new(http, &self.base_url)
    }
}
