//! Reqwest-backed transport adapter.
//!
//! This adapter owns transport details only: URL assembly, query
//! serialisation, authentication headers, timeout and HTTP error mapping,
//! and decoding bodies into raw JSON documents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

use super::dto::{ErrorBodyDto, RegisterRequestDto};
use super::query::query_pairs;
use crate::domain::ports::{Endpoint, Transport, TransportError};
use crate::domain::{Auth, UrlParameter};

const DEFAULT_USER_AGENT: &str = "moysklad-sdk/0.1";

/// Outbound identity sent with every request.
pub struct HttpIdentity {
    /// HTTP user-agent sent to the remote.
    pub user_agent: String,
}

impl Default for HttpIdentity {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

/// Transport adapter issuing requests against one API root.
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl HttpTransport {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// ```rust,ignore
    /// let transport = HttpTransport::new(base_url, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_identity(base_url, timeout, HttpIdentity::default())
    }

    /// Build an adapter with an explicit outbound identity.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_identity(
        base_url: Url,
        timeout: Duration,
        identity: HttpIdentity,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
            user_agent: identity.user_agent,
        })
    }

    /// API root every endpoint path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        endpoint: Endpoint,
        auth: &Auth,
        path: &[String],
        parameters: &[UrlParameter],
    ) -> Result<Value, TransportError> {
        let url = request_url(&self.base_url, endpoint, path)?;
        let request = self
            .prepare(self.client.get(url))
            .query(&query_pairs(parameters));
        let response = authorize(request, auth)
            .send()
            .await
            .map_err(map_transport_error)?;
        read_document(response).await
    }

    async fn register(&self, email: &str) -> Result<Value, TransportError> {
        let url = request_url(&self.base_url, Endpoint::Register, &[])?;
        let response = self
            .prepare(self.client.post(url))
            .json(&RegisterRequestDto { email })
            .send()
            .await
            .map_err(map_transport_error)?;
        read_document(response).await
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn request_url(base: &Url, endpoint: Endpoint, path: &[String]) -> Result<Url, TransportError> {
    let mut url = base.join(endpoint.path()).map_err(|error| {
        TransportError::request(format!("invalid url for {endpoint}: {error}"))
    })?;
    if !path.is_empty() {
        url.path_segments_mut()
            .map_err(|()| TransportError::request(format!("{base} cannot carry path segments")))?
            .extend(path);
    }
    Ok(url)
}

fn authorize(request: RequestBuilder, auth: &Auth) -> RequestBuilder {
    match auth {
        Auth::Basic(credentials) => {
            request.basic_auth(credentials.username(), Some(credentials.password()))
        }
        Auth::Token(token) => request.bearer_auth(token.as_str()),
    }
}

async fn read_document(response: Response) -> Result<Value, TransportError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    parse_document(body.as_ref())
}

fn parse_document(body: &[u8]) -> Result<Value, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|error| TransportError::decode(format!("invalid JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransportError {
    let api_errors = serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_api_errors);
    if let Some(errors) = api_errors {
        return TransportError::api(status.as_u16(), errors);
    }

    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        status.canonical_reason().unwrap_or("no body").to_owned()
    } else {
        body_preview
    };
    TransportError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
