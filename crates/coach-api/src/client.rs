use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::ApiError;

/// HTTP client bound to one backend and (optionally) one session token.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client with the configured timeout.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Return a copy of this client that authenticates with `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone().with_token(token),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn has_token(&self) -> bool {
        self.config.token.is_some()
    }

    // -------------------------------------------------------------------
    // Verb helpers
    // -------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.request(Method::GET, path), path).await?;
        decode(resp, path).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path).json(body);
        let resp = self.send(req, path).await?;
        decode(resp, path).await
    }

    /// POST without a request body (command-style endpoints).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.request(Method::POST, path), path).await?;
        decode(resp, path).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PATCH, path).json(body);
        let resp = self.send(req, path).await?;
        decode(resp, path).await
    }

    /// PATCH without a request body; the response body is ignored.
    pub async fn patch_empty(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::PATCH, path), path).await?;
        Ok(())
    }

    /// DELETE; the response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }

    /// GET an opaque byte stream (document exports).
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self.send(self.request(Method::GET, path), path).await?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    // -------------------------------------------------------------------
    // Plumbing
    // -------------------------------------------------------------------

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.url_for(path);
        let req = self.http.request(method, url);
        match &self.config.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request and convert non-success statuses into [`ApiError`].
    async fn send(&self, req: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| {
            debug!(path, error = %e, "request failed without response");
            ApiError::from(e)
        })?;

        let status = resp.status();
        debug!(path, status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body))
    }
}

/// Percent-encode a free-text value for use as a single path segment.
pub fn path_segment(raw: &str) -> String {
    let Ok(mut url) = reqwest::Url::parse("http://segment.local/") else {
        return raw.to_owned();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(raw);
    }
    url.path().trim_start_matches('/').to_owned()
}

async fn decode<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        path: path.to_owned(),
        message: e.to_string(),
    })
}
