use std::time::Duration;

use archive_logging::archive_debug;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use url::Url;

use crate::{BackendError, FailureKind, FileInfo};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    /// Base URL of the proxy, e.g. `https://archive.example.com`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Bound for the liveness probe only.
    pub health_timeout: Duration,
    /// Metadata and download requests have no timeout of their own unless
    /// this is set; `None` defers to the transport.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            connect_timeout: Duration::from_secs(10),
            health_timeout: Duration::from_secs(3),
            request_timeout: None,
        }
    }
}

impl BackendSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// The three proxy endpoints the pipeline talks to.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /health`; `Ok` iff the proxy answered with a success status.
    async fn health(&self) -> Result<(), BackendError>;

    /// `GET /file-info?id=...`
    async fn file_info(&self, resource_id: &str) -> Result<FileInfo, BackendError>;

    /// `GET /download?url=...`, returning the full payload.
    async fn download(&self, document_url: &str) -> Result<Bytes, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    fn endpoint(&self, path: &str, query: Option<(&str, &str)>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }

    async fn get_ok(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn health(&self) -> Result<(), BackendError> {
        let url = self.endpoint("health", None);
        let request = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .timeout(self.settings.health_timeout);
        self.get_ok(request).await.map(|_| ())
    }

    async fn file_info(&self, resource_id: &str) -> Result<FileInfo, BackendError> {
        let url = self.endpoint("file-info", Some(("id", resource_id)));
        let response = self.get_ok(self.client.get(url)).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| BackendError::new(FailureKind::InvalidResponse, err.to_string()))
    }

    async fn download(&self, document_url: &str) -> Result<Bytes, BackendError> {
        let url = self.endpoint("download", Some(("url", document_url)));
        let response = self.get_ok(self.client.get(url)).await?;

        let mut payload = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            payload.extend_from_slice(&chunk);
        }
        archive_debug!("downloaded {} bytes for {}", payload.len(), document_url);
        Ok(payload.freeze())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
