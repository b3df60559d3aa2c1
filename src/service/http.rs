use crate::config::ApiConfig;
use crate::service::ServiceError;
use crate::session::SessionContext;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// JSON-over-HTTP access to the query service. One instance backs every
/// client trait; the session context is injected here and nowhere else.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    context: SessionContext,
    pub(crate) generate_path: String,
    pub(crate) execute_path: String,
    pub(crate) databases_path: String,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig, context: SessionContext) -> Result<Self, ServiceError> {
        Self::with_timeout(config, context, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_timeout(
        config: &ApiConfig,
        context: SessionContext,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| {
            ServiceError::ConnectionError(format!("invalid base URL {}: {}", config.base_url, e))
        })?;

        // Url::join replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            context,
            generate_path: config.generate_path.clone(),
            execute_path: config.execute_path.clone(),
            databases_path: config.databases_path.clone(),
        })
    }

    /// Resolves `path` against the base URL and appends `segments`,
    /// percent-encoding each one.
    pub(crate) fn endpoint(&self, path: &str, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ServiceError::ConnectionError(format!("invalid endpoint {}: {}", path, e)))?;

        if !segments.is_empty() {
            let mut parts = url.path_segments_mut().map_err(|_| {
                ServiceError::ConnectionError(format!("base URL cannot carry a path: {}", path))
            })?;
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }

        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        debug!("GET {}", url);
        let request = self.client.get(url);
        self.send(request).await
    }

    pub(crate) async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let request = self.client.post(url).json(body);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let request = match self.context.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = rejection_message(status, &body);
            error!("Service responded with status {}: {}", status, message);
            return Err(ServiceError::ResponseError(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse service response: {} - Response was: {}", e, body);
            ServiceError::DecodeError(e.to_string())
        })
    }
}

fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout(e.to_string())
    } else {
        ServiceError::ConnectionError(e.to_string())
    }
}

/// Picks the most useful text out of a rejection body: `error`, then
/// `message`, else the bare status.
pub(crate) fn rejection_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["error", "message"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
