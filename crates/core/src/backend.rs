use crate::{
    error::BackendError,
    protocol::{
        ErrorResponse, ResetResponse, StartRequest, StartResponse, StepRequest, StepResponse,
    },
};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// The teaching service as seen by the controller.
///
/// Each method corresponds to one HTTP exchange. Implementations report any
/// non-2xx reply as [`BackendError::Status`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeachingBackend: Send + Sync {
    /// Opens a new session for `topic` and returns the learner's first message.
    async fn start_teaching(&self, topic: &str) -> Result<StartResponse, BackendError>;

    /// Sends one explanation and returns the learner's reply and updated stats.
    async fn teach_step(&self, explanation: &str) -> Result<StepResponse, BackendError>;

    /// Clears the server-side conversation for the current session.
    async fn reset_session(&self) -> Result<ResetResponse, BackendError>;
}

/// Paths of the three endpoints, relative to the service base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub start: String,
    pub step: String,
    pub reset: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            start: "/start_teaching".to_string(),
            step: "/teach_step".to_string(),
            reset: "/reset_session".to_string(),
        }
    }
}

/// A [`TeachingBackend`] that speaks JSON over HTTP.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpBackend {
    /// Creates a backend for the service rooted at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute http(s) URL of the service, e.g. `http://127.0.0.1:5000`.
    ///   A path prefix such as `/api` is kept; a trailing slash is optional.
    /// * `endpoints` - Paths for the start, step and reset calls, resolved under `base_url`.
    pub fn new(base_url: &str, endpoints: Endpoints) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("'{}': {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.host_str().is_none() {
            return Err(BackendError::InvalidUrl(format!(
                "'{}' is not an http(s) URL with a host",
                base_url
            )));
        }
        // Joining replaces the last path segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("teachback/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            endpoints,
        })
    }

    fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("endpoint '{}': {}", path, e)))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)?).json(body);
        self.send(path, request).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let request = self.client.post(self.url(path)?);
        self.send(path, request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        debug!(path, "Sending request to teaching service");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .map(|e| e.error);
            warn!(path, status = status.as_u16(), ?message, "Teaching service rejected request");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TeachingBackend for HttpBackend {
    async fn start_teaching(&self, topic: &str) -> Result<StartResponse, BackendError> {
        self.post_json(&self.endpoints.start, &StartRequest { topic })
            .await
    }

    async fn teach_step(&self, explanation: &str) -> Result<StepResponse, BackendError> {
        self.post_json(&self.endpoints.step, &StepRequest { explanation })
            .await
    }

    async fn reset_session(&self) -> Result<ResetResponse, BackendError> {
        // Some deployments answer reset with an empty 200.
        match self.post_empty::<ResetResponse>(&self.endpoints.reset).await {
            Err(BackendError::Decode(err)) if err.is_eof() => Ok(ResetResponse::default()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.start, "/start_teaching");
        assert_eq!(endpoints.step, "/teach_step");
        assert_eq!(endpoints.reset, "/reset_session");
    }

    #[test]
    fn test_url_joining() {
        let backend = HttpBackend::new("http://localhost:5000/", Endpoints::default()).unwrap();
        assert_eq!(
            backend.url("/teach_step").unwrap().as_str(),
            "http://localhost:5000/teach_step"
        );
        assert_eq!(
            backend.url("api/teach_step").unwrap().as_str(),
            "http://localhost:5000/api/teach_step"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let backend = HttpBackend::new("https://teach.example.com/v1", Endpoints::default()).unwrap();
        assert_eq!(
            backend.url("/start_teaching").unwrap().as_str(),
            "https://teach.example.com/v1/start_teaching"
        );
    }

    #[test]
    fn test_malformed_base_url_is_rejected() {
        let malformed = [
            "http://exa mple.com",
            "http://host:notaport",
            "https://[::1",
            "localhost",
            "ftp://teach.example.com",
        ];
        for url in malformed {
            let err = HttpBackend::new(url, Endpoints::default()).err();
            assert!(
                matches!(err, Some(BackendError::InvalidUrl(_))),
                "{} was accepted",
                url
            );
        }
    }
}
