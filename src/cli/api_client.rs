use std::env;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::cli::error::{CliError, CliResult};

pub const API_URL_ENV: &str = "ESTATE_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:3737";

/// Error body returned by the REST API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    field: Option<String>,
}

/// HTTP client for the estate REST API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// Base URL resolution: explicit `api_url`, then `ESTATE_API_URL`,
    /// then `http://localhost:3737`. A trailing slash is dropped.
    pub fn new(api_url: Option<String>) -> Self {
        // reqwest is built without a default TLS provider.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let base_url = api_url
            .or_else(|| env::var(API_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Deserialize a success body, or turn an error status into [`CliError::ApiError`].
    pub async fn handle_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CliError::InvalidResponse {
                message: e.to_string(),
            })
    }

    /// Pass through a success response, or turn an error status into [`CliError::ApiError`].
    pub async fn check_status(response: Response) -> CliResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(CliError::ApiError {
            status,
            message: error_message(&text),
        })
    }
}

/// Render an API error body as `message (field: name)`, falling back to the raw text.
pub(crate) fn error_message(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            error,
            field: Some(field),
        }) => format!("{} (field: {})", error, field),
        Ok(ErrorBody { error, field: None }) => error,
        Err(_) => text.to_string(),
    }
}
