use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error reading credentials file {path}: {source}")]
    ReadCredentials {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error decoding OAuth token file {path}: {source}")]
    DecodeToken {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Error building authenticator: {0}")]
    Authenticator(std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(#[from] yup_oauth2::Error),

    #[error("No access token available")]
    MissingAccessToken,

    #[error("Error calling {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Error decoding response from {url}: {source}")]
    DecodeResponse {
        url: String,
        source: reqwest::Error,
    },

    #[error("Script {function} failed: {message}")]
    ScriptExecution { function: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default root of the Google Sheets REST API.
pub const SHEETS_ENDPOINT: &str = "https://sheets.googleapis.com";

/// Default root of the Google Apps Script REST API.
pub const SCRIPT_ENDPOINT: &str = "https://script.googleapis.com";

/// Thin authenticated JSON client for one Google REST API root.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, endpoint: &str, access_token: String) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// POSTs `body` as JSON to `path` and decodes the JSON answer.
    /// Any non-2xx status is an error carrying the response body.
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        let res = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|source| Error::Request {
                url: url.clone(),
                source,
            })?;

        let status = res.status();
        debug!(%url, %status, "google api call");
        if !status.is_success() {
            return Err(Error::Status {
                url,
                status,
                body: res.text().await.unwrap_or_default(),
            });
        }

        res.json()
            .await
            .map_err(|source| Error::DecodeResponse { url, source })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.endpoint)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
