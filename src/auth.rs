//! Access tokens for the Google APIs.
//!
//! The Sheets calls run as a service account. The Apps Script call must run
//! as the user owning the script, so it uses an OAuth client secret together
//! with a previously stored user token.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use yup_oauth2::{
    authorized_user::AuthorizedUserSecret, AuthorizedUserAuthenticator,
    ServiceAccountAuthenticator,
};

use crate::google::{Error, Result};

pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
pub const SCRIPT_PROJECTS_SCOPE: &str = "https://www.googleapis.com/auth/script.projects";
pub const FORMS_SCOPE: &str = "https://www.googleapis.com/auth/forms";

/// Scopes granted to the user token that runs the form script.
pub const FORM_SCRIPT_SCOPES: [&str; 3] = [SCRIPT_PROJECTS_SCOPE, FORMS_SCOPE, SPREADSHEETS_SCOPE];

/// An OAuth token as saved by the one-off consent flow.
#[derive(Clone, Deserialize)]
pub struct StoredToken {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl StoredToken {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::ReadCredentials {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(file).map_err(|source| Error::DecodeToken {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredToken")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Exchanges a service account key for an access token.
pub async fn service_account_token(key_path: &Path, scopes: &[&str]) -> Result<String> {
    let key = yup_oauth2::read_service_account_key(key_path)
        .await
        .map_err(|source| Error::ReadCredentials {
            path: key_path.to_path_buf(),
            source,
        })?;
    debug!(client_email = %key.client_email, "authenticating service account");

    let auth = ServiceAccountAuthenticator::builder(key)
        .build()
        .await
        .map_err(Error::Authenticator)?;
    let token = auth.token(scopes).await?;
    token
        .token()
        .map(str::to_string)
        .ok_or(Error::MissingAccessToken)
}

/// Returns a user access token built from an OAuth client secret file and a stored token.
///
/// When the stored token has a refresh token a fresh access token is minted,
/// otherwise the stored access token is used as is.
pub async fn user_token(credentials_path: &Path, token_path: &Path, scopes: &[&str]) -> Result<String> {
    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|source| Error::ReadCredentials {
            path: credentials_path.to_path_buf(),
            source,
        })?;
    let stored = StoredToken::from_file(token_path)?;

    let Some(refresh_token) = stored.refresh_token else {
        debug!("stored token has no refresh token, using its access token");
        return stored.access_token.ok_or(Error::MissingAccessToken);
    };

    let user_secret: AuthorizedUserSecret = serde_json::from_value(serde_json::json!({
        "client_id": secret.client_id,
        "client_secret": secret.client_secret,
        "refresh_token": refresh_token,
        "type": "authorized_user",
    }))
    .map_err(|source| Error::DecodeToken {
        path: token_path.to_path_buf(),
        source,
    })?;

    let auth = AuthorizedUserAuthenticator::builder(user_secret)
        .build()
        .await
        .map_err(Error::Authenticator)?;
    let token = auth.token(scopes).await?;
    token
        .token()
        .map(str::to_string)
        .ok_or(Error::MissingAccessToken)
}
