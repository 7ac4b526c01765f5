//! Service-account authentication for the Google APIs.
//!
//! Uses the OAuth 2.0 JWT bearer grant: a short-lived assertion signed with
//! the account's private key is exchanged for an access token.

use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SheetsError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Spreadsheet read/write plus Drive lookup by name.
pub const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The fields of a service-account key file that authentication needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    /// Read a key file downloaded from the cloud console.
    pub fn from_file(path: &Path) -> Result<Self, SheetsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SheetsError::CredentialsNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(SheetsError::InvalidCredentials(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, SheetsError> {
        serde_json::from_str(json).map_err(|e| SheetsError::InvalidCredentials(e.to_string()))
    }

    /// Build the signed assertion for a token request issued at `now` (unix seconds).
    pub(super) fn signed_assertion(&self, now: i64) -> Result<String, SheetsError> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| SheetsError::InvalidCredentials(format!("private key: {}", e)))?;

        let claims = Claims {
            iss: &self.client_email,
            scope: SCOPES,
            aud: &self.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| SheetsError::InvalidCredentials(format!("signing failed: {}", e)))
    }

    /// Exchange a signed assertion for an access token.
    pub(super) async fn access_token(&self, client: &Client) -> Result<String, SheetsError> {
        let assertion = self.signed_assertion(Utc::now().timestamp())?;
        debug!("Requesting access token for {}", self.client_email);

        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Auth(format!("HTTP {}: {}", status, body.trim())));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SheetsError::Auth(format!("invalid token response: {}", e)))?;
        Ok(token.access_token)
    }
}
