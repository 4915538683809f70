use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::auth::{AuthProvider, AuthSession};
use crate::config::FirebaseConfig;
use crate::{Error, Result};

const SIGN_IN_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

/// Fallback token lifetime when the response omits `expiresIn`
const DEFAULT_TOKEN_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

/// Firebase email/password sign-in through the Identity Toolkit REST API
pub struct IdentityToolkitAuth {
    client: Client,
    api_key: String,
}

impl IdentityToolkitAuth {
    pub fn new(config: &FirebaseConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
        })
    }

    /// Map the provider's error code onto our error type
    fn sign_in_error(status: u16, body: &str) -> Error {
        let code = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.to_string());

        // Codes may carry a suffix, e.g. "TOO_MANY_ATTEMPTS_TRY_LATER : ..."
        let head = code.split(':').next().unwrap_or_default().trim();
        match head {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
                Error::InvalidCredentials
            }
            "USER_DISABLED" => Error::Auth("account disabled".to_string()),
            _ => Error::Backend {
                status,
                message: code,
            },
        }
    }

    fn session_from(response: SignInResponse, email: &str) -> AuthSession {
        let lifetime = response
            .expires_in
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_SECS);

        AuthSession {
            uid: response.local_id,
            email: response.email.unwrap_or_else(|| email.to_string()),
            display_name: response.display_name.filter(|n| !n.is_empty()),
            id_token: response.id_token,
            expires_at: Utc::now() + ChronoDuration::seconds(lifetime),
        }
    }
}

#[async_trait]
impl AuthProvider for IdentityToolkitAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession> {
        debug!("Signing in {}", email);

        let response = self
            .client
            .post(SIGN_IN_URL)
            .query(&[("key", self.api_key.as_str())])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Sign-in rejected with status: {}", status);
            return Err(Self::sign_in_error(status.as_u16(), &body));
        }

        let parsed: SignInResponse = response.json().await?;
        info!("Signed in {}", email);
        Ok(Self::session_from(parsed, email))
    }

    fn provider_name(&self) -> &'static str {
        "identity-toolkit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_errors() {
        let body = r#"{"error":{"code":400,"message":"INVALID_LOGIN_CREDENTIALS"}}"#;
        assert!(matches!(
            IdentityToolkitAuth::sign_in_error(400, body),
            Error::InvalidCredentials
        ));

        let body = r#"{"error":{"code":400,"message":"TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"}}"#;
        match IdentityToolkitAuth::sign_in_error(400, body) {
            Error::Backend { status, message } => {
                assert_eq!(status, 400);
                assert!(message.starts_with("TOO_MANY_ATTEMPTS_TRY_LATER"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_session_from_response() {
        let response: SignInResponse = serde_json::from_str(
            r#"{"localId":"uid-1","email":"admin@phuket.pl","displayName":"","idToken":"tok","refreshToken":"r","expiresIn":"3600","registered":true}"#,
        )
        .unwrap();

        let session = IdentityToolkitAuth::session_from(response, "admin@phuket.pl");
        assert_eq!(session.uid, "uid-1");
        assert_eq!(session.display_name, None);
        assert_eq!(session.id_token, "tok");
        assert!(!session.is_expired());
    }
}
