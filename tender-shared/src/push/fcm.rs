/// Firebase Cloud Messaging HTTP v1 client
///
/// Authenticates with a Google service account: a JWT signed with the
/// account's RSA key (RS256) is exchanged at the account's `token_uri` for
/// an OAuth access token. The access token is cached and refreshed one
/// minute before it expires.
///
/// # Example
///
/// ```no_run
/// use tender_shared::push::{fcm::FcmClient, PushSender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FcmClient::from_file("tender-firebase", "/etc/tender/service-account.json")?;
/// client.send("device-token", "Заголовок", "Текст").await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use tokio::sync::Mutex;

use super::{fcm_message, PushError, PushSender};

/// OAuth scope for sending messages
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime accepted by Google (one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh margin before the cached access token expires
const REFRESH_MARGIN_SECS: i64 = 60;

/// Fields read from a Google service account JSON key
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: String,
}

/// Claims of the OAuth assertion
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Push sender backed by Firebase Cloud Messaging
pub struct FcmClient {
    project_id: String,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl FcmClient {
    /// Creates a client from an already parsed service account key
    ///
    /// # Errors
    ///
    /// Returns `PushError::Credentials` if the private key is not RSA PEM
    pub fn new(project_id: impl Into<String>, key: ServiceAccountKey) -> Result<Self, PushError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| PushError::Credentials(format!("invalid private key: {}", e)))?;

        Ok(Self {
            project_id: project_id.into(),
            key,
            encoding_key,
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        })
    }

    /// Creates a client from a service account JSON file
    pub fn from_file(project_id: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, PushError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PushError::Credentials(format!("{}: {}", path.display(), e)))?;
        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| PushError::Credentials(format!("{}: {}", path.display(), e)))?;

        Self::new(project_id, key)
    }

    fn send_url(&self) -> String {
        format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            self.project_id
        )
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, PushError> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: FCM_SCOPE,
            aud: &self.key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        Ok(encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)?)
    }

    /// Returns a valid access token, fetching a new one when needed
    async fn access_token(&self) -> Result<String, PushError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.assertion(now)?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "Obtained FCM access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + Duration::seconds(token.expires_in),
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError> {
        let access_token = self.access_token().await?;

        let response = self
            .http
            .post(self.send_url())
            .bearer_auth(access_token)
            .json(&json!({ "message": fcm_message(token, title, body) }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(token = %token, "Push notification delivered");
        Ok(())
    }
}
