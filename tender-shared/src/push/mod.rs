/// Push notification delivery
///
/// The API sends notifications through a [`PushSender`]. Production uses
/// [`fcm::FcmClient`] (Firebase Cloud Messaging HTTP v1); deployments without
/// Firebase credentials and the test suite use [`LogPushSender`], which only
/// records what would have been sent.
///
/// # Example
///
/// ```no_run
/// use tender_shared::push::{LogPushSender, PushSender};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sender = LogPushSender;
/// sender.send("device-token", "Новая сделка", "Сделка №15 подтверждена").await?;
/// # Ok(())
/// # }
/// ```

pub mod fcm;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

/// Android notification channel used for every message
pub const ANDROID_CHANNEL_ID: &str = "high_priority_channel";

/// Push delivery errors
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// Service account file missing or malformed
    #[error("Invalid push credentials: {0}")]
    Credentials(String),

    /// Could not sign the OAuth assertion
    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Transport failure talking to the provider
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Push provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Sends a single notification to a single device
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Delivers `title`/`body` to the device registered under `token`
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError>;
}

/// Builds the FCM v1 `message` object for one device
///
/// Android messages are sent with high priority on
/// [`ANDROID_CHANNEL_ID`]; APNs messages with `apns-priority: 10` and the
/// default sound.
pub fn fcm_message(token: &str, title: &str, body: &str) -> JsonValue {
    json!({
        "token": token,
        "notification": {
            "title": title,
            "body": body,
        },
        "android": {
            "priority": "high",
            "notification": {
                "channel_id": ANDROID_CHANNEL_ID,
            },
        },
        "apns": {
            "headers": {
                "apns-priority": "10",
            },
            "payload": {
                "aps": {
                    "alert": {
                        "title": title,
                        "body": body,
                    },
                    "sound": "default",
                },
            },
        },
    })
}

/// Sender that logs messages instead of delivering them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send(&self, token: &str, title: &str, body: &str) -> Result<(), PushError> {
        tracing::info!(token = %token, title = %title, body = %body, "Push delivery disabled, message logged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fcm_message_shape() {
        let message = fcm_message("tok", "Заголовок", "Текст");

        assert_eq!(message["token"], "tok");
        assert_eq!(message["notification"]["title"], "Заголовок");
        assert_eq!(message["notification"]["body"], "Текст");
        assert_eq!(message["android"]["priority"], "high");
        assert_eq!(message["android"]["notification"]["channel_id"], "high_priority_channel");
        assert_eq!(message["apns"]["headers"]["apns-priority"], "10");
        assert_eq!(message["apns"]["payload"]["aps"]["alert"]["title"], "Заголовок");
        assert_eq!(message["apns"]["payload"]["aps"]["alert"]["body"], "Текст");
        assert_eq!(message["apns"]["payload"]["aps"]["sound"], "default");
    }

    #[tokio::test]
    async fn test_log_sender_always_succeeds() {
        let sender: &dyn PushSender = &LogPushSender;
        assert!(sender.send("tok", "t", "b").await.is_ok());
    }
}
