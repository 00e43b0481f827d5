//! Outbound client for the Cisco Spark (Webex Teams) messages API.

use log::debug;

use crate::error::SendError;
use crate::types::{MessageBody, Recipient};

pub const DEFAULT_API_BASE: &str = "https://api.ciscospark.com";
const MESSAGES_PATH: &str = "/v1/messages";

/// Client posting messages to the Spark API. The base URL is injectable so
/// tests can stand in a local upstream.
#[derive(Debug, Clone)]
pub struct SparkClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for SparkClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl SparkClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Posts one message. Single attempt, no retry; 200 is the only success
    /// status. On success the raw response body is returned unmodified.
    pub async fn send(
        &self,
        token: &str,
        recipient: &Recipient,
        text: &str,
    ) -> Result<String, SendError> {
        let body = MessageBody::new(recipient, text);
        let url = format!("{}{}", self.base_url, MESSAGES_PATH);
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status == reqwest::StatusCode::OK {
            Ok(body)
        } else {
            Err(SendError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
