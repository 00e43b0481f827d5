use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors from validating and sending a notification.
#[derive(Debug, Error)]
pub enum SendError {
    /// Zero or multiple recipient identifiers were supplied. Raised before
    /// any network activity and never retried.
    #[error("only one of the following parameters should be provided (room, personEmail, personId)")]
    Recipient,

    /// The Spark API answered with a non-200 status.
    #[error("failed to send message, return status={status}")]
    Status { status: u16, body: String },

    /// The request never completed (connect failure, timeout, bad URL).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

pub struct AppError(pub SendError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SendError::Recipient => StatusCode::BAD_REQUEST,
            SendError::Status { .. } | SendError::Transport(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::to_string(&json!({
            "error": self.0.to_string()
        }))
        .unwrap();

        (status, [("content-type", "application/json")], body).into_response()
    }
}

impl From<SendError> for AppError {
    fn from(err: SendError) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        let err = SendError::Status {
            status: 400,
            body: "bad request".into(),
        };
        assert!(err.to_string().contains("400"));
    }

    #[test]
    fn recipient_error_names_all_three_fields() {
        let msg = SendError::Recipient.to_string();
        assert!(msg.contains("room"));
        assert!(msg.contains("personEmail"));
        assert!(msg.contains("personId"));
    }
}
