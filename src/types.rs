use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SendError;

/// Send request as posted by the automation host. Exactly one of `room`,
/// `personId`, `personEmail` must be set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub token: String,
    pub room: Option<String>,
    pub person_id: Option<String>,
    pub person_email: Option<String>,
    pub msg: String,
    #[serde(default)]
    pub check_mode: bool,
}

/// A validated recipient: one of the three mutually exclusive addressing
/// modes of the Spark messages API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Room(String),
    PersonId(String),
    PersonEmail(String),
}

fn present(field: Option<&str>) -> bool {
    field.is_some_and(|v| !v.is_empty())
}

impl Recipient {
    /// Resolves the three optional identifiers into a single recipient.
    /// Empty strings count as absent; anything other than exactly one
    /// present field is a configuration error.
    pub fn from_fields(
        room: Option<&str>,
        person_id: Option<&str>,
        person_email: Option<&str>,
    ) -> Result<Recipient, SendError> {
        let set = [room, person_id, person_email]
            .iter()
            .filter(|f| present(**f))
            .count();
        if set != 1 {
            return Err(SendError::Recipient);
        }

        if present(room) {
            Ok(Recipient::Room(room.unwrap_or_default().to_string()))
        } else if present(person_id) {
            Ok(Recipient::PersonId(person_id.unwrap_or_default().to_string()))
        } else {
            Ok(Recipient::PersonEmail(
                person_email.unwrap_or_default().to_string(),
            ))
        }
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::Room(id) => write!(f, "room {}", id),
            Recipient::PersonId(id) => write!(f, "person {}", id),
            Recipient::PersonEmail(addr) => write!(f, "email {}", addr),
        }
    }
}

/// Wire body for `POST /v1/messages`: `text` plus exactly one recipient key.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub text: String,
    #[serde(rename = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(rename = "toPersonId", skip_serializing_if = "Option::is_none")]
    pub to_person_id: Option<String>,
    #[serde(rename = "toPersonEmail", skip_serializing_if = "Option::is_none")]
    pub to_person_email: Option<String>,
}

impl MessageBody {
    pub fn new(recipient: &Recipient, text: &str) -> Self {
        let mut body = MessageBody {
            text: text.to_string(),
            room_id: None,
            to_person_id: None,
            to_person_email: None,
        };
        match recipient {
            Recipient::Room(id) => body.room_id = Some(id.clone()),
            Recipient::PersonId(id) => body.to_person_id = Some(id.clone()),
            Recipient::PersonEmail(addr) => body.to_person_email = Some(addr.clone()),
        }
        body
    }
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub changed: bool,
    pub result: Value,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exactly_one_recipient_over_all_combinations() {
        for bits in 0u8..8 {
            let room = (bits & 1 != 0).then_some("r1");
            let person_id = (bits & 2 != 0).then_some("p1");
            let person_email = (bits & 4 != 0).then_some("a@example.com");

            let result = Recipient::from_fields(room, person_id, person_email);
            if bits.count_ones() == 1 {
                assert!(result.is_ok(), "bits {:03b} should validate", bits);
            } else {
                assert!(result.is_err(), "bits {:03b} should be rejected", bits);
            }
        }
    }

    #[test]
    fn empty_string_counts_as_absent() {
        let recipient = Recipient::from_fields(Some(""), None, Some("a@example.com")).unwrap();
        assert_eq!(recipient, Recipient::PersonEmail("a@example.com".into()));

        assert!(Recipient::from_fields(Some(""), Some(""), Some("")).is_err());
    }

    #[test]
    fn picks_the_single_present_field() {
        assert_eq!(
            Recipient::from_fields(Some("r1"), None, None).unwrap(),
            Recipient::Room("r1".into())
        );
        assert_eq!(
            Recipient::from_fields(None, Some("p1"), None).unwrap(),
            Recipient::PersonId("p1".into())
        );
    }

    #[test]
    fn body_carries_text_and_one_recipient_key() {
        let body = MessageBody::new(&Recipient::Room("r1".into()), "hello");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"text": "hello", "roomId": "r1"})
        );

        let body = MessageBody::new(&Recipient::PersonEmail("a@example.com".into()), "hi");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"text": "hi", "toPersonEmail": "a@example.com"})
        );

        let body = MessageBody::new(&Recipient::PersonId("p1".into()), "hi");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"text": "hi", "toPersonId": "p1"})
        );
    }

    #[test]
    fn request_accepts_host_field_names() {
        let req: SendRequest = serde_json::from_value(json!({
            "token": "t",
            "personEmail": "a@example.com",
            "msg": "hello"
        }))
        .unwrap();
        assert_eq!(req.person_email.as_deref(), Some("a@example.com"));
        assert!(req.room.is_none());
        assert!(!req.check_mode);
    }
}
