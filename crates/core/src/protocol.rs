//! JSON frames exchanged over the record-locking WebSocket.
//!
//! Frames carry an internally-tagged `"type"` discriminator so the admin UI
//! can route them by name. Field names are camelCase to match the UI.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::locking::LockTarget;
use crate::types::UserId;

/// Frames sent by the admin UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// The user opened a document in the edit view.
    #[serde(rename = "openEntity")]
    OpenEntity {
        #[serde(rename = "entityId")]
        entity_id: String,
        #[serde(rename = "entityDocumentId")]
        entity_document_id: String,
    },

    /// The user left the edit view.
    #[serde(rename = "closeEntity")]
    CloseEntity {
        #[serde(rename = "entityId")]
        entity_id: String,
        #[serde(rename = "entityDocumentId")]
        entity_document_id: String,
        /// Sent by older UIs; the socket's authenticated user takes precedence.
        #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
        user_id: Option<UserId>,
    },
}

impl ClientMessage {
    /// The validated document this frame refers to.
    pub fn target(&self) -> Result<LockTarget, CoreError> {
        match self {
            ClientMessage::OpenEntity {
                entity_id,
                entity_document_id,
            }
            | ClientMessage::CloseEntity {
                entity_id,
                entity_document_id,
                ..
            } => LockTarget::new(entity_id.as_str(), entity_document_id.as_str()),
        }
    }
}

/// Frames sent by the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A client frame could not be parsed or failed validation.
    #[serde(rename = "error")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_entity_parses_from_ui_frame() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"openEntity","entityId":"api::article.article","entityDocumentId":"abc"}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::OpenEntity {
                entity_id: "api::article.article".into(),
                entity_document_id: "abc".into(),
            }
        );
    }

    #[test]
    fn close_entity_accepts_numeric_user_id() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"closeEntity","entityId":"e","entityDocumentId":"d","userId":3}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::CloseEntity { user_id, .. } => {
                assert_eq!(user_id, Some(UserId::from("3")));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn close_entity_user_id_is_optional() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"closeEntity","entityId":"e","entityDocumentId":"d"}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::CloseEntity { user_id: None, .. }));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type":"lockAll","entityId":"e"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn target_validates_identifiers() {
        let msg = ClientMessage::OpenEntity {
            entity_id: String::new(),
            entity_document_id: "d".into(),
        };
        assert!(msg.target().is_err());
    }

    #[test]
    fn error_frame_shape() {
        let frame = ServerMessage::Error {
            message: "bad frame".into(),
        };
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            serde_json::json!({ "type": "error", "message": "bad frame" })
        );
    }
}
