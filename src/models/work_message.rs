//! # Work Message
//!
//! The queue wire format is a JSON object carrying only the document id:
//! `{"uid": "<document-id>"}`. Consumers key all processing on `uid`, since
//! delivery is at-least-once and unordered.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::document::DocumentId;
use crate::messaging::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkMessage {
    pub uid: DocumentId,
}

impl WorkMessage {
    pub fn new(uid: DocumentId) -> Self {
        Self { uid }
    }

    /// Serialized message body exactly as it goes onto the queue
    pub fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Acknowledgment of one enqueued work message, kept for auditing only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub uid: DocumentId,
    /// Message body that was enqueued
    pub message: String,
    /// SHA-256 hex digest of `message`
    pub checksum: String,
    /// Provider-assigned message id
    pub message_id: String,
}

impl DeliveryReceipt {
    pub fn new(uid: DocumentId, message: String, message_id: &MessageId) -> Self {
        let checksum = body_checksum(&message);
        Self {
            uid,
            message,
            checksum,
            message_id: message_id.to_string(),
        }
    }
}

/// Content checksum of a message body
pub fn body_checksum(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}
