//! # Messaging Types
//!
//! Identifiers and envelopes shared by every work queue provider.

use chrono::{DateTime, Utc};

/// Provider-assigned identifier of an enqueued message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Handle for acknowledging a received message
///
/// The format is provider-specific:
/// - PGMQ: msg_id as string
/// - InMemory: internal sequence number as string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptHandle(pub String);

impl ReceiptHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the handle as an i64 (PGMQ message id)
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl std::fmt::Display for ReceiptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ReceiptHandle {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ReceiptHandle {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A received message together with what is needed to acknowledge it
#[derive(Debug, Clone)]
pub struct QueuedMessage<T> {
    pub receipt_handle: ReceiptHandle,
    pub message: T,
    /// Number of times this message has been received, including this one
    pub receive_count: u32,
    pub enqueued_at: DateTime<Utc>,
}

impl<T> QueuedMessage<T> {
    pub fn new(
        receipt_handle: ReceiptHandle,
        message: T,
        receive_count: u32,
        enqueued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            receipt_handle,
            message,
            receive_count,
            enqueued_at,
        }
    }

    /// Map the payload, keeping the envelope
    pub fn map<U, F>(self, f: F) -> QueuedMessage<U>
    where
        F: FnOnce(T) -> U,
    {
        QueuedMessage {
            receipt_handle: self.receipt_handle,
            message: f(self.message),
            receive_count: self.receive_count,
            enqueued_at: self.enqueued_at,
        }
    }
}
