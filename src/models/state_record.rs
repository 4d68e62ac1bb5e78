//! # Document State Record
//!
//! One row per document in the durable state store, keyed by document id.
//! Writes are whole-record upserts so concurrent fan-out workers converge
//! without coordination (last writer wins per id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::DocumentId;
use crate::constants::DocumentStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStateRecord {
    pub id: DocumentId,
    pub status: DocumentStatus,
    /// Absolute expiry; the store drops the record after this instant
    pub expiry: DateTime<Utc>,
}

impl DocumentStateRecord {
    /// A freshly ingested record expiring `retention` after `now`
    pub fn ingested(id: DocumentId, now: DateTime<Utc>, retention: chrono::Duration) -> Self {
        Self {
            id,
            status: DocumentStatus::Ingested,
            expiry: now + retention,
        }
    }

    /// Expiry as epoch seconds, the `ttl` attribute stores expire on
    pub fn ttl(&self) -> i64 {
        self.expiry.timestamp()
    }

    pub fn is_expired_at(&self, at: DateTime<Utc>) -> bool {
        self.expiry <= at
    }
}
