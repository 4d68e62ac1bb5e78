//! # Document Identifiers and Batches

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque path-like identifier of one document.
///
/// Unique within a namespace and comparable across namespaces, which is what makes
/// the raw-input/processed-output diff possible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build an id from a listing entry, dropping null or blank keys
    pub fn from_listing(key: Option<&str>) -> Option<Self> {
        match key {
            Some(key) if !key.trim().is_empty() => Some(Self(key.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, bounded slice of the candidate set handed to one fan-out worker.
///
/// Serializes as a plain JSON array of id strings, which is the worker's invocation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Batch {
    documents: Vec<DocumentId>,
}

impl Batch {
    pub fn new(documents: Vec<DocumentId>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[DocumentId] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DocumentId> {
        self.documents.iter()
    }

    pub fn into_documents(self) -> Vec<DocumentId> {
        self.documents
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a DocumentId;
    type IntoIter = std::slice::Iter<'a, DocumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl FromIterator<DocumentId> for Batch {
    fn from_iter<I: IntoIterator<Item = DocumentId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
