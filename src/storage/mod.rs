//! # Document Namespaces
//!
//! A namespace is a flat, enumerable collection of documents addressed by
//! path-like keys (a bucket, a directory tree). Enumeration is paginated and
//! unbounded; callers drive the continuation token until it runs out.

mod filesystem;
mod in_memory;

use async_trait::async_trait;

use crate::error::{IngestError, IngestResult};

pub use filesystem::FsNamespace;
pub use in_memory::InMemoryNamespace;

/// One page of a namespace listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Keys as the backend reports them; backends may report null entries
    pub keys: Vec<Option<String>>,
    /// Token for the next page, `None` on the last page
    pub continuation: Option<String>,
}

/// Paginated, read-only enumeration of a document namespace
#[async_trait]
pub trait ObjectNamespace: Send + Sync + 'static {
    /// Namespace name, used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the page following `continuation` (the first page when `None`)
    async fn list_page(&self, continuation: Option<&str>) -> IngestResult<ListPage>;
}

/// Drain every page of a namespace, in listing order
pub async fn list_all(namespace: &dyn ObjectNamespace) -> IngestResult<Vec<Option<String>>> {
    let mut keys = Vec::new();
    let mut continuation: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = namespace.list_page(continuation.as_deref()).await?;
        pages += 1;
        keys.extend(page.keys);
        match page.continuation {
            Some(next) if Some(&next) == continuation.as_ref() => {
                return Err(IngestError::enumeration(
                    namespace.name(),
                    format!("continuation token did not advance: {next}"),
                ));
            }
            Some(next) => continuation = Some(next),
            None => break,
        }
    }

    tracing::debug!(
        namespace = %namespace.name(),
        pages = pages,
        keys = keys.len(),
        "Namespace enumerated"
    );
    Ok(keys)
}
