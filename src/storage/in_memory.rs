//! In-memory namespace for tests and local runs.

use async_trait::async_trait;

use super::{ListPage, ObjectNamespace};
use crate::constants::defaults;
use crate::error::{IngestError, IngestResult};

/// Namespace over a fixed list of keys, paginated by position.
///
/// Keys are listed in the order given; `None` entries model null keys some
/// backends return.
#[derive(Debug, Clone)]
pub struct InMemoryNamespace {
    name: String,
    keys: Vec<Option<String>>,
    page_size: usize,
}

impl InMemoryNamespace {
    pub fn new<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(|k| Some(k.into())).collect(),
            page_size: defaults::NAMESPACE_PAGE_SIZE,
        }
    }

    /// Namespace whose listing may contain null entries
    pub fn with_raw_keys(name: impl Into<String>, keys: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            keys,
            page_size: defaults::NAMESPACE_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

#[async_trait]
impl ObjectNamespace for InMemoryNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_page(&self, continuation: Option<&str>) -> IngestResult<ListPage> {
        let start = match continuation {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                IngestError::enumeration(&self.name, format!("invalid continuation token: {token}"))
            })?,
        };
        let end = (start + self.page_size).min(self.keys.len());
        let keys = self.keys.get(start..end).unwrap_or_default().to_vec();
        let continuation = (end < self.keys.len()).then(|| end.to_string());

        Ok(ListPage { keys, continuation })
    }
}
