//! Local filesystem namespace: a directory tree whose regular files are documents.
//!
//! Keys are `/`-separated paths relative to the root, listed in lexicographic
//! order. The continuation token is the last key of the previous page.
//!
//! The tree is walked once per listing: the first page takes a sorted snapshot
//! of every key and continuation pages are sliced from it. Files whose names
//! are not valid UTF-8 have no faithful key and are skipped with a warning.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::warn;

use super::{ListPage, ObjectNamespace};
use crate::constants::defaults;
use crate::error::{IngestError, IngestResult};

#[derive(Debug, Clone)]
pub struct FsNamespace {
    name: String,
    root: PathBuf,
    page_size: usize,
    snapshot: Arc<Mutex<Option<Arc<Vec<String>>>>>,
}

impl FsNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            name: root.display().to_string(),
            root,
            page_size: defaults::NAMESPACE_PAGE_SIZE,
            snapshot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn walk(&self) -> IngestResult<Vec<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || collect_keys(&root))
            .await
            .map_err(|e| IngestError::enumeration(&self.name, e.to_string()))?
            .map_err(|e| IngestError::enumeration(&self.name, e.to_string()))
    }
}

fn collect_keys(root: &Path) -> std::io::Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                let Ok(relative) = path.strip_prefix(root) else {
                    continue;
                };
                let parts: Option<Vec<&str>> = relative
                    .components()
                    .map(|c| c.as_os_str().to_str())
                    .collect();
                match parts {
                    Some(parts) => keys.push(parts.join("/")),
                    None => warn!(path = %path.display(), "Skipping file with a non UTF-8 name"),
                }
            }
        }
    }

    keys.sort();
    Ok(keys)
}

#[async_trait]
impl ObjectNamespace for FsNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_page(&self, continuation: Option<&str>) -> IngestResult<ListPage> {
        let cached = match continuation {
            None => None,
            Some(_) => self.snapshot.lock().clone(),
        };
        let keys = match cached {
            Some(keys) => keys,
            None => {
                let keys = Arc::new(self.walk().await?);
                *self.snapshot.lock() = Some(keys.clone());
                keys
            }
        };

        let start = match continuation {
            None => 0,
            Some(after) => keys.partition_point(|key| key.as_str() <= after),
        };
        let page: Vec<String> = keys.iter().skip(start).take(self.page_size).cloned().collect();
        let continuation = if start + page.len() < keys.len() {
            page.last().cloned()
        } else {
            None
        };

        Ok(ListPage {
            keys: page.into_iter().map(Some).collect(),
            continuation,
        })
    }
}
