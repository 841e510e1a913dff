//! Host-side storage for binary attachments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::{NodeError, NodeResult};
use crate::item::BinaryData;

/// Storage that holds attachment content referenced by id.
#[async_trait]
pub trait BinaryStore: Send + Sync {
    /// Read the content stored under `id`.
    async fn read(&self, id: &str) -> NodeResult<Vec<u8>>;
}

/// Read an attachment's bytes.
///
/// A stored reference is preferred; the inline base64 content is used when
/// the attachment has no id.
pub async fn read_attachment<S>(store: &S, binary: &BinaryData) -> NodeResult<Vec<u8>>
where
    S: BinaryStore + ?Sized,
{
    match binary.id.as_deref() {
        Some(id) => store.read(id).await,
        None => binary.decode_inline(),
    }
}

/// In-memory store, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(id.into(), bytes);
    }
}

#[async_trait]
impl BinaryStore for MemoryStore {
    async fn read(&self, id: &str) -> NodeResult<Vec<u8>> {
        self.entries.get(id).cloned().ok_or_else(|| NodeError::Store {
            id: id.to_string(),
            message: "no such entry".to_string(),
        })
    }
}

/// Store backed by files under a root directory; ids are relative paths.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, id: &str) -> NodeResult<PathBuf> {
        let relative = Path::new(id);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(NodeError::Store {
                id: id.to_string(),
                message: "id must be a relative path inside the store".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BinaryStore for FsStore {
    async fn read(&self, id: &str) -> NodeResult<Vec<u8>> {
        let path = self.resolve(id)?;
        tokio::fs::read(&path).await.map_err(|e| NodeError::Store {
            id: id.to_string(),
            message: e.to_string(),
        })
    }
}
