use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::types::{Document, StoreKey};
use crate::error::Result;

/// Insert-only document store.
///
/// `find_one` returns the first inserted match. There is no update or delete
/// path and no uniqueness constraint: concurrent misses on the same key may
/// insert duplicates, which first-match reads tolerate.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, key: &StoreKey) -> Option<Document>;
    async fn insert_one(&self, doc: Document) -> Result<Uuid>;
    async fn find_many(&self, key: &StoreKey) -> Vec<Document>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, key: &StoreKey) -> Option<Document> {
        let documents = self.documents.read().await;
        documents.iter().find(|doc| doc.matches(key)).cloned()
    }

    async fn insert_one(&self, doc: Document) -> Result<Uuid> {
        let id = doc.id;
        self.documents.write().await.push(doc);
        Ok(id)
    }

    async fn find_many(&self, key: &StoreKey) -> Vec<Document> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .filter(|doc| doc.matches(key))
            .cloned()
            .collect()
    }
}

/// File-backed store: documents live in memory and every insert is written
/// through to disk, so there is no background flush task to manage.
#[derive(Clone)]
pub struct FileStore {
    path: PathBuf,
    documents: Arc<RwLock<Vec<Document>>>,
}

impl FileStore {
    /// Opens the store, loading any previously persisted documents. A file
    /// that fails to decode starts the store fresh rather than erroring.
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => match bincode::deserialize::<Vec<Document>>(&bytes) {
                Ok(docs) => {
                    info!(count = docs.len(), path = %path.display(), "loaded document store");
                    docs
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "store file failed to decode, starting fresh");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Ok(Self {
            path,
            documents: Arc::new(RwLock::new(documents)),
        })
    }

    async fn persist(&self, documents: &[Document]) -> Result<()> {
        let serialized = bincode::serialize(&documents)?;

        // Temp file + rename so a crash mid-write never corrupts the store.
        let temp_path = self.path.with_extension("bin.tmp");
        tokio::fs::write(&temp_path, serialized).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn find_one(&self, key: &StoreKey) -> Option<Document> {
        let documents = self.documents.read().await;
        documents.iter().find(|doc| doc.matches(key)).cloned()
    }

    async fn insert_one(&self, doc: Document) -> Result<Uuid> {
        let id = doc.id;
        let mut documents = self.documents.write().await;
        documents.push(doc);
        self.persist(&documents).await?;
        Ok(id)
    }

    async fn find_many(&self, key: &StoreKey) -> Vec<Document> {
        let documents = self.documents.read().await;
        documents
            .iter()
            .filter(|doc| doc.matches(key))
            .cloned()
            .collect()
    }
}
