//! In-memory vector index with optional JSON persistence.
//!
//! Documents live in a `Vec` and every query is a linear scan, which stays
//! fast for a personal chat archive. When a path is configured the index is
//! loaded from it at construction and written back on [`VectorIndex::persist`].

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use contextor_core::error::IndexError;
use contextor_core::{IndexedDocument, VectorIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::vector::top_k;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    documents: Vec<IndexedDocument>,
}

#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    documents: Vec<IndexedDocument>,
    path: Option<PathBuf>,
    restored: bool,
}

impl InMemoryVectorIndex {
    /// A volatile index.
    pub fn new() -> Self {
        Self::default()
    }

    /// An index backed by `path`. An existing snapshot is loaded; a missing
    /// or unreadable one starts empty.
    pub fn persistent(path: PathBuf) -> Self {
        let documents = Self::load_from_disk(&path);
        let restored = documents.is_some();
        let documents = documents.unwrap_or_default();
        debug!(path = %path.display(), count = documents.len(), restored, "Vector index loaded");
        Self {
            documents,
            path: Some(path),
            restored,
        }
    }

    fn load_from_disk(path: &Path) -> Option<Vec<IndexedDocument>> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => Some(snapshot.documents),
            Ok(snapshot) => {
                warn!(version = snapshot.version, "Ignoring index snapshot with unknown version");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring corrupted index snapshot");
                None
            }
        }
    }

    fn dimension(&self) -> Option<usize> {
        self.documents.first().map(|d| d.embedding.len())
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn add(&mut self, documents: Vec<IndexedDocument>) -> Result<(), IndexError> {
        let expected = self
            .dimension()
            .or_else(|| documents.first().map(|d| d.embedding.len()));
        if let Some(expected) = expected {
            if let Some(bad) = documents.iter().find(|d| d.embedding.len() != expected) {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: bad.embedding.len(),
                });
            }
        }
        self.documents.extend(documents);
        Ok(())
    }

    async fn nearest_neighbors(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<IndexedDocument>, IndexError> {
        if let Some(expected) = self.dimension() {
            if expected != query.len() {
                return Err(IndexError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }
        Ok(top_k(&self.documents, query, k)
            .into_iter()
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn count(&self) -> Result<usize, IndexError> {
        Ok(self.documents.len())
    }

    async fn clear(&mut self) -> Result<(), IndexError> {
        self.documents.clear();
        Ok(())
    }

    async fn persist(&self) -> Result<(), IndexError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                IndexError::Storage(format!("Failed to create index directory: {e}"))
            })?;
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            documents: self.documents.clone(),
        };
        let content = serde_json::to_string(&snapshot)
            .map_err(|e| IndexError::Storage(format!("Failed to serialize index: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| IndexError::Storage(format!("Failed to write index file: {e}")))?;

        debug!(path = %path.display(), count = self.documents.len(), "Vector index persisted");
        Ok(())
    }

    fn restored(&self) -> bool {
        self.restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contextor_core::DocumentMetadata;

    fn doc(content: &str, embedding: Vec<f32>) -> IndexedDocument {
        IndexedDocument {
            content: content.into(),
            embedding,
            metadata: DocumentMetadata {
                conversation_id: "chat".into(),
                message_count: 2,
                last_updated: None,
                source_file: "chat.json".into(),
                chunk_kind: None,
            },
        }
    }

    #[tokio::test]
    async fn add_and_query() {
        let mut index = InMemoryVectorIndex::new();
        index
            .add(vec![doc("x", vec![1.0, 0.0]), doc("y", vec![0.0, 1.0])])
            .await
            .unwrap();
        assert_eq!(index.count().await.unwrap(), 2);

        let hits = index.nearest_neighbors(&[0.1, 1.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "y");
    }

    #[tokio::test]
    async fn mismatched_dimensions_are_rejected() {
        let mut index = InMemoryVectorIndex::new();
        index.add(vec![doc("x", vec![1.0, 0.0])]).await.unwrap();

        let err = index.add(vec![doc("z", vec![1.0])]).await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));

        let err = index.nearest_neighbors(&[1.0, 0.0, 0.0], 1).await.unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[tokio::test]
    async fn clear_empties_index() {
        let mut index = InMemoryVectorIndex::new();
        index.add(vec![doc("x", vec![1.0])]).await.unwrap();
        index.clear().await.unwrap();
        assert_eq!(index.count().await.unwrap(), 0);
        assert!(index.nearest_neighbors(&[1.0], 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");

        let mut index = InMemoryVectorIndex::persistent(path.clone());
        assert!(!index.restored());
        index.add(vec![doc("kept", vec![0.5, 0.5])]).await.unwrap();
        index.persist().await.unwrap();

        let reloaded = InMemoryVectorIndex::persistent(path);
        assert!(reloaded.restored());
        assert_eq!(reloaded.count().await.unwrap(), 1);
        let hits = reloaded.nearest_neighbors(&[1.0, 1.0], 5).await.unwrap();
        assert_eq!(hits[0].content, "kept");
    }

    #[tokio::test]
    async fn corrupted_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{not json").unwrap();

        let index = InMemoryVectorIndex::persistent(path);
        assert!(!index.restored());
        assert_eq!(index.count().await.unwrap(), 0);
    }
}
