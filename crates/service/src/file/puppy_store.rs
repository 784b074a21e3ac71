use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use models::{Puppy, PuppyData, PuppyInput};
use tracing::info;

use crate::errors::ServiceError;
use crate::puppies::store::PuppyStore;
use crate::storage::json_document_store::JsonDocumentStore;

/// File-backed puppy store.
/// Keeps the whole collection as `{ "puppies": [...] }` in one JSON file and
/// falls back to the injected seed collection while that file does not exist.
pub struct FilePuppyStore {
    doc: JsonDocumentStore<PuppyData>,
}

impl FilePuppyStore {
    pub fn new<P: Into<PathBuf>>(path: P, seed: PuppyData) -> Arc<Self> {
        Arc::new(Self { doc: JsonDocumentStore::new(path, seed) })
    }

    pub fn data_path(&self) -> &Path {
        self.doc.path()
    }

    /// Read the collection from disk (or the seed if the file is missing).
    pub async fn load_collection(&self) -> Result<PuppyData, ServiceError> {
        self.doc.load().await
    }

    /// Look up one record by id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Puppy>, ServiceError> {
        let data = self.load_collection().await?;
        Ok(data.find(id).cloned())
    }

    /// Replace record `id` wholesale and rewrite the full collection.
    ///
    /// The stored id always comes from `id`; a body id that disagrees is
    /// rejected. An unknown id fails before anything is written.
    pub async fn update(&self, id: i64, input: PuppyInput) -> Result<Puppy, ServiceError> {
        input.check_identity(id)?;
        let puppy = input.into_puppy(id);
        let updated = self
            .doc
            .modify(move |data| {
                let idx = data
                    .position(id)
                    .ok_or_else(|| ServiceError::not_found(&format!("puppy {id}")))?;
                data.puppies[idx] = puppy.clone();
                Ok(puppy)
            })
            .await?;
        info!(puppy_id = id, path = %self.data_path().display(), "puppy updated");
        Ok(updated)
    }
}

#[async_trait::async_trait]
impl PuppyStore for FilePuppyStore {
    async fn load_collection(&self) -> Result<PuppyData, ServiceError> { self.load_collection().await }
    async fn get_by_id(&self, id: i64) -> Result<Option<Puppy>, ServiceError> { self.get_by_id(id).await }
    async fn update(&self, id: i64, input: PuppyInput) -> Result<Puppy, ServiceError> { self.update(id, input).await }
}
