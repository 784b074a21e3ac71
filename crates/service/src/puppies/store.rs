use crate::errors::ServiceError;
use async_trait::async_trait;
use models::{Puppy, PuppyData, PuppyInput};

/// Trait abstraction for puppy persistence.
/// Implementations re-read their backing storage on every call.
#[async_trait]
pub trait PuppyStore: Send + Sync {
    /// The whole collection in stored order, or the seed collection when nothing is stored yet.
    async fn load_collection(&self) -> Result<PuppyData, ServiceError>;
    /// `Ok(None)` when no record has this id.
    async fn get_by_id(&self, id: i64) -> Result<Option<Puppy>, ServiceError>;
    /// Replace the record with this id and persist the entire collection.
    async fn update(&self, id: i64, input: PuppyInput) -> Result<Puppy, ServiceError>;
}
