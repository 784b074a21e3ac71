//! Service layer: the flat-file puppy store.
//! - `storage` holds the generic JSON document file with fallback and atomic writes.
//! - `puppies` defines the store interface the HTTP layer depends on.
//! - `file` provides the file-backed implementation, `seed` the fallback collection.

pub mod errors;
pub mod storage;
pub mod puppies;
pub mod file;
pub mod seed;
