use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A single puppy record.
///
/// `id` is assigned when the record is created and never changes; the other
/// four fields are editable and always present (possibly empty).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Puppy {
    pub id: i64,
    pub name: String,
    pub breed: String,
    pub owner: String,
    pub image: String,
}

/// The persisted collection: `{ "puppies": [...] }`, in file order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuppyData {
    pub puppies: Vec<Puppy>,
}

impl PuppyData {
    pub fn new(puppies: Vec<Puppy>) -> Self {
        Self { puppies }
    }

    /// Linear lookup by identity.
    pub fn find(&self, id: i64) -> Option<&Puppy> {
        self.puppies.iter().find(|p| p.id == id)
    }

    /// Index of the record with the given identity.
    pub fn position(&self, id: i64) -> Option<usize> {
        self.puppies.iter().position(|p| p.id == id)
    }

    /// Identities must be unique across the collection.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.puppies.len());
        for p in &self.puppies {
            if !seen.insert(p.id) {
                return Err(ModelError::Validation(format!("duplicate puppy id {}", p.id)));
            }
        }
        Ok(())
    }
}

/// Replacement body for an update. `id` may be omitted; the path id is authoritative.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PuppyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub breed: String,
    pub owner: String,
    pub image: String,
}

impl PuppyInput {
    /// Reject a body whose `id` disagrees with the id it is addressed to.
    pub fn check_identity(&self, path_id: i64) -> Result<(), ModelError> {
        match self.id {
            Some(body_id) if body_id != path_id => Err(ModelError::Validation(format!(
                "body id {body_id} does not match path id {path_id}"
            ))),
            _ => Ok(()),
        }
    }

    pub fn into_puppy(self, id: i64) -> Puppy {
        Puppy {
            id,
            name: self.name,
            breed: self.breed,
            owner: self.owner,
            image: self.image,
        }
    }
}
