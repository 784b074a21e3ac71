//! Seed collection served until the first write creates the data file.

use std::path::Path;

use models::{Puppy, PuppyData};
use tracing::info;

use crate::errors::ServiceError;

fn puppy(id: i64, name: &str, owner: &str, image: &str, breed: &str) -> Puppy {
    Puppy {
        id,
        name: name.to_string(),
        breed: breed.to_string(),
        owner: owner.to_string(),
        image: image.to_string(),
    }
}

/// Built-in seed: seven puppies.
pub fn default_puppies() -> PuppyData {
    PuppyData::new(vec![
        puppy(1, "Fido", "Fred", "/images/puppy1.jpg", "Labrador"),
        puppy(2, "Coco", "Chloe", "/images/puppy2.jpg", "Labrador"),
        puppy(3, "Magnum", "Michael", "/images/puppy3.jpg", "Rottweiler"),
        puppy(4, "Sephora", "Samuel", "/images/puppy4.jpg", "Dalmatian"),
        puppy(5, "Dirk", "Daniel", "/images/puppy5.jpg", "Border Collie"),
        puppy(6, "Lady", "Lucy", "/images/puppy6.jpg", "Pug"),
        puppy(7, "Chewy", "Chris", "/images/puppy7.jpg", "Greyhound"),
    ])
}

/// Read a seed collection from a JSON file. Unlike the data file, a missing
/// seed file is an error: it was configured explicitly.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<PuppyData, ServiceError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let data: PuppyData = serde_json::from_slice(&bytes)?;
    data.validate()?;
    info!(path = %path.display(), count = data.puppies.len(), "loaded seed collection");
    Ok(data)
}

/// Configured seed file if any, otherwise the built-in seed.
pub async fn resolve_seed(path: Option<&str>) -> Result<PuppyData, ServiceError> {
    match path {
        Some(p) => load_seed(p).await,
        None => Ok(default_puppies()),
    }
}
