use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};

use crate::errors::ServiceError;

/// JSON file holding a single serializable document.
///
/// Every `load` re-reads the file; nothing is cached. A missing file yields a
/// clone of the fallback document, any other read or parse failure is an
/// error. Writes go to a `.tmp` sibling that is then renamed over the target,
/// and `modify` holds a mutex across load, mutation and write so writers in
/// this process cannot lose each other's updates.
pub struct JsonDocumentStore<T> {
    file_path: PathBuf,
    fallback: T,
    write_lock: Mutex<()>,
}

impl<T> JsonDocumentStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync,
{
    pub fn new<P: Into<PathBuf>>(path: P, fallback: T) -> Self {
        Self { file_path: path.into(), fallback, write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the document, substituting the fallback only when the file does not exist.
    pub async fn load(&self) -> Result<T, ServiceError> {
        match fs::read(&self.file_path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.file_path.display(), "document file missing, using fallback");
                Ok(self.fallback.clone())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load, apply `f`, and write the result back. If `f` fails nothing is written.
    pub async fn modify<R, F>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.write(&doc).await?;
        Ok(out)
    }

    async fn write(&self, doc: &T) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(doc)?;
        let tmp = self.tmp_path();
        let written = match fs::write(&tmp, &data).await {
            Ok(()) => fs::rename(&tmp, &self.file_path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // partial tmp file; a directory in its place is left alone
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!(path = %self.file_path.display(), bytes = data.len(), "document written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.file_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}
