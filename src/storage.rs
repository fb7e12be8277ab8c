//! Uploaded files on local disk, served read-only under `/files` to
//! authenticated callers.

use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::multipart::UploadedFile;

pub const PUBLIC_PREFIX: &str = "/files";

pub const DOCUMENTS: &str = "documents";
pub const CESANTIAS: &str = "cesantias";
pub const SOLICITUDES: &str = "solicitudes";

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub url: String,
    pub sha256: String,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `file` would be stored under `folder`, without writing it.
    pub fn locate(&self, folder: &str, file: &UploadedFile) -> StoredObject {
        let (sha256, name) = object_name(file);
        StoredObject {
            url: format!("{PUBLIC_PREFIX}/{folder}/{name}"),
            sha256,
        }
    }

    /// Store `file` under `folder`, named by its content hash and extension.
    /// Identical uploads with the same extension share one file.
    pub async fn save(&self, folder: &str, file: &UploadedFile) -> Result<StoredObject, String> {
        let (sha256, name) = object_name(file);

        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;

        let path = dir.join(&name);
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;

        tracing::debug!("Stored {} ({} bytes)", path.display(), file.data.len());

        Ok(StoredObject {
            url: format!("{PUBLIC_PREFIX}/{folder}/{name}"),
            sha256,
        })
    }

    /// Remove the file behind a public URL. A file already gone is not an error.
    pub async fn remove(&self, url: &str) -> Result<(), String> {
        let path = self
            .resolve(url)
            .ok_or_else(|| format!("Not a stored file: {url}"))?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Failed to remove {}: {e}", path.display())),
        }
    }

    /// Disk path of a public URL; `None` for anything escaping the root.
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.strip_prefix(PUBLIC_PREFIX)?.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && relative.components().next().is_some()).then(|| self.root.join(relative))
    }
}

fn object_name(file: &UploadedFile) -> (String, String) {
    let sha256 = hex::encode(Sha256::digest(&file.data));
    let name = match extension(&file.filename) {
        Some(ext) => format!("{sha256}.{ext}"),
        None => sha256.clone(),
    };
    (sha256, name)
}

/// Lowercase alphanumeric extension of at most 8 characters.
fn extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
    (!ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}
