use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use crate::cache::tier::{CacheError, CacheTier};

/// File-system tier for large binary payloads (extracted features,
/// end-state blobs). Entries live under a root directory; an optional
/// sidecar file records the expiry timestamp.
pub struct FileTier {
    root: PathBuf,
}

impl FileTier {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache keys contain `:` separators; map them to a flat, safe filename.
    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.bin", sanitize(key)))
    }

    fn expiry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.ttl", sanitize(key)))
    }

    /// Read the sidecar; absent sidecar means the entry never expires.
    fn is_expired(&self, key: &str) -> Result<bool, CacheError> {
        let path = self.expiry_path(key);
        if !path.exists() {
            return Ok(false);
        }
        let content = std::fs::read_to_string(&path)?;
        match content.trim().parse::<i64>() {
            Ok(expires_at) => Ok(Utc::now().timestamp() >= expires_at),
            // Unreadable sidecar: treat the entry as expired and let it be rewritten
            Err(_) => Ok(true),
        }
    }

    fn remove_entry(&self, key: &str) -> Result<(), CacheError> {
        remove_if_exists(&self.blob_path(key))?;
        remove_if_exists(&self.expiry_path(key))?;
        Ok(())
    }
}

fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

impl CacheTier for FileTier {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.blob_path(key);
        if !path.exists() {
            return Ok(None);
        }
        if self.is_expired(key)? {
            self.remove_entry(key)?;
            return Ok(None);
        }
        Ok(Some(std::fs::read(&path)?))
    }

    fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.blob_path(key), value)?;
        match ttl {
            Some(ttl) => {
                let expires_at = Utc::now().timestamp() + ttl.as_secs() as i64;
                std::fs::write(self.expiry_path(key), expires_at.to_string())?;
            }
            None => remove_if_exists(&self.expiry_path(key))?,
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.blob_path(key).exists() && !self.is_expired(key)?)
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.remove_entry(key)
    }
}
