use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::cache::tier::{CacheError, CacheTier};

/// Process-local in-memory tier, fastest in the chain.
pub struct MemoryTier {
    entries: RwLock<HashMap<String, Entry>>,
}

struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

impl MemoryTier {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn read_entries(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryTier {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheTier for MemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.read_entries();
            match entries.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Entry expired; drop it so the map does not grow unbounded
        self.write_entries().remove(key);
        Ok(None)
    }

    fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = Entry {
            value: value.to_vec(),
            expires_at: ttl.map(|t| Instant::now() + t),
        };
        self.write_entries().insert(key.to_string(), entry);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let now = Instant::now();
        Ok(self
            .read_entries()
            .get(key)
            .is_some_and(|e| !e.is_expired(now)))
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.write_entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_roundtrip() {
        let tier = MemoryTier::new();
        tier.set("k", b"value", None).unwrap();
        assert_eq!(tier.get("k").unwrap(), Some(b"value".to_vec()));
        assert!(tier.exists("k").unwrap());
    }

    #[test]
    fn test_missing_key_is_absent() {
        let tier = MemoryTier::new();
        assert_eq!(tier.get("nope").unwrap(), None);
        assert!(!tier.exists("nope").unwrap());
    }

    #[test]
    fn test_expired_entry_reads_as_absent() {
        let tier = MemoryTier::new();
        tier.set("k", b"v", Some(Duration::ZERO)).unwrap();
        assert_eq!(tier.get("k").unwrap(), None);
        assert!(!tier.exists("k").unwrap());
    }

    #[test]
    fn test_delete_removes_entry() {
        let tier = MemoryTier::new();
        tier.set("k", b"v", None).unwrap();
        tier.delete("k").unwrap();
        assert_eq!(tier.get("k").unwrap(), None);
    }
}
