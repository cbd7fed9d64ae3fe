use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::file::FileTier;
use crate::cache::memory::MemoryTier;
use crate::cache::tier::CacheTier;

/// Payloads above this size skip the fast tiers and live in the file tier
/// only.
const BLOB_THRESHOLD: usize = 64 * 1024;

/// Tiered cache store: fast tiers first (memory, then an optional
/// distributed tier), file tier last for large blobs.
///
/// Reads try tiers in order and promote hits upward so subsequent reads are
/// fast. Writes go to every eligible tier. A failing tier is logged and
/// skipped; a cache outage never fails the caller.
pub struct CacheStore {
    fast_tiers: Vec<Box<dyn CacheTier>>,
    blob_tier: Box<dyn CacheTier>,
}

impl CacheStore {
    /// Build the default memory + file chain.
    pub fn new(memory: MemoryTier, file: FileTier) -> Self {
        Self {
            fast_tiers: vec![Box::new(memory)],
            blob_tier: Box::new(file),
        }
    }

    /// Slot a distributed tier between memory and the file tier.
    pub fn with_distributed(mut self, tier: Box<dyn CacheTier>) -> Self {
        self.fast_tiers.push(tier);
        self
    }

    /// Read a key, trying each tier in order. A hit at a lower tier is
    /// promoted into the tiers above it.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        for (i, tier) in self.tiers().enumerate() {
            match tier.get(key) {
                Ok(Some(value)) => {
                    debug!("Cache hit for {} at tier {}", key, tier.name());
                    self.promote(key, &value, i);
                    return Some(value);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Cache tier {} failed on get({}): {}", tier.name(), key, e);
                }
            }
        }
        None
    }

    /// Write a key to every eligible tier. Large payloads route to the file
    /// tier only.
    pub fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) {
        if value.len() <= BLOB_THRESHOLD {
            for tier in &self.fast_tiers {
                if let Err(e) = tier.set(key, value, ttl) {
                    warn!("Cache tier {} failed on set({}): {}", tier.name(), key, e);
                }
            }
        }
        if let Err(e) = self.blob_tier.set(key, value, ttl) {
            warn!(
                "Cache tier {} failed on set({}): {}",
                self.blob_tier.name(),
                key,
                e
            );
        }
    }

    /// Whether any tier holds a live entry for the key.
    pub fn exists(&self, key: &str) -> bool {
        self.tiers().any(|tier| match tier.exists(key) {
            Ok(found) => found,
            Err(e) => {
                warn!("Cache tier {} failed on exists({}): {}", tier.name(), key, e);
                false
            }
        })
    }

    /// Remove a key from every tier.
    pub fn delete(&self, key: &str) {
        for tier in self.tiers() {
            if let Err(e) = tier.delete(key) {
                warn!("Cache tier {} failed on delete({}): {}", tier.name(), key, e);
            }
        }
    }

    /// Typed read via serde_json.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.get(key)?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                // A corrupt entry is as good as a miss; drop it
                warn!("Cache entry {} failed to deserialize: {}", key, e);
                self.delete(key);
                None
            }
        }
    }

    /// Typed write via serde_json.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.set(key, &bytes, ttl),
            Err(e) => warn!("Failed to serialize cache entry {}: {}", key, e),
        }
    }

    /// All tiers in read order.
    fn tiers(&self) -> impl Iterator<Item = &dyn CacheTier> {
        self.fast_tiers
            .iter()
            .map(|t| t.as_ref())
            .chain(std::iter::once(self.blob_tier.as_ref()))
    }

    /// Copy a hit found at tier `found_at` into every faster tier.
    fn promote(&self, key: &str, value: &[u8], found_at: usize) {
        if value.len() > BLOB_THRESHOLD {
            return;
        }
        for tier in self.fast_tiers.iter().take(found_at) {
            if let Err(e) = tier.set(key, value, None) {
                warn!(
                    "Cache tier {} failed on promote({}): {}",
                    tier.name(),
                    key,
                    e
                );
            }
        }
    }
}

/// Cache keys are derived deterministically from ids so re-ingestion is
/// idempotent across processes.
pub mod keys {
    /// Completed team profile.
    pub fn team_profile(team_id: &str) -> String {
        format!("team:{}:profile", team_id)
    }

    /// Marker written when aggregation found zero usable series.
    pub fn team_no_data(team_id: &str) -> String {
        format!("team:{}:no-data", team_id)
    }

    /// Raw end-state payload for a series (immutable).
    pub fn series_end_state(series_id: &str) -> String {
        format!("series:{}:end-state", series_id)
    }

    /// Extracted per-game feature records for a series (immutable).
    pub fn series_features(series_id: &str) -> String {
        format!("series:{}:features", series_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tier::CacheError;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    /// Distributed tier stand-in that is always unreachable.
    struct UnreachableTier;

    impl CacheTier for UnreachableTier {
        fn name(&self) -> &'static str {
            "distributed"
        }
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        fn exists(&self, _key: &str) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
        fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    fn store(dir: &TempDir) -> CacheStore {
        CacheStore::new(MemoryTier::new(), FileTier::new(dir.path()))
    }

    #[test]
    fn test_roundtrip_through_chain() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.set("k", b"v", None);
        assert_eq!(store.get("k"), Some(b"v".to_vec()));
        assert!(store.exists("k"));
    }

    #[test]
    fn test_file_hit_promoted_to_memory() {
        let dir = TempDir::new().unwrap();
        // Seed the file tier directly, bypassing memory
        FileTier::new(dir.path()).set("k", b"v", None).unwrap();

        let memory = MemoryTier::new();
        let store = CacheStore::new(memory, FileTier::new(dir.path()));
        assert_eq!(store.get("k"), Some(b"v".to_vec()));

        // Remove the file; the promoted copy must still serve reads
        std::fs::remove_file(dir.path().join("k.bin")).unwrap();
        assert_eq!(store.get("k"), Some(b"v".to_vec()));
    }

    #[test]
    fn test_unreachable_distributed_tier_degrades_silently() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).with_distributed(Box::new(UnreachableTier));
        store.set("k", b"v", None);
        assert_eq!(store.get("k"), Some(b"v".to_vec()));
        store.delete("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_large_payload_routes_to_file_tier_only() {
        let dir = TempDir::new().unwrap();
        let blob = vec![7u8; BLOB_THRESHOLD + 1];
        let store = store(&dir);
        store.set("blob", &blob, None);

        // Readable through the chain, but only the file tier holds it
        assert_eq!(store.get("blob"), Some(blob.clone()));
        assert!(dir.path().join("blob.bin").exists());

        let memory_only = MemoryTier::new();
        assert_eq!(memory_only.get("blob").unwrap(), None);
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: String,
        count: u32,
    }

    #[test]
    fn test_json_roundtrip_field_for_field() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let payload = Payload {
            id: "t1".into(),
            count: 9,
        };
        store.set_json("k", &payload, None);
        assert_eq!(store.get_json::<Payload>("k"), Some(payload));
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        assert_eq!(keys::team_profile("t1"), "team:t1:profile");
        assert_eq!(keys::series_end_state("s9"), "series:s9:end-state");
        assert_eq!(keys::series_features("s9"), "series:s9:features");
        assert_eq!(keys::team_no_data("t1"), "team:t1:no-data");
    }
}
