pub mod file;
pub mod memory;
pub mod store;
pub mod tier;

pub use file::FileTier;
pub use memory::MemoryTier;
pub use store::{keys, CacheStore};
pub use tier::{CacheError, CacheTier};
