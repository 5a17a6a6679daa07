//! Storage abstractions for snapshot persistence.
//!
//! The cache persists one document, the identity snapshot:
//!
//! ```text
//! storage/
//! ├── config.toml           # Crawler configuration
//! └── cache.json            # { lastUpdated, groups, teachers }
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CacheSnapshot;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the persisted snapshot.
    ///
    /// `Ok(None)` when nothing has been persisted yet; an error when the
    /// stored data cannot be read or parsed.
    async fn load(&self) -> Result<Option<CacheSnapshot>>;

    /// Replace the persisted snapshot.
    async fn persist(&self, snapshot: &CacheSnapshot) -> Result<()>;
}
