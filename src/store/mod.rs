//! Path cache store.
//!
//! | Module     | Purpose                                         |
//! |------------|-------------------------------------------------|
//! | `entry`    | `CacheKey`, `PathCacheEntry`                    |
//! | `source`   | `PathCacheStore` trait                          |
//! | `locks`    | Per-key critical sections                       |
//! | `memory`   | `MemoryStore` with secondary indexes            |
//! | `snapshot` | Versioned JSON snapshot and sweep marker files  |

mod entry;
mod locks;
mod memory;
mod snapshot;
mod source;

pub use entry::{CacheKey, PathCacheEntry};
pub use locks::{KeyGuard, KeyLocks};
pub use memory::MemoryStore;
pub use snapshot::{SNAPSHOT_FILE, SNAPSHOT_VERSION, SWEEP_MARKER_FILE};
pub use source::PathCacheStore;
