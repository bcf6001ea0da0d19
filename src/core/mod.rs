//! Core types - pure abstractions shared across the codebase.

mod ids;
mod mount;
mod path;
mod time;

pub use ids::{CacheId, LanguageId, PageId, RootId};
pub use mount::MountContext;
pub use path::{PagePath, split_request_path};
pub use time::{Clock, DAY, ManualClock, SystemClock, day_floor, expiry_after_days};
