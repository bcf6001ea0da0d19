//! Path Builder: from a page reference to its speaking path.
//!
//! | Module     | Purpose                                             |
//! |------------|-----------------------------------------------------|
//! | `context`  | `ResolutionContext`, request-scoped memo            |
//! | `shortcut` | Shortcut chains with cycle and hop limits           |
//! | `rootline` | Rootline to path, cached prefixes and cache trust   |
//! | `path`     | `PathBuilder` tying lookup, walk and reconcile      |

mod context;
mod path;
mod rootline;
mod shortcut;

pub use context::{PathRecord, ResolutionContext};
pub use path::{PageRef, PathBuilder};
pub use rootline::{CacheTrust, RootlineWalk};
pub use shortcut::{ShortcutTarget, resolve_shortcuts};
