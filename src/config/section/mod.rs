//! Configuration section definitions.
//!
//! Each module corresponds to a section in `speaking-url.toml`:
//!
//! | Module      | TOML Section   | Purpose                                 |
//! |-------------|----------------|-----------------------------------------|
//! | `encode`    | `[encode]`     | Title to segment conversion             |
//! | `tree`      | `[tree]`       | Root page, exclusions, shortcuts        |
//! | `cache`     | `[cache]`      | Path cache expiry and persistence       |
//! | `post_vars` | `[post_vars]`  | Trailing parameter segment names        |

mod cache;
mod encode;
mod post_vars;
mod tree;

pub use cache::CacheConfig;
pub use encode::{EncodeConfig, Separator};
pub use post_vars::{FixedPostVars, PostVarsConfig};
pub use tree::TreeConfig;
