//! Page hierarchy: the collaborator trait and an in-memory implementation.
//!
//! | Module   | Purpose                                          |
//! |----------|--------------------------------------------------|
//! | `fields` | `TitleField` priority list entries               |
//! | `node`   | `PageNode`, `DocType`, shortcuts and mount points |
//! | `source` | `PageTree` trait, rootline derivation            |
//! | `memory` | `MemoryTree` arena                               |

mod fields;
mod memory;
mod node;
mod source;

pub use fields::TitleField;
pub use memory::MemoryTree;
pub use node::{DocType, MountPoint, PageNode, Shortcut};
pub use source::{MAX_ROOTLINE, MenuEntry, MenuMount, PageTree, RootlineEntry};
