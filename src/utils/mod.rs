//! Small helpers shared across modules.

pub mod hash;
