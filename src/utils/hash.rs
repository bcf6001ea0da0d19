//! Content hashing with FxHash.
//!
//! Used to tell whether a config file actually changed before re-parsing it.
//! Not stable across `rustc-hash` versions, so never persist the values.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// 64-bit hash of `data`.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
