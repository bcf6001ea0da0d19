//! Cache Reconciler: keeps the path cache consistent with computed paths.
//!
//! | Module       | Purpose                                          |
//! |--------------|--------------------------------------------------|
//! | `protocol`   | Insert / revive / soft-expire after each build   |
//! | `invalidate` | Expire or delete rows on hierarchy mutations     |

mod invalidate;
mod protocol;

pub use invalidate::{ChangeKind, Invalidation, invalidate};
pub use protocol::{ReconcileOutcome, Reconciler};
