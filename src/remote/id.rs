//! Remote object id allocation.
//!
//! Ids are unique for the lifetime of the process and never reused, across
//! all sessions. The counter is a process-global atomic so concurrent
//! sessions cannot hand out the same id.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a fresh id with the given prefix, e.g. `w17`.
pub fn allocate_id(prefix: &str) -> String {
    let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{n}")
}
