use std::sync::atomic::{AtomicU64, Ordering};

use crate::util::time::timestamp_millis;

// Last millisecond value handed out, shared by every document in the process
static LAST_LAYER_STAMP: AtomicU64 = AtomicU64::new(0);

/// Returns a timestamp-derived stamp that is strictly greater than any stamp
/// returned before, even when called twice within the same millisecond.
pub fn next_stamp() -> u64 {
    let now = timestamp_millis();
    let mut last = LAST_LAYER_STAMP.load(Ordering::SeqCst);
    loop {
        let next = now.max(last + 1);
        match LAST_LAYER_STAMP.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}
