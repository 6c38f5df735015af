//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
///
/// Starts at 1000 so generated IDs never collide with the sentinel row (ID 0) or the
/// small hand-picked IDs tests tend to use.
static COUNTER: std::sync::atomic::AtomicI64 = std::sync::atomic::AtomicI64::new(1000);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `i64` - Next unique counter value
pub fn next_id() -> i64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}
