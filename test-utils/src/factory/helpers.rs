//! Shared helper utilities for factory methods.

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Generates a unique Discord snowflake-like ID string.
///
/// # Returns
/// - `String` - Numeric ID that does not collide with other factory IDs
pub fn next_snowflake() -> String {
    (100_000_000_000_000_000 + next_id()).to_string()
}
