//! Pagination limit for the activity feed.
//!
//! Document listing and search deliberately return the full set, so the
//! only clamped limit in the system is the feed's.

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

/// Clamp a caller-supplied limit into `1..=max`, falling back to
/// `default` when absent or non-positive.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(n) if n >= 1 => n.min(max),
        _ => default,
    }
}
