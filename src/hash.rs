//! Bucket hashing: sum of code points reduced by the live capacity.

/// Maps `key` to a bucket in `[0, capacity)`.
///
/// The index is the sum of the key's Unicode scalar values modulo
/// `capacity`. Callers must always pass the map's current capacity; the
/// result is only meaningful for the bucket array it was computed against.
#[inline]
pub(crate) fn bucket_index(key: &str, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket_index on zero-capacity table");
    let sum = key
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(c)));
    (sum % capacity as u64) as usize
}
