//! Sticky partitioning
//!
//! Maps an arbitrary string (user name, session id, header value) onto one of
//! `N` logical partitions using Bob Jenkins' one-at-a-time hash. The mapping is
//! stable across processes and releases, which is what keeps a percentage
//! rollout "sticky" for a given key.

use crate::error::{FeatureError, FeatureResult};
use std::num::NonZeroU32;

/// Deterministic string-to-partition mapper.
pub struct JenkinsPartitioner;

impl JenkinsPartitioner {
    /// One-at-a-time hash over the UTF-8 bytes of `value`.
    ///
    /// The empty string hashes to `0`.
    pub fn hash(value: &str) -> u32 {
        let mut hash: u32 = 0;

        for &byte in value.as_bytes() {
            hash = hash.wrapping_add(u32::from(byte));
            hash = hash.wrapping_add(hash << 10);
            hash ^= hash >> 6;
        }

        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash.wrapping_add(hash << 15)
    }

    /// Resolve `value` to a partition in `[0, partitions)`.
    #[inline]
    pub fn partition(value: &str, partitions: NonZeroU32) -> u32 {
        Self::hash(value) % partitions.get()
    }

    /// Resolve `value` to a partition in `[0, partition_count)`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::InvalidArgument`] when `partition_count` is zero.
    pub fn resolve_to_logical_partition(value: &str, partition_count: u32) -> FeatureResult<u32> {
        let partitions = NonZeroU32::new(partition_count).ok_or_else(|| {
            FeatureError::invalid_argument("partition count must be greater than zero")
        })?;

        Ok(Self::partition(value, partitions))
    }
}
