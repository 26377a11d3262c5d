//! sdbm feature hashing.

/// Hashes a stemmed token to a feature index.
///
/// Folds `hash = c + (hash << 6) + (hash << 16) - hash` over the bytes of
/// `token` with wrapping 64-bit arithmetic, which is `hash * 65599 + c`.
/// Each byte is sign-extended before it is added, matching databases built
/// from C `char` strings on x86-64, so non-ASCII stems hash to the same
/// indices as before. The empty string hashes to 0.
pub fn sdbm(token: &str) -> u64 {
    token.bytes().fold(0u64, |hash, byte| {
        let c = byte as i8 as i64 as u64;
        c.wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Maps stemmed tokens to sparse vector indices.
pub trait FeatureHasher {
    /// Returns the feature index for a stemmed token.
    fn hash(&self, token: &str) -> u64;
}

/// The sdbm hasher used for persisted sentence databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdbmHasher;

impl FeatureHasher for SdbmHasher {
    #[inline]
    fn hash(&self, token: &str) -> u64 {
        sdbm(token)
    }
}
