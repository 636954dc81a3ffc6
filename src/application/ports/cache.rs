use serde::{Deserialize, Serialize};

/// Caller-selected policy governing whether a read consults the network,
/// the cache, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Never call the network; fail if the value is not cached.
    OnlyCache,
    /// Use the cache if present and not expired, otherwise call the network.
    PreferCache,
    /// Bypass the cache entirely.
    OnlyNetwork,
    /// Call the network, falling back to the cache if the call fails.
    #[default]
    NetworkWithCacheFallback,
}
