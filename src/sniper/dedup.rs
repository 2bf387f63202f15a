//! Optional seen-set so repeated polls do not re-evaluate the same mint.

use moka::future::Cache;
use std::time::Duration;

/// Upper bound on remembered mints.
const MAX_SEEN_MINTS: u64 = 100_000;

/// How a pass treats candidates that earlier passes already evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Evaluate whatever the feed currently returns
    ReprocessAll,
    /// Skip mints that reached a conclusive decision within `ttl`.
    /// A gate outage is not conclusive, so such mints are offered again.
    SkipSeen { ttl: Duration },
}

impl Default for DedupPolicy {
    fn default() -> Self {
        DedupPolicy::ReprocessAll
    }
}

/// Mints with a conclusive decision, keyed by mint address.
pub struct SeenSet {
    seen: Option<Cache<String, ()>>,
}

impl SeenSet {
    pub fn new(policy: &DedupPolicy) -> Self {
        let seen = match policy {
            DedupPolicy::ReprocessAll => None,
            DedupPolicy::SkipSeen { ttl } => Some(
                Cache::builder()
                    .max_capacity(MAX_SEEN_MINTS)
                    .time_to_live(*ttl)
                    .build(),
            ),
        };
        Self { seen }
    }

    /// Whether the mint was already decided within the TTL.
    pub fn is_seen(&self, mint_address: &str) -> bool {
        match &self.seen {
            None => false,
            Some(cache) => cache.contains_key(mint_address),
        }
    }

    pub async fn mark_seen(&self, mint_address: &str) {
        if let Some(cache) = &self.seen {
            cache.insert(mint_address.to_string(), ()).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reprocess_all_never_skips() {
        let seen = SeenSet::new(&DedupPolicy::ReprocessAll);
        seen.mark_seen("MintA").await;
        assert!(!seen.is_seen("MintA"));
    }

    #[tokio::test]
    async fn test_skip_seen_remembers_marked_mints() {
        let seen = SeenSet::new(&DedupPolicy::SkipSeen {
            ttl: Duration::from_secs(60),
        });
        assert!(!seen.is_seen("MintA"));
        seen.mark_seen("MintA").await;
        assert!(seen.is_seen("MintA"));
        assert!(!seen.is_seen("MintB"));
    }

    #[tokio::test]
    async fn test_skip_seen_forgets_after_ttl() {
        let seen = SeenSet::new(&DedupPolicy::SkipSeen {
            ttl: Duration::from_millis(50),
        });
        seen.mark_seen("MintA").await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!seen.is_seen("MintA"));
    }
}
