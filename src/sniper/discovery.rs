//! Discovery feed polling.

use crate::errors::FetchError;
use crate::sniper::http::HttpFetcher;
use crate::types::TokenCandidate;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// Source of newly listed tokens.
#[async_trait]
pub trait DiscoveryFeed: Send + Sync {
    /// Fetch the current listing, in feed order.
    async fn poll(&self) -> Result<Vec<TokenCandidate>, FetchError>;
}

/// Polls a JSON feed with a single GET. No pagination.
pub struct HttpDiscoveryPoller {
    fetcher: HttpFetcher,
    feed_url: String,
}

impl HttpDiscoveryPoller {
    pub fn new(fetcher: HttpFetcher, feed_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl DiscoveryFeed for HttpDiscoveryPoller {
    #[instrument(skip(self), fields(feed = %self.feed_url))]
    async fn poll(&self) -> Result<Vec<TokenCandidate>, FetchError> {
        let body = self.fetcher.get_text(&self.feed_url).await?;
        let candidates = parse_listings(&body)?;
        info!("Discovery feed returned {} candidates", candidates.len());
        Ok(candidates)
    }
}

/// Parse a feed body: a JSON array of `{ mint_address, name }` objects.
///
/// Entries without a usable mint are dropped; a missing name becomes empty.
pub fn parse_listings(body: &str) -> Result<Vec<TokenCandidate>, FetchError> {
    let entries = match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => {
            return Err(FetchError::MalformedResponse(
                "discovery feed did not return a JSON array".to_string(),
            ))
        }
        Err(e) => return Err(FetchError::MalformedResponse(e.to_string())),
    };

    let mut candidates = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mint = entry
            .get("mint_address")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|mint| !mint.is_empty());

        match mint {
            Some(mint) => {
                let name = entry.get("name").and_then(Value::as_str).unwrap_or_default();
                candidates.push(TokenCandidate::new(mint, name));
            }
            None => warn!("Dropping feed entry {} without a mint_address", index),
        }
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listings_preserves_order() {
        let body = r#"[
            {"mint_address": "MintA111", "name": "Alpha", "created_at": 1},
            {"mint_address": "MintB222", "name": "Beta"}
        ]"#;

        let candidates = parse_listings(body).unwrap();
        assert_eq!(
            candidates,
            vec![
                TokenCandidate::new("MintA111", "Alpha"),
                TokenCandidate::new("MintB222", "Beta"),
            ]
        );
    }

    #[test]
    fn test_parse_listings_drops_entries_without_mint() {
        let body = r#"[
            {"name": "NoMint"},
            {"mint_address": "", "name": "Blank"},
            {"mint_address": 42, "name": "Numeric"},
            {"mint_address": "MintC333"}
        ]"#;

        let candidates = parse_listings(body).unwrap();
        assert_eq!(candidates, vec![TokenCandidate::new("MintC333", "")]);
    }

    #[test]
    fn test_parse_listings_empty_feed() {
        assert!(parse_listings("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_listings_rejects_non_array() {
        assert!(matches!(
            parse_listings(r#"{"tokens": []}"#),
            Err(FetchError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_listings("not json"),
            Err(FetchError::MalformedResponse(_))
        ));
    }
}
