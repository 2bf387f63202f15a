//! Sniper configuration: defaults, environment loading and a builder.

use crate::sniper::dedup::DedupPolicy;
use crate::wallet::WalletSource;
use anyhow::{bail, Context, Result};
use solana_sdk::native_token::sol_to_lamports;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_DISCOVERY_URL: &str = "https://your-new-tokens-api.com/api/v1/tokens";
pub const DEFAULT_RISK_API_URL: &str = "https://rugcheck.xyz/api/check";
pub const DEFAULT_SOCIAL_API_URL: &str = "https://discover.getmoni.io/api/v1/projects";

/// Runtime configuration for one operator wallet.
#[derive(Debug, Clone)]
pub struct SniperConfig {
    /// Solana JSON-RPC endpoint
    pub rpc_url: String,
    /// Feed listing newly created tokens
    pub discovery_url: String,
    /// Base URL of the risk-scoring gate
    pub risk_api_url: String,
    /// Base URL of the livestream-metrics gate
    pub social_api_url: String,
    /// SOL committed per qualifying token
    pub buy_amount_sol: f64,
    /// Minimum livestream viewers for the social gate
    pub min_viewer_count: u64,
    /// Per-request HTTP timeout
    pub http_timeout_seconds: u64,
    /// Extra attempts for gate/discovery queries that fail at the transport level
    pub network_retry_attempts: usize,
    /// When set, mints seen within this many seconds are skipped
    pub dedup_seen_ttl_seconds: Option<u64>,
    /// When set, the binary repeats passes at this interval
    pub poll_interval_seconds: Option<u64>,
    /// Operator keypair source
    pub wallet: Option<WalletSource>,
}

impl Default for SniperConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            risk_api_url: DEFAULT_RISK_API_URL.to_string(),
            social_api_url: DEFAULT_SOCIAL_API_URL.to_string(),
            buy_amount_sol: 0.15,
            min_viewer_count: 25,
            http_timeout_seconds: 10,
            network_retry_attempts: 0,
            dedup_seen_ttl_seconds: None,
            poll_interval_seconds: None,
            wallet: None,
        }
    }
}

impl SniperConfig {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let wallet = match (lookup("WALLET_KEYPAIR_PATH"), lookup("WALLET_PRIVATE_KEY")) {
            (Some(path), _) if !path.trim().is_empty() => {
                Some(WalletSource::KeypairFile(PathBuf::from(path.trim())))
            }
            (_, Some(secret)) if !secret.trim().is_empty() => Some(WalletSource::Secret(secret)),
            _ => None,
        };

        let config = Self {
            rpc_url: lookup("RPC_URL").unwrap_or(defaults.rpc_url),
            discovery_url: lookup("DISCOVERY_URL").unwrap_or(defaults.discovery_url),
            risk_api_url: lookup("RISK_API_URL").unwrap_or(defaults.risk_api_url),
            social_api_url: lookup("SOCIAL_API_URL").unwrap_or(defaults.social_api_url),
            buy_amount_sol: parse_or(&lookup, "BUY_AMOUNT_SOL", defaults.buy_amount_sol)?,
            min_viewer_count: parse_or(&lookup, "MIN_VIEWER_COUNT", defaults.min_viewer_count)?,
            http_timeout_seconds: parse_or(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_seconds)?,
            network_retry_attempts: parse_or(
                &lookup,
                "NETWORK_RETRY_ATTEMPTS",
                defaults.network_retry_attempts,
            )?,
            dedup_seen_ttl_seconds: parse_opt(&lookup, "DEDUP_SEEN_TTL_SECS")?,
            poll_interval_seconds: parse_opt(&lookup, "POLL_INTERVAL_SECS")?,
            wallet,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would make every pass meaningless or unsafe.
    pub fn validate(&self) -> Result<()> {
        if !self.buy_amount_sol.is_finite() || self.buy_amount_sol <= 0.0 {
            bail!("BUY_AMOUNT_SOL must be a positive number, got {}", self.buy_amount_sol);
        }
        if self.buy_amount_lamports() == 0 {
            bail!("BUY_AMOUNT_SOL {} rounds to zero lamports", self.buy_amount_sol);
        }
        if self.http_timeout_seconds == 0 {
            bail!("HTTP_TIMEOUT_SECS must be at least 1");
        }
        if self.poll_interval_seconds == Some(0) {
            bail!("POLL_INTERVAL_SECS must be at least 1 when set");
        }
        for (name, url) in [
            ("RPC_URL", &self.rpc_url),
            ("DISCOVERY_URL", &self.discovery_url),
            ("RISK_API_URL", &self.risk_api_url),
            ("SOCIAL_API_URL", &self.social_api_url),
        ] {
            if url.trim().is_empty() {
                bail!("{} must not be empty", name);
            }
        }
        Ok(())
    }

    /// Purchase amount in lamports.
    pub fn buy_amount_lamports(&self) -> u64 {
        sol_to_lamports(self.buy_amount_sol)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_seconds.map(Duration::from_secs)
    }

    pub fn dedup_policy(&self) -> DedupPolicy {
        match self.dedup_seen_ttl_seconds {
            Some(ttl) => DedupPolicy::SkipSeen {
                ttl: Duration::from_secs(ttl),
            },
            None => DedupPolicy::ReprocessAll,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Failed to parse {} from {:?}", key, raw)),
        _ => Ok(None),
    }
}

/// Builder for convenient construction with sensible defaults.
pub struct SniperBuilder {
    config: SniperConfig,
}

impl SniperBuilder {
    pub fn new() -> Self {
        Self {
            config: SniperConfig::default(),
        }
    }

    /// Set the Solana RPC endpoint.
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.rpc_url = url.into();
        self
    }

    /// Set the discovery feed URL.
    pub fn with_discovery_url(mut self, url: impl Into<String>) -> Self {
        self.config.discovery_url = url.into();
        self
    }

    /// Set both gate base URLs.
    pub fn with_gate_urls(mut self, risk: impl Into<String>, social: impl Into<String>) -> Self {
        self.config.risk_api_url = risk.into();
        self.config.social_api_url = social.into();
        self
    }

    /// Set the purchase amount in SOL.
    pub fn with_buy_amount_sol(mut self, amount: f64) -> Self {
        self.config.buy_amount_sol = amount;
        self
    }

    /// Set the minimum livestream viewer count.
    pub fn with_min_viewer_count(mut self, viewers: u64) -> Self {
        self.config.min_viewer_count = viewers;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.config.http_timeout_seconds = seconds;
        self
    }

    /// Allow bounded retries for transport failures.
    pub fn with_network_retries(mut self, attempts: usize) -> Self {
        self.config.network_retry_attempts = attempts;
        self
    }

    /// Skip mints already evaluated within `ttl_seconds`.
    pub fn with_seen_ttl(mut self, ttl_seconds: u64) -> Self {
        self.config.dedup_seen_ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn with_wallet(mut self, wallet: WalletSource) -> Self {
        self.config.wallet = Some(wallet);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<SniperConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SniperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SniperConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.buy_amount_sol, 0.15);
        assert_eq!(config.buy_amount_lamports(), 150_000_000);
        assert_eq!(config.min_viewer_count, 25);
        assert_eq!(config.network_retry_attempts, 0);
        assert_eq!(config.dedup_policy(), DedupPolicy::ReprocessAll);
        assert!(config.poll_interval().is_none());
        assert!(config.wallet.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = SniperConfig::from_lookup(lookup_from(&[
            ("BUY_AMOUNT_SOL", "0.5"),
            ("MIN_VIEWER_COUNT", "100"),
            ("DEDUP_SEEN_TTL_SECS", "600"),
            ("POLL_INTERVAL_SECS", "30"),
            ("RISK_API_URL", "http://127.0.0.1:9000/risk"),
            ("WALLET_PRIVATE_KEY", "abc"),
        ]))
        .unwrap();

        assert_eq!(config.buy_amount_lamports(), 500_000_000);
        assert_eq!(config.min_viewer_count, 100);
        assert_eq!(
            config.dedup_policy(),
            DedupPolicy::SkipSeen { ttl: Duration::from_secs(600) }
        );
        assert_eq!(config.poll_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.risk_api_url, "http://127.0.0.1:9000/risk");
        assert!(matches!(config.wallet, Some(WalletSource::Secret(_))));
    }

    #[test]
    fn test_keypair_path_takes_precedence() {
        let config = SniperConfig::from_lookup(lookup_from(&[
            ("WALLET_KEYPAIR_PATH", "/keys/id.json"),
            ("WALLET_PRIVATE_KEY", "abc"),
        ]))
        .unwrap();

        assert!(matches!(config.wallet, Some(WalletSource::KeypairFile(_))));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(SniperConfig::from_lookup(lookup_from(&[("MIN_VIEWER_COUNT", "many")])).is_err());
        assert!(SniperConfig::from_lookup(lookup_from(&[("BUY_AMOUNT_SOL", "0")])).is_err());
        assert!(SniperConfig::from_lookup(lookup_from(&[("BUY_AMOUNT_SOL", "-1")])).is_err());
        assert!(SniperConfig::from_lookup(lookup_from(&[("POLL_INTERVAL_SECS", "0")])).is_err());
    }

    #[test]
    fn test_builder() {
        let config = SniperBuilder::new()
            .with_buy_amount_sol(1.0)
            .with_min_viewer_count(10)
            .with_network_retries(2)
            .with_seen_ttl(60)
            .build()
            .unwrap();

        assert_eq!(config.buy_amount_lamports(), 1_000_000_000);
        assert_eq!(config.min_viewer_count, 10);
        assert_eq!(config.network_retry_attempts, 2);
        assert_eq!(config.dedup_seen_ttl_seconds, Some(60));
    }

    #[test]
    fn test_builder_rejects_zero_amount() {
        assert!(SniperBuilder::new().with_buy_amount_sol(0.0).build().is_err());
    }
}
