//! Gate clients for the risk-scoring and livestream-metrics services.
//!
//! Each gate query is a single GET against `{base}/{mint}`. Transport, status
//! and body failures come back as [`FetchError`] values; fields the services
//! leave out are read conservatively so that a thin response can never look
//! like a pass.

use crate::errors::FetchError;
use crate::sniper::http::{endpoint_url, HttpFetcher};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, instrument};

/// Which external check a verdict or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    Risk,
    Social,
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Risk => f.write_str("risk"),
            GateKind::Social => f.write_str("social"),
        }
    }
}

/// Risk-scoring verdict for one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub is_safe: bool,
}

impl RiskVerdict {
    /// Parse a risk-service body. Only a literal `true` counts as safe.
    pub fn from_body(body: &str) -> Result<Self, FetchError> {
        let object = parse_object(body)?;
        let is_safe = object
            .get("is_safe")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Ok(Self { is_safe })
    }
}

/// Livestream metrics for one mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialVerdict {
    /// A livestream object was present in the response
    pub has_qualifying_livestream: bool,
    /// Current viewers; zero when absent or unreadable
    pub viewer_count: u64,
}

impl SocialVerdict {
    pub fn from_body(body: &str) -> Result<Self, FetchError> {
        let object = parse_object(body)?;
        let verdict = match object.get("livestream") {
            Some(Value::Object(livestream)) => Self {
                has_qualifying_livestream: true,
                viewer_count: livestream
                    .get("viewer_count")
                    .map(viewer_count_of)
                    .unwrap_or(0),
            },
            _ => Self {
                has_qualifying_livestream: false,
                viewer_count: 0,
            },
        };
        Ok(verdict)
    }
}

fn viewer_count_of(value: &Value) -> u64 {
    if let Some(count) = value.as_u64() {
        return count;
    }
    match value.as_f64() {
        Some(count) if count.is_finite() && count > 0.0 => count.floor() as u64,
        _ => 0,
    }
}

fn parse_object(body: &str) -> Result<Map<String, Value>, FetchError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(FetchError::MalformedResponse(
            "expected a JSON object".to_string(),
        )),
        Err(e) => Err(FetchError::MalformedResponse(e.to_string())),
    }
}

/// The two gates a candidate has to clear, in the order the pipeline asks them.
#[async_trait]
pub trait TokenGates: Send + Sync {
    async fn check_risk(&self, mint_address: &str) -> Result<RiskVerdict, FetchError>;

    async fn check_social(&self, mint_address: &str) -> Result<SocialVerdict, FetchError>;
}

/// HTTP implementation of both gates. Results are never cached.
pub struct HttpGateClient {
    fetcher: HttpFetcher,
    risk_base: String,
    social_base: String,
}

impl HttpGateClient {
    pub fn new(
        fetcher: HttpFetcher,
        risk_base: impl Into<String>,
        social_base: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            risk_base: risk_base.into(),
            social_base: social_base.into(),
        }
    }

    /// Raw gate query: GET `{endpoint_base}/{mint_address}` and return the body.
    #[instrument(skip(self))]
    pub async fn query(&self, endpoint_base: &str, mint_address: &str) -> Result<String, FetchError> {
        let url = endpoint_url(endpoint_base, mint_address)?;
        self.fetcher.get_text(&url).await
    }
}

#[async_trait]
impl TokenGates for HttpGateClient {
    #[instrument(skip(self))]
    async fn check_risk(&self, mint_address: &str) -> Result<RiskVerdict, FetchError> {
        let body = self.query(&self.risk_base, mint_address).await?;
        let verdict = RiskVerdict::from_body(&body)?;
        debug!("Risk verdict for {}: {:?}", mint_address, verdict);
        Ok(verdict)
    }

    #[instrument(skip(self))]
    async fn check_social(&self, mint_address: &str) -> Result<SocialVerdict, FetchError> {
        let body = self.query(&self.social_base, mint_address).await?;
        let verdict = SocialVerdict::from_body(&body)?;
        debug!("Social verdict for {}: {:?}", mint_address, verdict);
        Ok(verdict)
    }
}
