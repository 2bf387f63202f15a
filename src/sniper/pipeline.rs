//! Ordered gate evaluation for a single candidate.
//!
//! The risk gate runs first and the social gate only runs once the risk gate
//! has passed. Any gate that cannot answer rejects the candidate.

use crate::sniper::gate_client::{GateKind, SocialVerdict, TokenGates};
use crate::types::TokenCandidate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Terminal outcome of running the gates for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Every gate passed; a purchase should be submitted
    Proceed,
    /// The risk service did not report the token as safe
    RejectedByRisk,
    /// No livestream, or too few viewers
    RejectedBySocial { viewer_count: u64 },
    /// A gate could not be queried or its answer could not be read
    GateUnavailable { gate: GateKind, reason: String },
}

impl Decision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Decision::Proceed)
    }

    /// False only when a gate could not answer; the candidate was never judged.
    pub fn is_conclusive(&self) -> bool {
        !matches!(self, Decision::GateUnavailable { .. })
    }

    /// Short stable name for logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Proceed => "proceed",
            Decision::RejectedByRisk => "rejected_by_risk",
            Decision::RejectedBySocial { .. } => "rejected_by_social",
            Decision::GateUnavailable { .. } => "gate_unavailable",
        }
    }
}

/// Social gate rule: a livestream must exist with at least `min_viewer_count` viewers.
pub fn social_decision(verdict: &SocialVerdict, min_viewer_count: u64) -> Decision {
    if verdict.has_qualifying_livestream && verdict.viewer_count >= min_viewer_count {
        Decision::Proceed
    } else {
        Decision::RejectedBySocial {
            viewer_count: verdict.viewer_count,
        }
    }
}

/// Runs risk then social gates and short-circuits on the first rejection.
#[derive(Clone)]
pub struct EvaluationPipeline {
    gates: Arc<dyn TokenGates>,
    min_viewer_count: u64,
}

impl EvaluationPipeline {
    pub fn new(gates: Arc<dyn TokenGates>, min_viewer_count: u64) -> Self {
        Self {
            gates,
            min_viewer_count,
        }
    }

    pub fn min_viewer_count(&self) -> u64 {
        self.min_viewer_count
    }

    /// Evaluate one candidate. Always yields exactly one decision.
    #[instrument(skip(self, candidate), fields(mint = %candidate.mint_address, name = %candidate.name))]
    pub async fn evaluate(&self, candidate: &TokenCandidate) -> Decision {
        let mint = candidate.mint_address.as_str();

        match self.gates.check_risk(mint).await {
            Ok(verdict) if verdict.is_safe => {}
            Ok(_) => {
                warn!("Token {} failed the risk check, skipping", mint);
                return Decision::RejectedByRisk;
            }
            Err(e) => {
                warn!("Risk gate unavailable for {}: {}", mint, e);
                return Decision::GateUnavailable {
                    gate: GateKind::Risk,
                    reason: e.to_string(),
                };
            }
        }

        let decision = match self.gates.check_social(mint).await {
            Ok(verdict) => social_decision(&verdict, self.min_viewer_count),
            Err(e) => {
                warn!("Social gate unavailable for {}: {}", mint, e);
                return Decision::GateUnavailable {
                    gate: GateKind::Social,
                    reason: e.to_string(),
                };
            }
        };

        match &decision {
            Decision::Proceed => info!("Token {} passed all gates", mint),
            Decision::RejectedBySocial { viewer_count } => warn!(
                "Token {} has no qualifying livestream ({} viewers, need {})",
                mint, viewer_count, self.min_viewer_count
            ),
            _ => {}
        }
        decision
    }
}
