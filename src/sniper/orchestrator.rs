//! One discovery-evaluate-purchase pass.

use crate::config::SniperConfig;
use crate::errors::{FetchError, SubmissionError};
use crate::sniper::dedup::{DedupPolicy, SeenSet};
use crate::sniper::discovery::{DiscoveryFeed, HttpDiscoveryPoller};
use crate::sniper::gate_client::HttpGateClient;
use crate::sniper::http::HttpFetcher;
use crate::sniper::pipeline::{Decision, EvaluationPipeline};
use crate::sniper::submitter::{RpcTransactionSubmitter, TransactionSubmitter};
use crate::types::{PurchaseReceipt, TokenCandidate};
use anyhow::{Context, Result};
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Immutable per-wallet state handed to the orchestrator.
#[derive(Clone)]
pub struct SniperContext {
    pub wallet: Arc<Keypair>,
    pub buy_amount_lamports: u64,
}

/// Terminal outcome for one candidate in a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateReport {
    pub candidate: TokenCandidate,
    pub decision: Decision,
    /// Present only when the decision was `Proceed`
    pub purchase: Option<Result<PurchaseReceipt, SubmissionError>>,
}

/// Everything that happened during one pass, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub reports: Vec<CandidateReport>,
    /// Candidates skipped because the seen-set already had them
    pub skipped_seen: usize,
}

/// Counts per outcome for a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub proceeded: usize,
    pub rejected_by_risk: usize,
    pub rejected_by_social: usize,
    pub gate_unavailable: usize,
    pub purchased: usize,
    pub submission_failed: usize,
    pub skipped_seen: usize,
}

impl PassReport {
    pub fn summary(&self) -> PassSummary {
        let mut summary = PassSummary {
            evaluated: self.reports.len(),
            skipped_seen: self.skipped_seen,
            ..PassSummary::default()
        };

        for report in &self.reports {
            match report.decision {
                Decision::Proceed => summary.proceeded += 1,
                Decision::RejectedByRisk => summary.rejected_by_risk += 1,
                Decision::RejectedBySocial { .. } => summary.rejected_by_social += 1,
                Decision::GateUnavailable { .. } => summary.gate_unavailable += 1,
            }
            match &report.purchase {
                Some(Ok(_)) => summary.purchased += 1,
                Some(Err(_)) => summary.submission_failed += 1,
                None => {}
            }
        }
        summary
    }

    pub fn receipts(&self) -> impl Iterator<Item = &PurchaseReceipt> {
        self.reports
            .iter()
            .filter_map(|report| report.purchase.as_ref().and_then(|p| p.as_ref().ok()))
    }
}

/// Drives poll, evaluation and submission for a single operator wallet.
pub struct SnipingOrchestrator {
    feed: Arc<dyn DiscoveryFeed>,
    pipeline: EvaluationPipeline,
    submitter: Arc<dyn TransactionSubmitter>,
    context: SniperContext,
    seen: SeenSet,
}

impl SnipingOrchestrator {
    pub fn new(
        feed: Arc<dyn DiscoveryFeed>,
        pipeline: EvaluationPipeline,
        submitter: Arc<dyn TransactionSubmitter>,
        context: SniperContext,
        dedup: DedupPolicy,
    ) -> Self {
        Self {
            feed,
            pipeline,
            submitter,
            context,
            seen: SeenSet::new(&dedup),
        }
    }

    /// Wire the HTTP gates, HTTP discovery feed and RPC submitter from configuration.
    pub fn from_config(config: &SniperConfig, wallet: Keypair) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("gate-sniper/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        let fetcher = HttpFetcher::new(
            http_client,
            config.http_timeout(),
            config.network_retry_attempts,
        );

        let gates = Arc::new(HttpGateClient::new(
            fetcher.clone(),
            config.risk_api_url.clone(),
            config.social_api_url.clone(),
        ));
        let feed = Arc::new(HttpDiscoveryPoller::new(fetcher, config.discovery_url.clone()));
        let submitter = Arc::new(RpcTransactionSubmitter::new(config.rpc_url.clone()));

        info!(
            "Sniper configured for wallet {}: {} SOL per buy, min {} viewers",
            wallet.pubkey(),
            config.buy_amount_sol,
            config.min_viewer_count
        );

        Ok(Self::new(
            feed,
            EvaluationPipeline::new(gates, config.min_viewer_count),
            submitter,
            SniperContext {
                wallet: Arc::new(wallet),
                buy_amount_lamports: config.buy_amount_lamports(),
            },
            config.dedup_policy(),
        ))
    }

    /// Poll once and process every returned candidate in order.
    ///
    /// Only a failed poll is an error; per-candidate failures are recorded in the report.
    #[instrument(skip(self))]
    pub async fn run_pass(&self) -> Result<PassReport, FetchError> {
        info!("Monitoring new tokens...");

        let candidates = self.feed.poll().await.map_err(|e| {
            error!("Failed to fetch new tokens: {}", e);
            e
        })?;

        let mut report = PassReport::default();
        for candidate in candidates {
            if self.seen.is_seen(&candidate.mint_address) {
                info!("Skipping already evaluated token {}", candidate.mint_address);
                report.skipped_seen += 1;
                continue;
            }
            let candidate_report = self.process_candidate(candidate).await;
            if candidate_report.decision.is_conclusive() {
                self.seen.mark_seen(&candidate_report.candidate.mint_address).await;
            }
            report.reports.push(candidate_report);
        }

        let summary = report.summary();
        info!(
            evaluated = summary.evaluated,
            purchased = summary.purchased,
            submission_failed = summary.submission_failed,
            rejected_by_risk = summary.rejected_by_risk,
            rejected_by_social = summary.rejected_by_social,
            gate_unavailable = summary.gate_unavailable,
            skipped_seen = summary.skipped_seen,
            "Pass complete"
        );
        Ok(report)
    }

    /// Repeat passes every `interval` until `shutdown` resolves. Returns the number of passes run.
    ///
    /// `shutdown` is polled for the whole loop, so a signal that arrives mid-pass
    /// stops the loop as soon as that pass finishes.
    pub async fn run_polling<F>(&self, interval: Duration, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut passes = 0;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopped after {} passes", passes);
                    break;
                }
                _ = ticker.tick() => {
                    passes += 1;
                    if let Err(e) = self.run_pass().await {
                        error!("Pass aborted: {}", e);
                    }
                }
            }
        }
        passes
    }

    async fn process_candidate(&self, candidate: TokenCandidate) -> CandidateReport {
        info!(
            "Processing new token: {} ({})",
            candidate.name, candidate.mint_address
        );

        let decision = self.pipeline.evaluate(&candidate).await;

        let purchase = if decision.is_proceed() {
            let result = self
                .submitter
                .submit(
                    &self.context.wallet,
                    &candidate.mint_address,
                    self.context.buy_amount_lamports,
                )
                .await;
            match &result {
                Ok(receipt) => info!(
                    "Bought {} for {} lamports, signature {}",
                    candidate.mint_address, receipt.lamports_spent, receipt.signature
                ),
                Err(e) => error!("Buy order for {} failed: {}", candidate.mint_address, e),
            }
            Some(result)
        } else {
            debug!(
                "Token {} not bought: {}",
                candidate.mint_address,
                decision.label()
            );
            None
        };

        CandidateReport {
            candidate,
            decision,
            purchase,
        }
    }
}
