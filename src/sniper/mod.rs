//! Sniper module - gate-checked purchase pipeline.
//!
//! Discovery feeds candidates into the evaluation pipeline (risk gate, then
//! social gate); candidates that pass are bought with a single SOL transfer.
//! Every outbound call returns a typed result so a pass can report exactly one
//! outcome per candidate.

pub mod http;
pub mod gate_client;
pub mod discovery;
pub mod pipeline;
pub mod submitter;
pub mod dedup;
pub mod orchestrator;

// Re-export main types
pub use gate_client::{GateKind, HttpGateClient, RiskVerdict, SocialVerdict, TokenGates};
pub use discovery::{DiscoveryFeed, HttpDiscoveryPoller};
pub use pipeline::{Decision, EvaluationPipeline};
pub use submitter::{RpcTransactionSubmitter, TransactionSubmitter};
pub use dedup::{DedupPolicy, SeenSet};
pub use orchestrator::{CandidateReport, PassReport, PassSummary, SniperContext, SnipingOrchestrator};
pub use http::HttpFetcher;
