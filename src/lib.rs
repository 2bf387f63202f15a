//! gate-sniper - gate-checked Solana token sniper
//!
//! Polls a discovery feed for newly listed tokens, runs each one through a risk
//! gate and a livestream-popularity gate, and buys the ones that pass with a
//! single SOL transfer from the operator wallet.

pub mod types;
pub mod errors;
pub mod config;
pub mod wallet;
pub mod sniper;

// Re-export main types for convenience
pub use config::{SniperBuilder, SniperConfig};
pub use errors::{FetchError, SubmissionError};
pub use sniper::{Decision, PassReport, SnipingOrchestrator};
pub use types::{PurchaseReceipt, TokenCandidate};
