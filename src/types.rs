//! Core types and data structures shared across the sniper pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A base58 account identifier as it arrives from off-chain feeds.
pub type Pubkey = String;

/// A newly listed token returned by the discovery feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCandidate {
    /// The mint address of the token
    pub mint_address: Pubkey,
    /// Display name reported by the feed
    pub name: String,
}

impl TokenCandidate {
    pub fn new(mint_address: impl Into<Pubkey>, name: impl Into<String>) -> Self {
        Self {
            mint_address: mint_address.into(),
            name: name.into(),
        }
    }
}

/// Proof that a purchase transfer reached the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Transaction signature returned by the ledger
    pub signature: String,
    /// Amount moved, in lamports
    pub lamports_spent: u64,
    /// Account the lamports were sent to
    pub destination: Pubkey,
    /// When the confirmed submission returned
    pub submitted_at: DateTime<Utc>,
}
