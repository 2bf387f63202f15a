//! Purchase submission through the Solana RPC.

use crate::errors::SubmissionError;
use crate::types::PurchaseReceipt;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_instruction,
    transaction::Transaction,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Commits SOL to a purchase. One call is one attempt; failures are not retried.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(
        &self,
        sender: &Keypair,
        destination: &str,
        lamports: u64,
    ) -> Result<PurchaseReceipt, SubmissionError>;
}

/// Validate the destination account and amount before anything touches the network.
pub fn validate_transfer(destination: &str, lamports: u64) -> Result<Pubkey, SubmissionError> {
    if lamports == 0 {
        return Err(SubmissionError::InvalidInput(
            "purchase amount must be greater than zero".to_string(),
        ));
    }
    Pubkey::from_str(destination.trim()).map_err(|e| {
        SubmissionError::InvalidInput(format!("{:?} is not a valid account: {}", destination, e))
    })
}

/// Build a single-instruction transfer transaction signed by `sender`.
pub fn build_transfer(
    sender: &Keypair,
    destination: &Pubkey,
    lamports: u64,
    recent_blockhash: Hash,
) -> Transaction {
    let instruction = system_instruction::transfer(&sender.pubkey(), destination, lamports);
    Transaction::new_signed_with_payer(
        &[instruction],
        Some(&sender.pubkey()),
        &[sender],
        recent_blockhash,
    )
}

/// Submits transfers and waits for `confirmed` commitment.
pub struct RpcTransactionSubmitter {
    rpc_client: Arc<RpcClient>,
}

impl RpcTransactionSubmitter {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self::with_client(Arc::new(RpcClient::new_with_commitment(
            rpc_url.into(),
            CommitmentConfig::confirmed(),
        )))
    }

    pub fn with_client(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }
}

#[async_trait]
impl TransactionSubmitter for RpcTransactionSubmitter {
    #[instrument(skip(self, sender), fields(wallet = %sender.pubkey()))]
    async fn submit(
        &self,
        sender: &Keypair,
        destination: &str,
        lamports: u64,
    ) -> Result<PurchaseReceipt, SubmissionError> {
        let destination_key = validate_transfer(destination, lamports)?;

        let recent_blockhash = self.rpc_client.get_latest_blockhash().await.map_err(|e| {
            error!("Failed to fetch latest blockhash: {}", e);
            SubmissionError::Ledger(format!("failed to fetch latest blockhash: {}", e))
        })?;

        let transaction = build_transfer(sender, &destination_key, lamports, recent_blockhash);

        let signature = self
            .rpc_client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(|e| {
                error!("Error executing buy order for {}: {}", destination, e);
                SubmissionError::Ledger(e.to_string())
            })?;

        info!(
            "Transaction sent for {} lamports to {} with signature {}",
            lamports, destination_key, signature
        );

        Ok(PurchaseReceipt {
            signature: signature.to_string(),
            lamports_spent: lamports,
            destination: destination_key.to_string(),
            submitted_at: chrono::Utc::now(),
        })
    }
}
