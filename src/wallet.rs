//! Operator wallet loading.

use anyhow::{anyhow, Context, Result};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::fmt;
use std::path::PathBuf;

/// Where the operator keypair comes from.
#[derive(Clone)]
pub enum WalletSource {
    /// A Solana CLI keypair file (JSON byte array on disk)
    KeypairFile(PathBuf),
    /// Inline secret: a JSON byte array or a base58 string
    Secret(String),
}

// Never print secret material.
impl fmt::Debug for WalletSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletSource::KeypairFile(path) => f.debug_tuple("KeypairFile").field(path).finish(),
            WalletSource::Secret(_) => f.write_str("Secret(<redacted>)"),
        }
    }
}

/// Build the signing keypair for the configured wallet source.
pub fn load_wallet(source: &WalletSource) -> Result<Keypair> {
    match source {
        WalletSource::KeypairFile(path) => read_keypair_file(path)
            .map_err(|e| anyhow!("Failed to read keypair file {}: {}", path.display(), e)),
        WalletSource::Secret(secret) => keypair_from_secret(secret.trim()),
    }
}

fn keypair_from_secret(secret: &str) -> Result<Keypair> {
    let bytes: Vec<u8> = if secret.starts_with('[') {
        serde_json::from_str(secret).context("Wallet secret is not a valid JSON byte array")?
    } else {
        bs58::decode(secret)
            .into_vec()
            .context("Wallet secret is not valid base58")?
    };

    Keypair::from_bytes(&bytes).map_err(|_| anyhow!("Wallet secret is not a valid ed25519 keypair"))
}
