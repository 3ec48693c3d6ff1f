use crate::blockchain::{Block, Blockchain};
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Shared application state: one ledger, one lock, so appends are serialized.
pub struct AppState {
    pub blockchain: Mutex<Blockchain>,
}

impl AppState {
    pub fn new(blockchain: Blockchain) -> Self {
        Self {
            blockchain: Mutex::new(blockchain),
        }
    }
}

/* ---------- Chain API Models ---------- */

/// A block as exposed over HTTP, with its derived hash spelled out.
#[derive(Serialize)]
pub struct BlockView {
    pub index: usize,
    pub previous_hash: Option<String>,
    pub transaction: Transaction,
    pub timestamp: i64,
    pub nonce: u64,
    pub hash: String,
}

impl BlockView {
    pub fn new(index: usize, block: &Block) -> Self {
        Self {
            index,
            previous_hash: block.previous_hash().map(str::to_string),
            transaction: block.transaction().clone(),
            timestamp: block.timestamp(),
            nonce: block.nonce(),
            hash: block.hash(),
        }
    }
}

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub pow_prefix: String,
    pub chain: Vec<BlockView>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub amount: u64,
    pub payer: String,
    pub payee: String,
    /// Key the signature is checked against (normally the payer).
    pub public_key: String,
    /// Hex-encoded DER ECDSA signature over the transaction sighash.
    pub signature: String,
}

#[derive(Serialize)]
pub struct RejectedResponse {
    pub accepted: bool,
    pub reason: String,
}

/* ---------- Signing helper Models (dev) ---------- */

#[derive(Deserialize)]
pub struct SignTxRequest {
    pub private_key: String,
    pub payee: String,
    pub amount: u64,
}

#[derive(Serialize)]
pub struct SignTxResponse {
    pub transaction: Transaction,
    pub public_key: String,
    pub signature: String,
}
