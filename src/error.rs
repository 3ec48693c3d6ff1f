use thiserror::Error;

/// Errors surfaced by the ledger and the wallet helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Signature did not verify against the transaction; the chain is unchanged.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Proof-of-work search stopped before a solution was found.
    #[error("mining cancelled")]
    MiningCancelled,
}
