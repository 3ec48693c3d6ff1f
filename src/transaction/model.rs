use serde::{Deserialize, Serialize};

use crate::hash::strong_digest_bytes;

/// A value transfer between two identities (public-key hex strings).
///
/// Fields are private so a transaction cannot change after it was signed.
/// Field order here is the canonical serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    amount: u64,
    payer: String,
    payee: String,
}

impl Transaction {
    /// No validation on amount or identity format.
    pub fn new(amount: u64, payer: impl Into<String>, payee: impl Into<String>) -> Self {
        Self {
            amount,
            payer: payer.into(),
            payee: payee.into(),
        }
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    /// Canonical JSON bytes: `{"amount":..,"payer":..,"payee":..}`.
    /// Both the signing input and the embedded form inside a block hash.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // Serializing a struct of a u64 and two Strings cannot fail.
        serde_json::to_vec(self).expect("serialize transaction")
    }

    /// SHA-256 of the canonical bytes; this is what gets signed.
    pub fn sighash(&self) -> [u8; 32] {
        strong_digest_bytes(&self.canonical_bytes())
    }
}
