use std::sync::atomic::AtomicBool;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use super::pow;
use crate::hash::strong_digest;
use crate::transaction::Transaction;

/// Upper bound (inclusive) of the random seed nonce given to a fresh draft.
pub const MAX_SEED_NONCE: u64 = 9_999_999;

/// Borrowed view of every hashed field, in canonical order.
#[derive(Serialize)]
struct BlockPreimage<'a> {
    previous_hash: Option<&'a str>,
    transaction: &'a Transaction,
    timestamp: i64,
    nonce: u64,
}

fn compute_hash(
    previous_hash: Option<&str>,
    transaction: &Transaction,
    timestamp: i64,
    nonce: u64,
) -> String {
    let preimage = BlockPreimage {
        previous_hash,
        transaction,
        timestamp,
        nonce,
    };
    // Only strings and integers: serialization cannot fail.
    let bytes = serde_json::to_vec(&preimage).expect("serialize block");
    strong_digest(&bytes)
}

/// A candidate block whose nonce is still a search variable.
#[derive(Debug, Clone)]
pub struct BlockDraft {
    pub previous_hash: Option<String>,
    pub transaction: Transaction,
    pub timestamp: i64, // Unix millis (UTC)
    pub nonce: u64,
}

impl BlockDraft {
    /// New candidate stamped with the current time and a random seed nonce.
    pub fn new(previous_hash: Option<String>, transaction: Transaction) -> Self {
        Self {
            previous_hash,
            transaction,
            timestamp: Utc::now().timestamp_millis(),
            nonce: rand::thread_rng().gen_range(0..=MAX_SEED_NONCE),
        }
    }

    /// Hash of the draft as it stands right now. Never cached.
    pub fn hash(&self) -> String {
        compute_hash(
            self.previous_hash.as_deref(),
            &self.transaction,
            self.timestamp,
            self.nonce,
        )
    }

    /// Run the proof-of-work search seeded with the current nonce and freeze
    /// the block with `nonce = seed + solution`. Returns the solve offset too.
    pub fn mine(mut self, prefix: &str) -> (Block, u64) {
        let solution = pow::solve_with_prefix(self.nonce, prefix);
        self.nonce = self.nonce.wrapping_add(solution);
        (self.freeze(), solution)
    }

    /// Like [`BlockDraft::mine`], giving up with `None` once `cancel` is raised.
    pub fn mine_cancellable(mut self, prefix: &str, cancel: &AtomicBool) -> Option<(Block, u64)> {
        let solution =
            pow::solve_cancellable(self.nonce, |digest| digest.starts_with(prefix), cancel)?;
        self.nonce = self.nonce.wrapping_add(solution);
        Some((self.freeze(), solution))
    }

    /// Freeze without mining (genesis only).
    pub(crate) fn freeze(self) -> Block {
        Block {
            previous_hash: self.previous_hash,
            transaction: self.transaction,
            timestamp: self.timestamp,
            nonce: self.nonce,
        }
    }
}

/// A mined block. Fields are read-only; the hash is derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    previous_hash: Option<String>,
    transaction: Transaction,
    timestamp: i64,
    nonce: u64,
}

impl Block {
    /// `None` only for the genesis block.
    pub fn previous_hash(&self) -> Option<&str> {
        self.previous_hash.as_deref()
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// SHA-256 over the canonical JSON of all fields.
    pub fn hash(&self) -> String {
        compute_hash(
            self.previous_hash.as_deref(),
            &self.transaction,
            self.timestamp,
            self.nonce,
        )
    }

    /// Whether the stored nonce solves the puzzle for `prefix`.
    /// (Does NOT validate chain linkage.)
    pub fn has_valid_pow(&self, prefix: &str) -> bool {
        pow::meets_prefix(self.nonce, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BlockDraft {
        BlockDraft::new(Some("prev".into()), Transaction::new(1, "payer", "payee"))
    }

    #[test]
    fn fresh_draft_has_seed_in_range() {
        let d = draft();
        assert!(d.nonce <= MAX_SEED_NONCE);
        assert!(d.timestamp > 0);
    }

    #[test]
    fn hash_is_stable_until_a_field_changes() {
        let mut d = draft();
        let first = d.hash();
        assert_eq!(first, d.hash());

        d.nonce += 1;
        assert_ne!(first, d.hash());
    }

    #[test]
    fn mining_replaces_nonce_with_seed_plus_solution() {
        let d = draft();
        let seed = d.nonce;
        let (block, solution) = d.mine("00");
        assert_eq!(block.nonce(), seed + solution);
        assert!(block.has_valid_pow("00"));
        assert_eq!(block.previous_hash(), Some("prev"));
    }

    #[test]
    fn frozen_hash_matches_final_draft_state() {
        let d = draft();
        let (block, _) = d.clone().mine("0");
        let mut replay = d;
        replay.nonce = block.nonce();
        assert_eq!(block.hash(), replay.hash());
        assert_eq!(block.hash(), block.hash());
    }

    #[test]
    fn mined_block_serializes_to_its_hash_preimage() {
        // Blocks are only ever produced by `mine`/`freeze`; serializing one
        // gives back exactly the bytes its hash is computed over.
        let (block, _) = draft().mine("0");
        let bytes = serde_json::to_vec(&block).unwrap();
        assert_eq!(strong_digest(&bytes), block.hash());
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["nonce"], block.nonce());
        assert_eq!(json["previous_hash"], "prev");
    }

    #[test]
    fn hash_covers_the_transaction() {
        let a = BlockDraft {
            previous_hash: None,
            transaction: Transaction::new(1, "a", "b"),
            timestamp: 10,
            nonce: 3,
        };
        let mut b = a.clone();
        b.transaction = Transaction::new(2, "a", "b");
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn cancelled_mining_yields_nothing() {
        let cancel = AtomicBool::new(true);
        // An unreachable prefix would spin forever without the flag.
        assert!(draft().mine_cancellable("zz", &cancel).is_none());
    }
}
