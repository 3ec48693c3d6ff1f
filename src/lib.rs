//! A single-process ledger: hash-linked blocks, a fixed-difficulty
//! proof-of-work puzzle, and ECDSA-gated appends.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod hash;
pub mod transaction;
pub mod wallet;

pub use blockchain::{Block, BlockDraft, Blockchain};
pub use error::LedgerError;
pub use transaction::Transaction;
pub use wallet::Wallet;
