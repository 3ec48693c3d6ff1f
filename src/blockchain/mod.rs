pub mod block;
pub mod model;
pub mod pow;

pub use block::{Block, BlockDraft};
pub use model::Blockchain;
pub use pow::DEFAULT_POW_PREFIX;

/// Payer recorded on the synthetic genesis transaction.
pub const GENESIS_PAYER: &str = "genesis";

/// Default payee of the genesis transaction (the well-known seed identity).
pub const DEFAULT_GENESIS_PAYEE: &str = "satoshi";

/// Amount minted by the genesis transaction.
pub const GENESIS_AMOUNT: u64 = 100;
