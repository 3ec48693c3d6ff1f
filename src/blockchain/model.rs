use std::sync::atomic::AtomicBool;
use std::time::Instant;

use log::{debug, info, warn};

use super::{
    Block, BlockDraft, DEFAULT_GENESIS_PAYEE, DEFAULT_POW_PREFIX, GENESIS_AMOUNT, GENESIS_PAYER,
};
use crate::error::LedgerError;
use crate::transaction::Transaction;
use crate::wallet::verify_signature_hex;

/// Simple in-memory ledger with signature-gated, proof-of-work appends.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
    pow_prefix: String,
}

impl Blockchain {
    /// Initialize a new chain holding only the genesis block.
    pub fn new(pow_prefix: impl Into<String>, genesis_payee: &str) -> Self {
        let genesis_tx = Transaction::new(GENESIS_AMOUNT, GENESIS_PAYER, genesis_payee);
        let genesis = BlockDraft::new(None, genesis_tx).freeze();
        Self {
            chain: vec![genesis],
            pow_prefix: pow_prefix.into(),
        }
    }

    /// Chain with the default puzzle prefix and genesis payee.
    pub fn genesis() -> Self {
        Self::new(DEFAULT_POW_PREFIX, DEFAULT_GENESIS_PAYEE)
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Never true: genesis is pushed at construction and nothing is removed.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn pow_prefix(&self) -> &str {
        &self.pow_prefix
    }

    /// Verify `signature` over `transaction`, then mine a block on top of the
    /// tip and push it. On `Err` the chain is unchanged.
    pub fn append(
        &mut self,
        transaction: Transaction,
        signer_public_key: &str,
        signature: &str,
    ) -> Result<&Block, LedgerError> {
        let draft = self.admit(transaction, signer_public_key, signature)?;
        let t0 = Instant::now();
        let (block, solution) = draft.mine(&self.pow_prefix);
        Ok(self.push(block, solution, t0))
    }

    /// [`Blockchain::append`] with a cancellation flag for the mining step.
    pub fn append_cancellable(
        &mut self,
        transaction: Transaction,
        signer_public_key: &str,
        signature: &str,
        cancel: &AtomicBool,
    ) -> Result<&Block, LedgerError> {
        let draft = self.admit(transaction, signer_public_key, signature)?;
        let t0 = Instant::now();
        let Some((block, solution)) = draft.mine_cancellable(&self.pow_prefix, cancel) else {
            warn!("mining cancelled for block #{}", self.chain.len());
            return Err(LedgerError::MiningCancelled);
        };
        Ok(self.push(block, solution, t0))
    }

    /// Signature gate plus candidate construction against the current tip.
    fn admit(
        &self,
        transaction: Transaction,
        signer_public_key: &str,
        signature: &str,
    ) -> Result<BlockDraft, LedgerError> {
        let verified = verify_signature_hex(signer_public_key, signature, transaction.sighash())
            .inspect_err(|e| warn!("append rejected: {e}"))?;
        if !verified {
            warn!("append rejected: signature does not match transaction");
            return Err(LedgerError::InvalidSignature(
                "signature does not match transaction".into(),
            ));
        }

        let draft = BlockDraft::new(Some(self.tip().hash()), transaction);
        debug!(
            "mining block #{} (seed nonce {}, prefix {:?})",
            self.chain.len(),
            draft.nonce,
            self.pow_prefix
        );
        Ok(draft)
    }

    fn push(&mut self, block: Block, solution: u64, t0: Instant) -> &Block {
        info!(
            "{}",
            appended_summary(self.chain.len(), &block, solution, t0.elapsed().as_millis())
        );
        self.chain.push(block);
        self.tip()
    }

    /// Validate the entire chain: genesis shape, linkage and PoW.
    pub fn is_valid_chain(&self) -> bool {
        let Some(genesis) = self.chain.first() else {
            return false;
        };
        if genesis.previous_hash().is_some() || genesis.transaction().payer() != GENESIS_PAYER {
            return false;
        }

        self.chain.windows(2).all(|pair| {
            let (prev, current) = (&pair[0], &pair[1]);
            current.previous_hash() == Some(prev.hash().as_str())
                && current.has_valid_pow(&self.pow_prefix)
        })
    }
}

/// Log line for an accepted block.
fn appended_summary(index: usize, block: &Block, solution: u64, elapsed_ms: u128) -> String {
    format!(
        "block #{index} appended: hash={} nonce={} solved={solution} ({elapsed_ms} ms)",
        block.hash(),
        block.nonce()
    )
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::genesis()
    }
}
