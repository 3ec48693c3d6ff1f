use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};

use crate::blockchain::{Block, Blockchain};
use crate::error::LedgerError;
use crate::transaction::Transaction;

fn parse_secret_hex(secret_hex: &str) -> Result<SecretKey, LedgerError> {
    let bytes = hex::decode(secret_hex)
        .map_err(|_| LedgerError::InvalidKey("invalid secret key hex".into()))?;
    SecretKey::from_slice(&bytes)
        .map_err(|_| LedgerError::InvalidKey("invalid secret key bytes".into()))
}

/// Generate a new keypair and return (priv_hex, pub_hex_compressed, address_hex).
/// The address is the compressed public key itself.
pub fn generate_keypair_hex() -> (String, String, String) {
    let wallet = Wallet::new();
    let address = wallet.public_key.clone();
    (wallet.secret_key_hex(), wallet.public_key, address)
}

/// Normalize a hex public key (any case, compressed or uncompressed) into
/// the address form: lowercase hex of the compressed key.
pub fn pubkey_to_address_hex(pubkey_hex: &str) -> Result<String, LedgerError> {
    let bytes = hex::decode(pubkey_hex)
        .map_err(|_| LedgerError::InvalidKey("invalid pubkey hex".into()))?;
    let pk = PublicKey::from_slice(&bytes)
        .map_err(|_| LedgerError::InvalidKey("invalid pubkey bytes".into()))?;
    Ok(hex::encode(pk.serialize()))
}

/// Sign a 32-byte message hash with a hex secret key; returns hex DER.
pub fn sign_hex(secret_hex: &str, msg32: [u8; 32]) -> Result<String, LedgerError> {
    let sk = parse_secret_hex(secret_hex)?;
    Ok(sign_with(&sk, msg32))
}

fn sign_with(sk: &SecretKey, msg32: [u8; 32]) -> String {
    let secp = Secp256k1::signing_only();
    let msg = Message::from_digest(msg32);
    let sig = secp.sign_ecdsa(&msg, sk);
    hex::encode(sig.serialize_der().to_vec())
}

/// Verify a signature (hex DER) against the given pubkey (hex, compressed) and message hash.
/// `Err` means the inputs were malformed; `Ok(false)` means a well-formed signature did not match.
pub fn verify_signature_hex(
    pubkey_hex: &str,
    sig_hex: &str,
    msg32: [u8; 32],
) -> Result<bool, LedgerError> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex)
        .map_err(|_| LedgerError::InvalidSignature("invalid signature hex".into()))?;
    let sig = Signature::from_der(&sig_bytes)
        .map_err(|_| LedgerError::InvalidSignature("invalid DER signature".into()))?;

    let pk_bytes = hex::decode(pubkey_hex)
        .map_err(|_| LedgerError::InvalidSignature("invalid pubkey hex".into()))?;
    let pk = PublicKey::from_slice(&pk_bytes)
        .map_err(|_| LedgerError::InvalidSignature("invalid pubkey bytes".into()))?;

    let msg = Message::from_digest(msg32);
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}

/// A key pair that can originate signed transfers.
pub struct Wallet {
    secret_key: SecretKey,
    public_key: String,
}

impl Wallet {
    pub fn new() -> Self {
        let secp = Secp256k1::new();
        let (secret_key, pk) = secp.generate_keypair(&mut OsRng);
        Self {
            secret_key,
            public_key: hex::encode(pk.serialize()),
        }
    }

    pub fn from_secret_hex(secret_hex: &str) -> Result<Self, LedgerError> {
        let secret_key = parse_secret_hex(secret_hex)?;
        let secp = Secp256k1::signing_only();
        let pk = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(Self {
            secret_key,
            public_key: hex::encode(pk.serialize()),
        })
    }

    /// Compressed public key hex; doubles as the wallet's identity.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn secret_key_hex(&self) -> String {
        hex::encode(self.secret_key.secret_bytes())
    }

    /// Hex DER signature over the transaction's sighash.
    pub fn sign(&self, tx: &Transaction) -> String {
        sign_with(&self.secret_key, tx.sighash())
    }

    /// Build a transfer from this wallet to `payee`, sign it, and append it.
    pub fn send<'c>(
        &self,
        chain: &'c mut Blockchain,
        amount: u64,
        payee: &str,
    ) -> Result<&'c Block, LedgerError> {
        let tx = Transaction::new(amount, self.public_key.clone(), payee);
        let signature = self.sign(&tx);
        chain.append(tx, &self.public_key, &signature)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}
