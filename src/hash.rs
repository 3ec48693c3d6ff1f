use md5::Md5;
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as lowercase hex (64 chars). Used for chain linking.
pub fn strong_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Raw SHA-256 of `data`, the message fed to the signature scheme.
pub fn strong_digest_bytes(data: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..]);
    out
}

/// MD5 of `data` as lowercase hex (32 chars). Only the proof-of-work puzzle
/// uses this; it is deliberately weaker than the chain hash.
pub fn fast_digest(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
