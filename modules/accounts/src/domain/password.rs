//! Salted credential digests and opaque session tokens.
//!
//! Stored credentials are `<salt>$<sha256(salt || password)>` in hex; tokens
//! are 32 random bytes in hex. Verification is constant-shape: it always
//! recomputes the digest before comparing.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_BYTES: usize = 16;
const TOKEN_BYTES: usize = 32;

fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Produce a fresh salted digest for storage.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = hex::encode(salt);
    let digest = digest_hex(&salt, password);
    format!("{salt}${digest}")
}

/// Check a candidate password against a stored digest.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let Some((salt, digest)) = stored.split_once('$') else {
        return false;
    };
    digest_hex(salt, candidate) == digest
}

/// Opaque session token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
