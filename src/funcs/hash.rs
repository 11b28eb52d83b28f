//! Digest functions: `sha1`, `sha256`, `sha3`.

use sha1::Sha1;
use sha2::{Digest as _, Sha256};
use sha3::Sha3_512;
use std::sync::Arc;

/// Lowercase hex SHA-1 digest of the UTF-8 bytes of the input.
pub(crate) fn sha1_hex(input: Arc<String>) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

/// Lowercase hex SHA-256 digest of the UTF-8 bytes of the input.
pub(crate) fn sha256_hex(input: Arc<String>) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Lowercase hex SHA3-512 digest of the UTF-8 bytes of the input.
pub(crate) fn sha3_hex(input: Arc<String>) -> String {
    hex::encode(Sha3_512::digest(input.as_bytes()))
}
