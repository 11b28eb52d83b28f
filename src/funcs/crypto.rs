//! Symmetric encryption functions: `encrypt`, `decrypt`.
//!
//! AES in CFB mode. `encrypt` draws a fresh random IV, prepends it to the
//! ciphertext, and URL-safe-base64s the whole blob; `decrypt` reverses
//! this. The key is the UTF-8 bytes of the key string and must be a valid
//! AES key size (16, 24, or 32 bytes).

use aes::cipher::{AsyncStreamCipher as _, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE;
use cel_interpreter::{ExecutionError, Value};
use rand::RngCore as _;
use std::sync::Arc;

const BLOCK_SIZE: usize = 16;

fn key_error(function: &str, len: usize) -> ExecutionError {
    ExecutionError::function_error(function, format!("invalid key size {len}: expected 16, 24, or 32 bytes"))
}

fn cipher<C: KeyIvInit>(function: &str, key: &[u8], iv: &[u8]) -> Result<C, ExecutionError> {
    C::new_from_slices(key, iv).map_err(|e| ExecutionError::function_error(function, e))
}

pub(crate) fn encrypt(key: Arc<String>, plaintext: Arc<String>) -> Result<Value, ExecutionError> {
    let key = key.as_bytes();
    let mut iv = [0_u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let mut buf = plaintext.as_bytes().to_vec();
    match key.len() {
        16 => cipher::<cfb_mode::Encryptor<Aes128>>("encrypt", key, &iv)?.encrypt(&mut buf),
        24 => cipher::<cfb_mode::Encryptor<Aes192>>("encrypt", key, &iv)?.encrypt(&mut buf),
        32 => cipher::<cfb_mode::Encryptor<Aes256>>("encrypt", key, &iv)?.encrypt(&mut buf),
        len => return Err(key_error("encrypt", len)),
    }

    let mut blob = Vec::with_capacity(BLOCK_SIZE + buf.len());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&buf);
    Ok(Value::String(Arc::new(URL_SAFE.encode(blob))))
}

pub(crate) fn decrypt(key: Arc<String>, ciphertext: Arc<String>) -> Result<Value, ExecutionError> {
    let key = key.as_bytes();
    let blob = URL_SAFE
        .decode(ciphertext.as_bytes())
        .map_err(|e| ExecutionError::function_error("decrypt", e))?;
    if blob.len() < BLOCK_SIZE {
        return Err(ExecutionError::function_error("decrypt", "ciphertext shorter than one block"));
    }

    let (iv, body) = blob.split_at(BLOCK_SIZE);
    let mut buf = body.to_vec();
    match key.len() {
        16 => cipher::<cfb_mode::Decryptor<Aes128>>("decrypt", key, iv)?.decrypt(&mut buf),
        24 => cipher::<cfb_mode::Decryptor<Aes192>>("decrypt", key, iv)?.decrypt(&mut buf),
        32 => cipher::<cfb_mode::Decryptor<Aes256>>("decrypt", key, iv)?.decrypt(&mut buf),
        len => return Err(key_error("decrypt", len)),
    }

    let text = String::from_utf8(buf).map_err(|e| ExecutionError::function_error("decrypt", e))?;
    Ok(Value::String(Arc::new(text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(s: &str) -> Arc<String> {
        Arc::new(s.to_string())
    }

    fn as_string(value: Value) -> String {
        let Value::String(s) = value else {
            panic!("expected a string");
        };
        s.as_str().to_string()
    }

    #[test]
    fn test_round_trip_all_key_sizes() {
        for key in ["0123456789abcdef", "0123456789abcdef01234567", "0123456789abcdef0123456789abcdef"] {
            let encrypted = as_string(encrypt(arc(key), arc("attack at dawn")).unwrap());
            let decrypted = as_string(decrypt(arc(key), arc(&encrypted)).unwrap());
            assert_eq!(decrypted, "attack at dawn", "key length {}", key.len());
        }
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let key = "0123456789abcdef";
        let first = as_string(encrypt(arc(key), arc("same input")).unwrap());
        let second = as_string(encrypt(arc(key), arc("same input")).unwrap());
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_key_size() {
        let result = encrypt(arc("short"), arc("text"));
        let _ = result.unwrap_err();

        let result = decrypt(arc("short"), arc("text"));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_decrypt_malformed_base64() {
        let result = decrypt(arc("0123456789abcdef"), arc("!!not base64!!"));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_decrypt_truncated_ciphertext() {
        let short = URL_SAFE.encode([0_u8; 4]);
        let result = decrypt(arc("0123456789abcdef"), arc(&short));
        let _ = result.unwrap_err();
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let key = "0123456789abcdef";
        let encrypted = as_string(encrypt(arc(key), arc("")).unwrap());
        let decrypted = as_string(decrypt(arc(key), arc(&encrypted)).unwrap());
        assert_eq!(decrypted, "");
    }
}
