//! Hybrid encryption of secret values
//!
//! A fresh AES-256-GCM key encrypts the plaintext; RSA-OAEP (SHA-256, MGF1
//! SHA-256) wraps that key for the holder of the private key. The output is
//! base64 of `wrapped_key || nonce || ciphertext_and_tag`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Oaep, RsaPublicKey};
use serde_json::Value;
use sha2::Sha256;

use super::str_arg;
use crate::error::BridgeError;

pub const NAME: &str = "encrypt-secret";

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` for the holder of `public_key_pem`
pub fn encrypt_secret(public_key_pem: &str, plaintext: &str) -> Result<String, BridgeError> {
    let public_key = parse_public_key(public_key_pem)?;
    let mut rng = rand::thread_rng();

    let mut aes_key = [0u8; KEY_LEN];
    rng.fill_bytes(&mut aes_key);
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new_from_slice(&aes_key).map_err(BridgeError::crypto)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(BridgeError::crypto)?;

    let wrapped_key = public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), &aes_key)
        .map_err(BridgeError::crypto)?;

    let mut out = Vec::with_capacity(wrapped_key.len() + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&wrapped_key);
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(out))
}

/// Accepts SubjectPublicKeyInfo (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`)
fn parse_public_key(pem: &str) -> Result<RsaPublicKey, BridgeError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| BridgeError::crypto(format!("invalid public key: {}", e)))
}

pub(super) fn call(args: &[Value]) -> Result<Value, BridgeError> {
    let public_key_pem = str_arg(NAME, args, 0)?;
    let plaintext = str_arg(NAME, args, 1)?;
    encrypt_secret(public_key_pem, plaintext).map(Value::String)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::pkcs1::EncodeRsaPublicKey;
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;
    use serde_json::json;

    fn keypair() -> (RsaPrivateKey, String) {
        let mut rng = rand::thread_rng();
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();
        let pem = private
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .unwrap();
        (private, pem)
    }

    fn decrypt(private: &RsaPrivateKey, encoded: &str) -> String {
        let raw = STANDARD.decode(encoded).unwrap();
        let key_len = private.to_public_key().size();
        let (wrapped, rest) = raw.split_at(key_len);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let aes_key = private.decrypt(Oaep::new::<Sha256>(), wrapped).unwrap();
        let cipher = Aes256Gcm::new_from_slice(&aes_key).unwrap();
        let plain = cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .unwrap();
        String::from_utf8(plain).unwrap()
    }

    #[test]
    fn test_encrypt_decrypts_with_private_key() {
        let (private, pem) = keypair();
        let encoded = encrypt_secret(&pem, "hunter2").unwrap();
        assert_eq!(decrypt(&private, &encoded), "hunter2");
    }

    #[test]
    fn test_output_layout() {
        let (private, pem) = keypair();
        let encoded = encrypt_secret(&pem, "abc").unwrap();
        let raw = STANDARD.decode(&encoded).unwrap();
        // wrapped key, nonce, 3 bytes of ciphertext, 16-byte tag
        assert_eq!(raw.len(), private.to_public_key().size() + NONCE_LEN + 3 + 16);
    }

    #[test]
    fn test_fresh_key_per_call() {
        let (_, pem) = keypair();
        let a = encrypt_secret(&pem, "same").unwrap();
        let b = encrypt_secret(&pem, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_accepts_pkcs1_pem() {
        let (private, _) = keypair();
        let pem = private
            .to_public_key()
            .to_pkcs1_pem(LineEnding::LF)
            .unwrap();
        let encoded = encrypt_secret(&pem, "pkcs1").unwrap();
        assert_eq!(decrypt(&private, &encoded), "pkcs1");
    }

    #[test]
    fn test_invalid_key_is_crypto_error() {
        let err = encrypt_secret("not a key", "x").unwrap_err();
        assert_eq!(err.kind(), "CryptoError");
    }

    #[test]
    fn test_call_argument_shape() {
        let err = call(&[json!("only one")]).unwrap_err();
        assert_eq!(err.kind(), "ArgumentError");

        let (private, pem) = keypair();
        let value = call(&[json!(pem), json!("via call")]).unwrap();
        assert_eq!(decrypt(&private, value.as_str().unwrap()), "via call");
    }
}
