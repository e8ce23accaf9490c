//! Password-based private key encryption
//!
//! Keys are stretched with PBKDF2-HMAC-SHA256 and sealed with AES-256-GCM.
//! The salt, IV and round count travel with the ciphertext so a record stays
//! decryptable after the configured round count changes.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::config::WalletConfig;
use crate::error::{Error, Result};

const SALT_LENGTH: usize = 16;
const IV_LENGTH: usize = 12;
const KEY_LENGTH: usize = 32;

/// A wallet password. The contents are wiped on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Ciphertext plus everything except the password needed to open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedSecret {
    /// Hex ciphertext including the GCM tag
    pub encrypted_key: String,
    /// Hex initialization vector
    pub iv: String,
    /// Hex PBKDF2 salt
    pub salt: String,
    /// PBKDF2 rounds used for this secret
    pub iterations: u32,
}

/// Encrypt a 32-byte private key under `password`
pub fn encrypt_private_key(private_key: &[u8; 32], password: &Password, config: &WalletConfig) -> Result<EncryptedSecret> {
    if password.len() < config.min_password_length {
        return Err(Error::Encryption(format!(
            "password must have at least {} characters",
            config.min_password_length
        )));
    }

    let mut salt = [0u8; SALT_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut iv);

    let cipher = cipher_for(password, &salt, config.kdf_iterations);
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), &private_key[..])
        .map_err(|e| Error::Encryption(e.to_string()))?;

    Ok(EncryptedSecret {
        encrypted_key: hex::encode(ciphertext),
        iv: hex::encode(iv),
        salt: hex::encode(salt),
        iterations: config.kdf_iterations,
    })
}

/// Recover the private key sealed in `secret`
pub fn decrypt_private_key(secret: &EncryptedSecret, password: &Password) -> Result<Zeroizing<[u8; 32]>> {
    let salt = decode_field("salt", &secret.salt, SALT_LENGTH)?;
    let iv = decode_field("iv", &secret.iv, IV_LENGTH)?;
    let ciphertext = hex::decode(&secret.encrypted_key)
        .map_err(|e| Error::Decryption(format!("encrypted key is not hex: {}", e)))?;
    if secret.iterations == 0 {
        return Err(Error::Decryption("iteration count must be positive".to_string()));
    }

    let cipher = cipher_for(password, &salt, secret.iterations);
    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(&iv), &ciphertext[..])
            .map_err(|_| Error::Decryption("wrong password or corrupted secret".to_string()))?,
    );

    if plaintext.len() != 32 {
        return Err(Error::Decryption(format!(
            "expected 32 bytes of key material, got {}",
            plaintext.len()
        )));
    }

    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&plaintext);
    Ok(key)
}

fn cipher_for(password: &Password, salt: &[u8], iterations: u32) -> Aes256Gcm {
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_str().as_bytes(), salt, iterations, &mut key[..]);
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key[..]))
}

fn decode_field(name: &str, value: &str, expected: usize) -> Result<Vec<u8>> {
    let bytes = hex::decode(value).map_err(|e| Error::Decryption(format!("{} is not hex: {}", name, e)))?;
    if bytes.len() != expected {
        return Err(Error::Decryption(format!(
            "{} must be {} bytes, got {}",
            name,
            expected,
            bytes.len()
        )));
    }
    Ok(bytes)
}
