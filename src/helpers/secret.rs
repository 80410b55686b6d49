//! Secret storage helpers.
//!
//! AES-256-GCM encryption and Base64 encoding for sensitive config fields
//! (the account password stored in the TOML config file).

use aes_gcm::{
    Aes256Gcm,
    aead::{Aead, AeadCore, KeyInit, Nonce, OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::Error;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Master encryption key for the AES-256-GCM cipher.
///
/// WARNING: In production, this should be stored securely (e.g., keychain,
/// env var) rather than hardcoded in the binary.
const MASTER_KEY: &[u8; 32] = b"ThingConsoleSecretKey2026Tchjjc!";

/// Nonce length in bytes for AES-GCM
const NONCE_LEN: usize = 12;

/// Encrypt a plaintext string for at-rest storage.
///
/// Output is Base64 of `[nonce (12 bytes)][ciphertext]`; each call uses a
/// fresh random nonce.
pub fn encrypt(plain_text: &str) -> Result<String> {
    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plain_text.as_bytes())
        .map_err(|e| Error::Invalid {
            message: format!("Encryption failed: {e}"),
        })?;

    let mut combined = nonce.to_vec();
    combined.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypt a Base64 string produced by [`encrypt`].
pub fn decrypt(cipher_text: &str) -> Result<String> {
    let data = BASE64.decode(cipher_text).map_err(|e| Error::Invalid {
        message: format!("Base64 decode failed: {e}"),
    })?;

    if data.len() < NONCE_LEN {
        return Err(Error::Invalid {
            message: "Ciphertext too short".to_string(),
        });
    }

    let cipher = Aes256Gcm::new(MASTER_KEY.into());
    let nonce = Nonce::<Aes256Gcm>::from_slice(&data[..NONCE_LEN]);

    let plaintext_bytes = cipher
        .decrypt(nonce, &data[NONCE_LEN..])
        .map_err(|e| Error::Invalid {
            message: format!("Decryption failed: {e}"),
        })?;

    String::from_utf8(plaintext_bytes).map_err(|e| Error::Invalid {
        message: format!("UTF-8 decode failed: {e}"),
    })
}
