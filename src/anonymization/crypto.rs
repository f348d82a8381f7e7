//! Authenticated encryption for the reversible `encrypt` operator
//!
//! Payload layout: 12-byte random nonce followed by the AES-GCM ciphertext and
//! its 16-byte tag. The key length selects AES-128, AES-192 or AES-256.
//! Key bytes live in a [`Secret`] and are zeroized on drop; they are never
//! cached or logged.

use crate::domain::{Result, ShroudError};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use rand::RngCore;
use secrecy::{CloneableSecret, DebugSecret, ExposeSecret, Secret};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes192Gcm = AesGcm<aes_gcm::aes::Aes192, U12>;

/// Nonce length in bytes
pub const NONCE_LEN: usize = 12;

/// Authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Raw key bytes, zeroized on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl CloneableSecret for KeyMaterial {}
impl DebugSecret for KeyMaterial {}

/// Symmetric key for `encrypt` and deanonymization
///
/// # Examples
///
/// ```
/// use shroud::anonymization::crypto::EncryptionKey;
///
/// let key = EncryptionKey::from_str_key("WmZq4t7w!z%C&F)J")?;
/// assert_eq!(key.len(), 16);
/// assert!(EncryptionKey::from_str_key("too short").is_err());
/// // Debug output never shows key bytes
/// assert!(!format!("{key:?}").contains("WmZq"));
/// # Ok::<(), shroud::domain::ShroudError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EncryptionKey(Secret<KeyMaterial>);

impl EncryptionKey {
    /// Wrap raw key bytes
    ///
    /// # Errors
    ///
    /// Returns [`ShroudError::InvalidKey`] unless the key is 16, 24 or 32 bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let mut bytes = bytes.into();
        let length = bytes.len();
        if !matches!(length, 16 | 24 | 32) {
            bytes.zeroize();
            return Err(ShroudError::InvalidKey { length });
        }
        Ok(Self(Secret::new(KeyMaterial(bytes))))
    }

    /// Use the UTF-8 bytes of a string as key material
    pub fn from_str_key(key: &str) -> Result<Self> {
        Self::new(key.as_bytes().to_vec())
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.0.expose_secret().0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encrypt `plaintext` under a fresh random nonce
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::<U12>::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()?
            .encrypt(nonce, plaintext)
            .map_err(|_| ShroudError::Configuration("AES-GCM encryption failed".to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&ciphertext);
        Ok(payload)
    }

    /// Decrypt and authenticate a payload produced by [`EncryptionKey::seal`]
    ///
    /// Returns a human-readable reason on failure; callers wrap it in the
    /// error variant that fits their context.
    pub fn open(&self, payload: &[u8]) -> std::result::Result<Vec<u8>, String> {
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(format!(
                "payload of {} bytes is shorter than nonce and tag",
                payload.len()
            ));
        }
        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::<U12>::from_slice(nonce_bytes);

        self.cipher()
            .map_err(|e| e.to_string())?
            .decrypt(nonce, ciphertext)
            .map_err(|_| "authentication failed (wrong key or tampered payload)".to_string())
    }

    fn cipher(&self) -> Result<Cipher> {
        let bytes = &self.0.expose_secret().0;
        let invalid = |_| ShroudError::InvalidKey {
            length: bytes.len(),
        };
        Ok(match bytes.len() {
            16 => Cipher::Aes128(Aes128Gcm::new_from_slice(bytes).map_err(invalid)?),
            24 => Cipher::Aes192(Aes192Gcm::new_from_slice(bytes).map_err(invalid)?),
            32 => Cipher::Aes256(Aes256Gcm::new_from_slice(bytes).map_err(invalid)?),
            length => return Err(ShroudError::InvalidKey { length }),
        })
    }
}

enum Cipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl Cipher {
    fn encrypt(
        &self,
        nonce: &Nonce<U12>,
        plaintext: &[u8],
    ) -> std::result::Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Self::Aes128(c) => c.encrypt(nonce, plaintext),
            Self::Aes192(c) => c.encrypt(nonce, plaintext),
            Self::Aes256(c) => c.encrypt(nonce, plaintext),
        }
    }

    fn decrypt(
        &self,
        nonce: &Nonce<U12>,
        ciphertext: &[u8],
    ) -> std::result::Result<Vec<u8>, aes_gcm::Error> {
        match self {
            Self::Aes128(c) => c.decrypt(nonce, ciphertext),
            Self::Aes192(c) => c.decrypt(nonce, ciphertext),
            Self::Aes256(c) => c.decrypt(nonce, ciphertext),
        }
    }
}
