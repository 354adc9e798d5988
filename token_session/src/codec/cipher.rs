use std::fmt;

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};

use super::errors::CodecError;
use super::key::KeyMaterial;

/// Authenticated symmetric cipher with a fixed key.
///
/// Implementations must reject any ciphertext they did not produce themselves,
/// including ciphertext produced by another instance with a different key.
pub trait TokenCipher: Send + Sync + 'static {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError>;

    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError>;
}

/// AES-256-GCM with a random 96-bit nonce prepended to the sealed output.
///
/// The domain label is bound as associated data, so two ciphers that happen
/// to share key bytes still cannot open each other's output.
pub struct AesGcmCipher {
    key: LessSafeKey,
    domain: &'static str,
    rng: SystemRandom,
}

impl AesGcmCipher {
    pub fn new(key: &KeyMaterial, domain: &'static str) -> Result<Self, CodecError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
            .map_err(|_| CodecError::Key("failed to build AES-256-GCM key".to_string()))?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            domain,
            rng: SystemRandom::new(),
        })
    }
}

impl TokenCipher for AesGcmCipher {
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CodecError::Encrypt)?;

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::from(self.domain.as_bytes()),
                &mut in_out,
            )
            .map_err(|_| CodecError::Encrypt)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        Ok(sealed)
    }

    fn open(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
        if ciphertext.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CodecError::Truncated);
        }

        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
        let nonce =
            Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| CodecError::Truncated)?;

        let mut in_out = sealed.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::from(self.domain.as_bytes()), &mut in_out)
            .map_err(|_| CodecError::Decrypt)?;

        Ok(plaintext.to_vec())
    }
}

impl fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}
