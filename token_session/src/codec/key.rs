use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::errors::CodecError;

pub(crate) const KEY_LEN: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// 256-bit secret used for one key domain.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial([u8; KEY_LEN]);

impl KeyMaterial {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Accepts either 64 hex characters or a raw 32-byte string.
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let trimmed = raw.trim();

        if trimmed.len() == KEY_LEN * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            let bytes = hex::decode(trimmed)?;
            return Self::from_slice(&bytes);
        }

        if trimmed.len() == KEY_LEN {
            return Self::from_slice(trimmed.as_bytes());
        }

        Err(CodecError::Key(format!(
            "expected {} hex characters or {} raw bytes, got {} bytes",
            KEY_LEN * 2,
            KEY_LEN,
            trimmed.len()
        )))
    }

    fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let array: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| CodecError::Key("invalid key length".to_string()))?;
        Ok(Self(array))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// HMAC-SHA256 of `label` under this key.
    pub(crate) fn derive_subkey(&self, label: &str) -> [u8; KEY_LEN] {
        let mut mac =
            HmacSha256::new_from_slice(&self.0).expect("HMAC can take key of any size");
        mac.update(label.as_bytes());
        let mut out = [0u8; KEY_LEN];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}
