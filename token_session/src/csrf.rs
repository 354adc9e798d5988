//! Binding of the CSRF token to the decrypted access token.
//!
//! The CSRF value is never random: it is recomputed from the access token's
//! plaintext, so a CSRF token is only valid next to the exact access token it
//! was minted with.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::codec::KeyMaterial;

type HmacSha256 = Hmac<Sha256>;

const CSRF_BINDING_LABEL: &str = "csrf-binding";

#[derive(Clone)]
pub struct CsrfBinder {
    binding_key: [u8; 32],
}

impl CsrfBinder {
    pub fn new(csrf_key: &KeyMaterial) -> Self {
        Self {
            binding_key: csrf_key.derive_subkey(CSRF_BINDING_LABEL),
        }
    }

    pub fn derive(&self, token_plaintext: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.binding_key)
            .expect("HMAC can take key of any size");
        mac.update(token_plaintext);
        mac.finalize().into_bytes().to_vec()
    }

    pub fn verify(&self, token_plaintext: &[u8], csrf_plaintext: &[u8]) -> bool {
        let expected = self.derive(token_plaintext);
        // ct_eq short-circuits only on length, which is public (32 bytes)
        expected.ct_eq(csrf_plaintext).into()
    }
}

impl fmt::Debug for CsrfBinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CsrfBinder(..)")
    }
}
