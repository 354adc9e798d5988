use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::codec::KeyMaterial;

type HmacSha256 = Hmac<Sha256>;

const IDENTITY_LABEL: &str = "revocation-identity";

/// Payloads expose the account they belong to so rotations can be tracked per account.
pub trait SessionIdentity {
    fn account(&self) -> &str;
}

/// Turns an account and a token generation into a revocation store key.
///
/// Keyed under the access-token domain; a store key reveals nothing about the account.
#[derive(Clone)]
pub struct IdentityEncoder {
    key: [u8; 32],
}

impl IdentityEncoder {
    pub fn new(access_key: &KeyMaterial) -> Self {
        Self {
            key: access_key.derive_subkey(IDENTITY_LABEL),
        }
    }

    pub fn encode(&self, account: &str, generation: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(account.as_bytes());
        // separator keeps ("ab", "c") and ("a", "bc") apart
        mac.update(&[0u8]);
        mac.update(generation.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for IdentityEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityEncoder(..)")
    }
}
