//! Authenticated encryption of token material under two independent key domains.

mod cipher;
mod errors;
mod key;

use std::fmt;

pub use cipher::{AesGcmCipher, TokenCipher};
pub use errors::CodecError;
pub use key::KeyMaterial;

const ACCESS_DOMAIN: &str = "access-token";
const CSRF_DOMAIN: &str = "csrf-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDomain {
    Access,
    Csrf,
}

pub struct TokenCodec {
    access: Box<dyn TokenCipher>,
    csrf: Box<dyn TokenCipher>,
}

impl TokenCodec {
    pub fn new(access_key: &KeyMaterial, csrf_key: &KeyMaterial) -> Result<Self, CodecError> {
        if access_key == csrf_key {
            return Err(CodecError::Key(
                "access and CSRF keys must differ".to_string(),
            ));
        }

        Ok(Self {
            access: Box::new(AesGcmCipher::new(access_key, ACCESS_DOMAIN)?),
            csrf: Box::new(AesGcmCipher::new(csrf_key, CSRF_DOMAIN)?),
        })
    }

    pub fn with_ciphers(access: Box<dyn TokenCipher>, csrf: Box<dyn TokenCipher>) -> Self {
        Self { access, csrf }
    }

    fn cipher(&self, domain: KeyDomain) -> &dyn TokenCipher {
        match domain {
            KeyDomain::Access => self.access.as_ref(),
            KeyDomain::Csrf => self.csrf.as_ref(),
        }
    }

    pub fn encrypt(&self, domain: KeyDomain, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.cipher(domain).seal(plaintext)
    }

    pub fn decrypt(&self, domain: KeyDomain, ciphertext: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.cipher(domain).open(ciphertext)
    }

    pub fn encrypt_hex(&self, domain: KeyDomain, plaintext: &[u8]) -> Result<String, CodecError> {
        Ok(hex::encode(self.encrypt(domain, plaintext)?))
    }

    pub fn decrypt_hex(&self, domain: KeyDomain, encoded: &str) -> Result<Vec<u8>, CodecError> {
        let ciphertext = hex::decode(encoded)?;
        self.decrypt(domain, &ciphertext)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
