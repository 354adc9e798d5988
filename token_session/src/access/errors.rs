use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Serialization, signing or encryption failed while minting.
    #[error("Token encoding error: {0}")]
    Encoding(String),

    /// The decrypted bytes are not a well-formed, correctly signed token.
    #[error("Token parse error: {0}")]
    Parse(String),

    /// Expired or carrying a role outside the allowed set. The two cases are
    /// deliberately not told apart.
    #[error("Token expired or unauthorized")]
    ExpiredOrUnauthorized,
}

impl From<CodecError> for AccessError {
    fn from(err: CodecError) -> Self {
        Self::Encoding(err.to_string())
    }
}
