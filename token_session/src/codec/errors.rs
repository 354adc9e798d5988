use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid hex encoding: {0}")]
    Hex(String),

    #[error("Ciphertext too short")]
    Truncated,

    #[error("Decryption failed")]
    Decrypt,

    #[error("Encryption failed")]
    Encrypt,

    #[error("Invalid key material: {0}")]
    Key(String),
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::Hex(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_display() {
        assert_eq!(CodecError::Decrypt.to_string(), "Decryption failed");
        assert_eq!(
            CodecError::Key("too short".to_string()).to_string(),
            "Invalid key material: too short"
        );
    }

    #[test]
    fn test_from_hex_error() {
        let err = hex::decode("zz").unwrap_err();
        match CodecError::from(err) {
            CodecError::Hex(msg) => assert!(!msg.is_empty()),
            other => panic!("Expected Hex variant, got {other:?}"),
        }
    }
}
