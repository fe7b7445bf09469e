//! Transaction signers

use ed25519_dalek::{Signer as _, SigningKey};
use std::fmt;

use crate::{Error, Result};

/// Produces signatures over transaction body bytes
pub trait Signer: Send + Sync {
    /// Public key the signature verifies against
    fn public_key(&self) -> Vec<u8>;

    /// Sign `message`
    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// Ed25519 private key
pub struct Ed25519Signer {
    key: SigningKey,
}

impl Ed25519Signer {
    /// From the 32-byte secret
    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(secret),
        }
    }

    /// From a hex encoded 32-byte secret
    pub fn from_hex(secret: &str) -> Result<Self> {
        let bytes = hex::decode(secret.trim_start_matches("0x"))
            .map_err(|e| Error::Signature(format!("invalid hex key: {}", e)))?;
        let secret: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::Signature(format!("expected 32 byte key, got {}", bytes.len())))?;
        Ok(Self::from_bytes(&secret))
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> Vec<u8> {
        self.key.verifying_key().to_bytes().to_vec()
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("public_key", &hex::encode(self.public_key()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    #[test]
    fn test_signature_verifies() {
        let signer = Ed25519Signer::from_bytes(&[7u8; 32]);
        let message = b"body bytes";
        let signature = signer.sign(message);

        let public: [u8; 32] = signer.public_key().try_into().unwrap();
        let verifying_key = VerifyingKey::from_bytes(&public).unwrap();
        let signature = Signature::from_slice(&signature).unwrap();
        assert!(verifying_key.verify(message, &signature).is_ok());
    }

    #[test]
    fn test_from_hex() {
        let hex_key = hex::encode([9u8; 32]);
        let signer = Ed25519Signer::from_hex(&hex_key).unwrap();
        assert_eq!(signer.public_key(), Ed25519Signer::from_bytes(&[9u8; 32]).public_key());

        assert!(Ed25519Signer::from_hex("abcd").is_err());
        assert!(Ed25519Signer::from_hex("zz").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = Ed25519Signer::from_bytes(&[1u8; 32]);
        let debug = format!("{:?}", signer);
        assert!(debug.contains("public_key"));
        assert!(!debug.contains(&hex::encode([1u8; 32])));
    }
}
