//! # Provider Traits
//!
//! Signing and signature verification capabilities used to create and check
//! credential proofs. Implementations are provided for `ed25519-dalek` keys
//! and for keys resolved from a DID Document.

use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{SigningKey, VerifyingKey};
pub use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;

use crate::error::Error;
use crate::jwk::PublicKey;

/// Signs messages with a private key held by the implementer.
pub trait Signer {
    /// The algorithm used by [`Signer::try_sign`].
    fn algorithm(&self) -> Algorithm;

    /// The raw public key matching the signing key.
    fn public_key(&self) -> Vec<u8>;

    /// Sign the message.
    ///
    /// Implementations backed by a key store should pass its failures
    /// through as [`Error::Other`].
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key is unavailable or signing fails.
    fn try_sign(&self, msg: &[u8]) -> crate::Result<Vec<u8>>;
}

/// Verifies Ed25519 signatures against a public key held by the implementer.
pub trait Verifier {
    /// The raw Ed25519 public key signatures are checked against.
    ///
    /// # Errors
    ///
    /// Returns an error if the implementer holds no usable signature key.
    fn public_key(&self) -> crate::Result<Vec<u8>>;

    /// Verify a base64url-encoded `signature` over `msg`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureInvalid`] if the signature does not verify.
    fn verify_encoded(&self, msg: &[u8], signature: &str) -> crate::Result<()> {
        let key = DecodingKey::from_ed_der(&self.public_key()?);
        match jsonwebtoken::crypto::verify(signature, msg, &key, Algorithm::EdDSA) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::SignatureInvalid("signature does not match".to_string())),
            Err(e) => Err(Error::SignatureInvalid(e.to_string())),
        }
    }

    /// Verify `signature` over `msg`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureInvalid`] if the signature does not verify.
    fn verify(&self, msg: &[u8], signature: &[u8]) -> crate::Result<()> {
        self.verify_encoded(msg, &Base64UrlUnpadded::encode_string(signature))
    }
}

impl Signer for SigningKey {
    fn algorithm(&self) -> Algorithm {
        Algorithm::EdDSA
    }

    fn public_key(&self) -> Vec<u8> {
        self.verifying_key().to_bytes().to_vec()
    }

    fn try_sign(&self, msg: &[u8]) -> crate::Result<Vec<u8>> {
        Ok(ed25519_dalek::Signer::sign(self, msg).to_bytes().to_vec())
    }
}

impl Verifier for VerifyingKey {
    fn public_key(&self) -> crate::Result<Vec<u8>> {
        Ok(self.to_bytes().to_vec())
    }
}

impl Verifier for PublicKey {
    fn public_key(&self) -> crate::Result<Vec<u8>> {
        Ok(self.verifying_key()?.to_bytes().to_vec())
    }
}
