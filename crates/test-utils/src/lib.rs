//! Key fixtures for testing

use curve25519_dalek::MontgomeryPoint;
use ed25519_dalek::{SigningKey, VerifyingKey};
use mailio_did::KeyMaterial;
use rand::RngCore;
use rand::rngs::OsRng;

/// Service endpoint used for authentication in tests.
pub const AUTH_ENDPOINT: &str = "https://auth.mail.io/api/v1/did";

/// Service endpoint used for messaging in tests.
pub const MESSAGING_ENDPOINT: &str = "https://mail.io/api/v1/didcomm/";

/// A freshly generated set of private keys for a single DID subject.
#[derive(Clone)]
pub struct Keyring {
    signing_key: SigningKey,
    agreement_secret: [u8; 32],
}

impl Keyring {
    /// Generate a new master signing key and key agreement secret.
    #[must_use]
    pub fn new() -> Self {
        let mut agreement_secret = [0u8; 32];
        OsRng.fill_bytes(&mut agreement_secret);

        Self {
            signing_key: SigningKey::generate(&mut OsRng),
            agreement_secret,
        }
    }

    /// The master signing key.
    #[must_use]
    pub const fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The master verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Raw master public key bytes.
    #[must_use]
    pub fn public_key(&self) -> [u8; 32] {
        self.verifying_key().to_bytes()
    }

    /// The X25519 public key for key agreement.
    #[must_use]
    pub fn agreement_public_key(&self) -> [u8; 32] {
        MontgomeryPoint::mul_base_clamped(self.agreement_secret).to_bytes()
    }

    /// X25519 shared secret with another party's agreement public key.
    #[must_use]
    pub fn shared_secret(&self, public_key: [u8; 32]) -> [u8; 32] {
        MontgomeryPoint(public_key).mul_clamped(self.agreement_secret).to_bytes()
    }

    /// Key material holding the master signing and agreement public keys.
    #[must_use]
    pub fn key_material(&self) -> KeyMaterial {
        KeyMaterial::new(self.public_key()).agreement_key(self.agreement_public_key())
    }
}

impl Default for Keyring {
    fn default() -> Self {
        Self::new()
    }
}
