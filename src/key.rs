//! # Key Material
//!
//! The public keys belonging to a DID subject and the derivation of the
//! subject's `did:mailio` identifier from its master signing key.
//!
//! The method-specific identifier is an "address": the last 40 hex characters
//! of SHA-256 over the standard Base64 encoding of the master public key,
//! prefixed with `0x`.

use base64ct::{Base64, Encoding};
use curve25519_dalek::MontgomeryPoint;
use sha2::{Digest, Sha256};

use crate::did::Did;
use crate::document::MethodType;
use crate::error::{Error, tracerr};
use crate::jwk::{KeyScheme, PublicKey};

/// DID method for identifiers derived from key material.
pub const MAILIO_METHOD: &str = "mailio";

const ADDRESS_HEX_LEN: usize = 40;

/// A single public key and its declared type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Key {
    /// Raw public key bytes.
    pub public_key: Vec<u8>,

    /// Declared key type.
    pub key_type: MethodType,
}

impl Key {
    /// An Ed25519 signature key.
    #[must_use]
    pub fn ed25519(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
            key_type: MethodType::Ed25519VerificationKey2020,
        }
    }

    /// An X25519 key agreement key.
    #[must_use]
    pub fn x25519(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
            key_type: MethodType::X25519KeyAgreementKey2019,
        }
    }
}

/// The set of public keys held by a DID subject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Master signing key. Required to derive the subject's identifier.
    pub master_sign_key: Option<Key>,

    /// Master key agreement key.
    pub master_agreement_key: Option<Key>,

    /// Additional verification keys, in document order.
    pub verification_keys: Vec<Key>,

    /// Additional authentication keys, in document order.
    pub authentication_keys: Vec<Key>,
}

impl KeyMaterial {
    /// Create key material from an Ed25519 master public key.
    #[must_use]
    pub fn new(master_public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            master_sign_key: Some(Key::ed25519(master_public_key)),
            ..Self::default()
        }
    }

    /// Set the master key agreement key (X25519).
    #[must_use]
    pub fn agreement_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.master_agreement_key = Some(Key::x25519(public_key));
        self
    }

    /// Add an auxiliary verification key.
    ///
    /// Chain to add multiple keys.
    #[must_use]
    pub fn verification_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.verification_keys.push(Key::ed25519(public_key));
        self
    }

    /// Add an auxiliary authentication key.
    ///
    /// Chain to add multiple keys.
    #[must_use]
    pub fn authentication_key(mut self, public_key: impl Into<Vec<u8>>) -> Self {
        self.authentication_keys.push(Key::ed25519(public_key));
        self
    }

    /// Use the X25519 form of the master signing key as the master key
    /// agreement key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMasterKey`] if there is no master signing key
    /// and [`Error::KeyEncoding`] if it is not a valid Ed25519 key.
    pub fn derive_agreement_key(mut self) -> crate::Result<Self> {
        let master = self.master()?;
        let verifying_key = PublicKey::Signing {
            scheme: KeyScheme::Ed25519,
            bytes: master.public_key.clone(),
        }
        .verifying_key()?;

        let montgomery: MontgomeryPoint = verifying_key.to_montgomery();
        self.master_agreement_key = Some(Key::x25519(montgomery.to_bytes()));
        Ok(self)
    }

    /// The declared type of the master signing key.
    #[must_use]
    pub fn key_type(&self) -> Option<&MethodType> {
        self.master_sign_key.as_ref().map(|k| &k.key_type)
    }

    /// The subject's address, derived from the master signing key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMasterKey`] if there is no master signing key.
    pub fn address(&self) -> crate::Result<String> {
        let master = self.master()?;
        let encoded = Base64::encode_string(&master.public_key);
        let digest = hex::encode(Sha256::digest(encoded.as_bytes()));
        Ok(format!("0x{}", &digest[digest.len() - ADDRESS_HEX_LEN..]))
    }

    /// The subject's DID as a string, `did:mailio:<address>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMasterKey`] if there is no master signing key.
    pub fn did_string(&self) -> crate::Result<String> {
        Ok(Did::format(MAILIO_METHOD, &self.address()?))
    }

    /// The subject's DID.
    ///
    /// The formatted identifier is passed back through the parser so it is
    /// guaranteed to satisfy the identifier grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMasterKey`] if there is no master signing key.
    pub fn identifier(&self) -> crate::Result<Did> {
        Did::parse(&self.did_string()?)
    }

    fn master(&self) -> crate::Result<&Key> {
        let Some(master) = &self.master_sign_key else {
            tracerr!(Error::MissingMasterKey, "master key required");
        };
        Ok(master)
    }
}
