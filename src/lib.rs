//! # Mailio DID
//!
//! Decentralized Identifiers for the `did:mailio` method: identifier parsing,
//! key-derived identifiers, DID Document construction and key resolution, and
//! Verifiable Credentials signed with Ed25519.
//!
//! ```ignore
//! let keys = KeyMaterial::new(verifying_key.to_bytes()).derive_agreement_key()?;
//! let doc = document::create(&keys, &operator_key, AUTH_TEMPLATE, MESSAGING_TEMPLATE)?;
//!
//! let mut vc = VerifiableCredential::new(doc.id.to_string());
//! vc.sign(&signing_key)?;
//! assert!(vc.verify(&resolve::resolve_verification_key(&doc, "")?)?);
//! ```

pub mod core;
pub mod credential;
pub mod did;
pub mod document;
mod error;
pub mod jwk;
pub mod key;
pub mod proof;
pub mod provider;
pub mod resolve;

pub use self::credential::{VerifiableCredential, VerifiablePresentation};
pub use self::did::Did;
pub use self::document::{Document, DocumentBuilder};
pub use self::error::Error;
pub use self::key::{Key, KeyMaterial};
pub use self::provider::{Signer, Verifier};

/// Result type for DID and credential operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
