//! # Errors
//!
//! Errors raised while parsing identifiers, encoding keys, building
//! documents and creating or verifying credential proofs.

use thiserror::Error;

/// Log an error with `tracing` and return it from the enclosing function.
///
/// ```ignore
/// tracerr!(Error::NotFound(id.to_string()), "no key found for {id}");
/// ```
macro_rules! tracerr {
    // with message
    ($err:expr, $($msg:tt)*) => {{
        tracing::error!($($msg)*);
        return Err($err);
    }};
    // no message
    ($err:expr) => {{
        let err = $err;
        tracing::error!("{err}");
        return Err(err);
    }};
}
pub(crate) use tracerr;

/// Errors returned by this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The string does not follow the `did:<method>:<value>[#fragment]`
    /// grammar.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    /// An identifier was requested from key material with no master signing
    /// key.
    #[error("master signing key required")]
    MissingMasterKey,

    /// A key could not be converted to or from its wire encoding.
    #[error("key encoding failure: {0}")]
    KeyEncoding(String),

    /// The declared key type is outside the supported schemes.
    #[error("unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// No verification method matched the requested identifier.
    #[error("no key found for id: {0}")]
    NotFound(String),

    /// A key agreement entry carries no encoded key.
    #[error("no public key specified in key agreement")]
    NoKeyPresent,

    /// Verification was attempted on a credential with no proof.
    #[error("proof is missing")]
    ProofMissing,

    /// The proof carries an empty signature payload.
    #[error("proof signature payload is empty")]
    ProofEmpty,

    /// Cryptographic signature verification failed.
    #[error("invalid signature: {0}")]
    SignatureInvalid(String),

    /// The credential already carries a proof.
    #[error("credential is already signed")]
    AlreadySigned,

    /// A DID document breaks one of its structural invariants.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A service endpoint template is not a valid absolute URL.
    #[error("invalid service endpoint: {0}")]
    InvalidEndpoint(String),

    /// Encoding or decoding of a structured payload failed.
    #[error("serialization failure: {0}")]
    Serialization(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// A stable, machine-readable code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier(_) => "malformed_identifier",
            Self::MissingMasterKey => "missing_master_key",
            Self::KeyEncoding(_) => "key_encoding_failure",
            Self::UnsupportedKeyType(_) => "unsupported_key_type",
            Self::NotFound(_) => "not_found",
            Self::NoKeyPresent => "no_key_present",
            Self::ProofMissing => "proof_missing",
            Self::ProofEmpty => "proof_empty",
            Self::SignatureInvalid(_) => "signature_invalid",
            Self::AlreadySigned => "already_signed",
            Self::InvalidDocument(_) => "invalid_document",
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::Serialization(_) => "serialization_failure",
            Self::Other(_) => "unknown",
        }
    }

    /// Transfer the error to `OAuth2` compatible format.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.code(),
            "error_description": self.to_string(),
        })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    use super::*;
    use crate::Result;

    #[test]
    fn base_err() {
        let err = Error::MissingMasterKey;
        assert_eq!(
            err.to_json(),
            json!({
                "error": "missing_master_key",
                "error_description": "master signing key required"
            })
        );
    }

    #[test]
    fn err_with_detail() {
        let err = Error::NotFound("did:mailio:0x01#2".to_string());
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "no key found for id: did:mailio:0x01#2");
    }

    #[test]
    fn test_macro() {
        let subscriber = FmtSubscriber::builder().with_max_level(Level::ERROR).finish();
        let res = tracing::subscriber::with_default(subscriber, run_macro);

        let Err(e) = res else {
            panic!("expected error");
        };
        assert!(matches!(e, Error::ProofEmpty));
    }

    fn run_macro() -> Result<()> {
        tracerr!(Error::ProofEmpty, "test {}", "me")
    }
}
