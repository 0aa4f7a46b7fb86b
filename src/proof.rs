//! # Credential Proof
//!
//! The proof attached to a Verifiable Credential and the compact JWS envelope
//! that carries its signature.
//!
//! The JWS payload is the signed object itself (not a detached hash), so a
//! verifier recovers the exact value that was signed.

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, Utc};
use jsonwebtoken::Header;
use serde::{Deserialize, Serialize};

use crate::error::{Error, tracerr};
use crate::provider::{Algorithm, Signer, Verifier};

/// Proof type for Ed25519 signatures.
pub const ED25519_PROOF_TYPE: &str = "Ed25519VerificationKey2020";

/// Proof purpose for credentials asserted by their issuer.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// A proof over a credential.
///
/// `verification_method` holds the issuer's DID rather than a specific key
/// within the issuer's document; the verifier decides which of the issuer's
/// keys to check against.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// The specific proof type.
    #[serde(rename = "type")]
    pub type_: String,

    /// The date-time the proof was created.
    pub created: DateTime<Utc>,

    /// The reason for the proof.
    pub proof_purpose: String,

    /// Used to verify the proof.
    pub verification_method: String,

    /// Used to mitigate replay attacks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge: Option<String>,

    /// Security domain in which the proof is meant to be used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Compact JWS over the signed object.
    #[serde(default)]
    pub jws: String,
}

/// Optional values copied into a proof when it is created.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProofOptions {
    /// Challenge supplied by the verifier.
    pub challenge: Option<String>,

    /// Domain the proof is bound to.
    pub domain: Option<String>,
}

/// Sign `payload` into a compact JWS: `header.payload.signature`, each part
/// base64url encoded without padding.
///
/// The payload is carried as raw bytes, so any binary encoding survives.
///
/// # Errors
///
/// Returns an error if the header can't be serialized or signing fails.
pub fn sign_jws(payload: &[u8], signer: &impl Signer) -> crate::Result<String> {
    let mut header = Header::new(signer.algorithm());
    header.typ = None;

    let signing_input = format!(
        "{}.{}",
        Base64UrlUnpadded::encode_string(&serde_json::to_vec(&header)?),
        Base64UrlUnpadded::encode_string(payload)
    );
    let signature = signer.try_sign(signing_input.as_bytes())?;
    Ok(format!("{signing_input}.{}", Base64UrlUnpadded::encode_string(&signature)))
}

/// Verify a compact JWS and return its payload.
///
/// # Errors
///
/// Returns [`Error::SignatureInvalid`] if the JWS is malformed, names an
/// unsupported algorithm, or the signature does not verify.
pub fn verify_jws(jws: &str, verifier: &impl Verifier) -> crate::Result<Vec<u8>> {
    let header = match jsonwebtoken::decode_header(jws) {
        Ok(header) => header,
        Err(e) => tracerr!(Error::SignatureInvalid(format!("invalid JWS: {e}"))),
    };
    if header.alg != Algorithm::EdDSA {
        tracerr!(Error::SignatureInvalid(format!("unsupported algorithm {:?}", header.alg)));
    }

    // a decodable header has no '.', so there are exactly three parts
    let Some((signing_input, signature)) = jws.rsplit_once('.') else {
        tracerr!(Error::SignatureInvalid("missing JWS signature".to_string()));
    };
    if let Err(e) = verifier.verify_encoded(signing_input.as_bytes(), signature) {
        tracerr!(e, "JWS signature verification failed");
    }

    let payload = signing_input.split_once('.').map_or("", |(_, payload)| payload);
    Base64UrlUnpadded::decode_vec(payload)
        .map_err(|e| Error::SignatureInvalid(format!("invalid JWS payload: {e}")))
}
