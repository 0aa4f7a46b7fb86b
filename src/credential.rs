//! # Verifiable Credentials
//!
//! Issue and verify credentials following the
//! [W3C Verifiable Credentials Data Model 1.0](https://www.w3.org/TR/vc-data-model/).
//!
//! A credential is created unsigned, filled in by the caller, then sealed
//! with a proof. The proof signs a CBOR encoding of the credential (without
//! its proof) and carries it as a compact JWS. Verification decodes the
//! signed credential from the JWS and checks that its issuer matches the
//! credential being verified.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, tracerr};
use crate::proof::{
    ASSERTION_METHOD, ED25519_PROOF_TYPE, Proof, ProofOptions, sign_jws, verify_jws,
};
use crate::provider::{Signer, Verifier};

/// Base context for credentials and presentations.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Type tags set on every credential issued by this crate.
pub const CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "MailioAppCredential"];

/// Type tag for presentations.
pub const PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A signed (or to be signed) claim about a subject made by an issuer.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiableCredential {
    /// The JSON-LD contexts of the credential.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Credential identifier, e.g. `http://example.edu/credentials/3732`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Credential type tags.
    #[serde(rename = "type")]
    pub type_: Vec<String>,

    /// The issuer's DID.
    pub issuer: String,

    /// When the credential was issued.
    pub issuance_date: DateTime<Utc>,

    /// The subject of the claims.
    pub credential_subject: CredentialSubject,

    /// The issuer's proof. Absent until the credential is signed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Where to check the credential's status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_status: Option<CredentialStatus>,
}

/// The subject of a credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    /// The subject's DID.
    pub id: String,

    /// Origin the credential was requested from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Application the subject has authorized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_application: Option<AuthorizedApplication>,
}

/// An application the subject has authorized to act on its behalf.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedApplication {
    /// The application's DID.
    pub id: String,

    /// Domains the application is served from, e.g. `example.com`.
    pub domains: Vec<String>,

    /// When the subject approved the application.
    pub approval_date: DateTime<Utc>,

    /// Permissions granted to the application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_permissions: Option<Vec<String>>,
}

/// Credential status information.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialStatus {
    /// Status URL, e.g. `https://example.edu/status/24`.
    pub id: String,

    /// Status method, e.g. `CredentialStatusList2017`.
    #[serde(rename = "type")]
    pub type_: String,
}

impl VerifiableCredential {
    /// Create an unsigned credential issued by `issuer` now.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            type_: CREDENTIAL_TYPES.iter().map(ToString::to_string).collect(),
            issuer: issuer.into(),
            issuance_date: Utc::now(),
            ..Self::default()
        }
    }

    /// Returns `true` once a proof has been attached.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.proof.is_some()
    }

    /// Sign the credential and attach the proof.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadySigned`] if the credential already has a proof,
    /// or any error raised while encoding or signing.
    pub fn sign(&mut self, signer: &impl Signer) -> crate::Result<()> {
        self.sign_with(signer, ProofOptions::default())
    }

    /// Sign the credential, copying `options` into the proof.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadySigned`] if the credential already has a proof,
    /// or any error raised while encoding or signing.
    pub fn sign_with(&mut self, signer: &impl Signer, options: ProofOptions) -> crate::Result<()> {
        if self.is_signed() {
            tracerr!(Error::AlreadySigned, "credential {:?} already signed", self.id);
        }

        let jws = sign_jws(&self.to_cbor()?, signer)?;
        self.proof = Some(Proof {
            type_: ED25519_PROOF_TYPE.to_string(),
            created: Utc::now(),
            proof_purpose: ASSERTION_METHOD.to_string(),
            verification_method: self.issuer.clone(),
            challenge: options.challenge,
            domain: options.domain,
            jws,
        });

        tracing::debug!("signed credential issued by {}", self.issuer);
        Ok(())
    }

    /// Verify the credential's proof.
    ///
    /// Returns `Ok(false)` when the signature is valid but was made over a
    /// credential from a different issuer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProofMissing`] or [`Error::ProofEmpty`] when there is
    /// nothing to verify, [`Error::SignatureInvalid`] when the signature
    /// doesn't verify, and [`Error::Serialization`] when the signed payload
    /// is not a credential.
    pub fn verify(&self, verifier: &impl Verifier) -> crate::Result<bool> {
        let Some(proof) = &self.proof else {
            tracerr!(Error::ProofMissing);
        };
        if proof.jws.is_empty() {
            tracerr!(Error::ProofEmpty);
        }

        let payload = verify_jws(&proof.jws, verifier)?;
        let signed: Self = ciborium::from_reader(payload.as_slice())
            .map_err(|e| Error::Serialization(format!("issue decoding credential: {e}")))?;

        if signed.issuer != self.issuer {
            tracing::warn!(
                "issuer mismatch: proof by {}, credential from {}",
                signed.issuer,
                self.issuer
            );
            return Ok(false);
        }
        Ok(true)
    }

    // CBOR encoding of the credential without its proof
    fn to_cbor(&self) -> crate::Result<Vec<u8>> {
        let unsigned = Self {
            proof: None,
            ..self.clone()
        };
        let mut buf = Vec::new();
        ciborium::into_writer(&unsigned, &mut buf)
            .map_err(|e| Error::Serialization(format!("issue encoding credential: {e}")))?;
        Ok(buf)
    }
}

/// A holder's presentation of one or more credentials.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiablePresentation {
    /// The JSON-LD contexts of the presentation.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Presentation identifier.
    pub id: String,

    /// Presentation type.
    #[serde(rename = "type")]
    pub type_: String,

    /// The holder's DID.
    pub holder: String,

    /// Credentials being presented.
    pub verifiable_credential: Vec<VerifiableCredential>,

    /// The holder's proof.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiablePresentation {
    /// Create a presentation of `credentials` by `holder`.
    #[must_use]
    pub fn new(
        id: impl Into<String>, holder: impl Into<String>, credentials: Vec<VerifiableCredential>,
    ) -> Self {
        Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            id: id.into(),
            type_: PRESENTATION_TYPE.to_string(),
            holder: holder.into(),
            verifiable_credential: credentials,
            proof: None,
        }
    }
}

#[cfg(test)]
mod test {
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    use super::*;

    const ISSUER: &str = "did:mailio:0x9f1b3c0bd2a7a1f5e0c1d8a4b2e3f4a5b6c7d8e9";

    fn credential() -> VerifiableCredential {
        let mut vc = VerifiableCredential::new(ISSUER);
        vc.id = Some("http://example.edu/credentials/3732".to_string());
        vc.credential_subject = CredentialSubject {
            id: "did:mailio:0x01".to_string(),
            authorized_application: Some(AuthorizedApplication {
                id: "did:mailio:0x02".to_string(),
                domains: vec!["example.com".to_string()],
                approval_date: Utc::now(),
                user_permissions: None,
            }),
            ..CredentialSubject::default()
        };
        vc.credential_status = Some(CredentialStatus {
            id: "https://example.edu/credentials/status/24".to_string(),
            type_: "CredentialStatusList2017".to_string(),
        });
        vc
    }

    #[test]
    fn new_credential() {
        let vc = VerifiableCredential::new(ISSUER);
        assert_eq!(vc.context, vec![CREDENTIALS_CONTEXT]);
        assert_eq!(vc.type_, vec!["VerifiableCredential", "MailioAppCredential"]);
        assert_eq!(vc.issuer, ISSUER);
        assert!(!vc.is_signed());
    }

    #[test]
    fn sign_and_verify() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut vc = credential();
        let issued = vc.issuance_date;

        vc.sign(&signing_key).expect("should sign");
        assert!(vc.is_signed());
        assert_eq!(vc.issuance_date, issued);

        let proof = vc.proof.as_ref().expect("proof");
        assert_eq!(proof.type_, "Ed25519VerificationKey2020");
        assert_eq!(proof.proof_purpose, "assertionMethod");
        assert_eq!(proof.verification_method, ISSUER);

        let before = vc.clone();
        assert!(vc.verify(&signing_key.verifying_key()).expect("should verify"));
        assert_eq!(vc, before);
    }

    #[test]
    fn sign_with_options() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut vc = credential();
        let options = ProofOptions {
            challenge: Some("c0ffee".to_string()),
            domain: Some("mail.io".to_string()),
        };
        vc.sign_with(&signing_key, options).expect("should sign");

        let proof = vc.proof.as_ref().expect("proof");
        assert_eq!(proof.challenge.as_deref(), Some("c0ffee"));
        assert_eq!(proof.domain.as_deref(), Some("mail.io"));
        assert!(vc.verify(&signing_key.verifying_key()).expect("should verify"));
    }

    #[test]
    fn sign_once() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let mut vc = credential();
        vc.sign(&signing_key).expect("should sign");

        let err = vc.sign(&signing_key).expect_err("should fail");
        assert!(matches!(err, Error::AlreadySigned));
    }

    #[test]
    fn unrelated_key() {
        let mut vc = credential();
        vc.sign(&SigningKey::generate(&mut OsRng)).expect("should sign");

        let other = SigningKey::generate(&mut OsRng).verifying_key();
        let err = vc.verify(&other).expect_err("should fail");
        assert!(matches!(err, Error::SignatureInvalid(_)));
    }

    #[test]
    fn missing_proof() {
        let vc = credential();
        let verifying_key = SigningKey::generate(&mut OsRng).verifying_key();
        assert!(matches!(vc.verify(&verifying_key), Err(Error::ProofMissing)));

        let mut vc = credential();
        vc.proof = Some(Proof::default());
        assert!(matches!(vc.verify(&verifying_key), Err(Error::ProofEmpty)));
    }

    #[test]
    fn swapped_proofs() {
        let key_a = SigningKey::generate(&mut OsRng);
        let key_b = SigningKey::generate(&mut OsRng);

        let mut vc_a = VerifiableCredential::new("did:mailio:0xa");
        vc_a.sign(&key_a).expect("should sign");
        let mut vc_b = VerifiableCredential::new("did:mailio:0xb");
        vc_b.sign(&key_b).expect("should sign");

        std::mem::swap(&mut vc_a.proof, &mut vc_b.proof);
        assert!(!vc_a.verify(&key_b.verifying_key()).expect("signature is valid"));
        assert!(!vc_b.verify(&key_a.verifying_key()).expect("signature is valid"));
    }

    #[test]
    fn presentation() {
        let vc = credential();
        let vp = VerifiablePresentation::new("urn:uuid:1", "did:mailio:0x01", vec![vc]);
        let json = serde_json::to_value(&vp).expect("should serialize");
        assert_eq!(json["type"], "VerifiablePresentation");
        assert_eq!(json["holder"], "did:mailio:0x01");
        assert_eq!(json["verifiableCredential"][0]["issuer"], ISSUER);
        assert!(json.get("proof").is_none());
    }
}
