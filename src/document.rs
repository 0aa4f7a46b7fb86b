//! # DID Document
//!
//! A DID Document is a JSON-LD document that contains information related to a
//! DID: the keys that can verify proofs made by the subject, the keys that can
//! be used to encrypt messages to it, and the services it can be reached at.

mod builder;

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

pub use self::builder::*;
use crate::core::Kind;
use crate::did::Did;
use crate::error::{Error, tracerr};
use crate::jwk::PublicKeyJwk;

/// DID v1 context.
pub const CONTEXT_DID_V1: &str = "https://www.w3.org/ns/did/v1";

/// Ed25519 2020 security suite context.
pub const CONTEXT_ED25519_2020: &str = "https://w3id.org/security/suites/ed25519-2020/v1";

/// X25519 2019 security suite context.
pub const CONTEXT_X25519_2019: &str = "https://w3id.org/security/suites/x25519-2019/v1";

/// Contexts set on every document built by this crate, in order.
pub const DOCUMENT_CONTEXT: [&str; 3] = [CONTEXT_DID_V1, CONTEXT_ED25519_2020, CONTEXT_X25519_2019];

/// Service type for the authentication service.
pub const AUTH_SERVICE_TYPE: &str = "MailioDIDAuth";

/// Service type for the messaging service.
pub const MESSAGING_SERVICE_TYPE: &str = "DIDCommMessaging";

/// Message profiles accepted by the messaging service.
pub const MESSAGING_ACCEPT: [&str; 2] = ["didcomm/v2", "didcomm/aip2;env=rfc587"];

/// Fragment of the master signing key's verification method.
pub const MASTER_FRAGMENT: &str = "master";

/// DID Document
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The context of the DID document.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The DID for a particular DID subject.
    pub id: Did,

    /// A set of URIs that are other identifiers for the subject of the above
    /// DID.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub also_known_as: Vec<String>,

    /// The `authentication` verification relationship is used to specify how
    /// the DID subject is expected to be authenticated. Entries reference a
    /// verification method by id or embed one.
    ///
    /// <https://www.w3.org/TR/did-core/#authentication>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<Kind<VerificationMethod>>,

    /// Verification methods for the DID subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verification_method: Vec<VerificationMethod>,

    /// The `key_agreement` verification relationship is used to specify how an
    /// entity can generate encryption material in order to transmit
    /// confidential information intended for the DID subject.
    ///
    /// <https://www.w3.org/TR/did-core/#key-agreement>
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_agreement: Vec<KeyAgreement>,

    /// A set of services, that express ways of communicating with the DID
    /// subject or related entities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub service: Vec<Service>,
}

impl Document {
    /// The id of the master signing key's verification method.
    #[must_use]
    pub fn master_key_id(&self) -> String {
        format!("{}#{MASTER_FRAGMENT}", self.id)
    }

    /// Find a service by id.
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.service.iter().find(|s| s.id == id)
    }

    /// Check the document's structural invariants.
    ///
    /// Every verification method must be controlled by the subject,
    /// verification method ids must be unique, the first authentication entry
    /// must reference the master key, and there is at most one key agreement
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] describing the first broken
    /// invariant.
    pub fn validate(&self) -> crate::Result<()> {
        let controller = self.id.as_str();
        let inline = self.authentication.iter().filter_map(Kind::as_object);

        for vm in self.verification_method.iter().chain(inline) {
            if vm.controller != controller {
                tracerr!(
                    Error::InvalidDocument(format!("{} is not controlled by {controller}", vm.id)),
                    "controller mismatch for {}",
                    vm.id
                );
            }
        }

        let mut ids = HashSet::new();
        for vm in &self.verification_method {
            if !ids.insert(vm.id.as_str()) {
                let msg = format!("duplicate verification method id {}", vm.id);
                tracerr!(Error::InvalidDocument(msg));
            }
        }

        let master = self.master_key_id();
        if self.authentication.first().and_then(Kind::as_string) != Some(master.as_str()) {
            let msg = format!("first authentication entry must be {master}");
            tracerr!(Error::InvalidDocument(msg));
        }

        if self.key_agreement.len() > 1 {
            tracerr!(Error::InvalidDocument("more than one key agreement entry".to_string()));
        }

        Ok(())
    }
}

/// A verification method, such as a public key, that can be used to verify a
/// proof made by the DID subject.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// Identifies the verification method. Empty for methods embedded in a
    /// verification relationship.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// The type of verification method.
    #[serde(rename = "type")]
    pub type_: MethodType,

    /// The DID of the controller of the verification method.
    pub controller: String,

    /// The public key, as a JWK.
    pub public_key_jwk: PublicKeyJwk,
}

/// A key that can be used to derive a shared secret with the DID subject.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyAgreement {
    /// Identifies the key.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// The type of key, usually `X25519KeyAgreementKey2019`.
    #[serde(rename = "type")]
    pub type_: MethodType,

    /// The DID of the controller of the key.
    pub controller: String,

    /// The raw public key, Base58 encoded.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub public_key_multibase: String,

    /// The public key, as a JWK.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
}

/// Services are used to express ways of communicating with the DID subject or
/// associated entities.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// A URI unique to the service.
    pub id: String,

    /// The service type.
    #[serde(rename = "type")]
    pub type_: String,

    /// Where the service can be reached.
    #[allow(clippy::struct_field_names)]
    pub service_endpoint: String,

    /// Message profiles the service accepts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,

    /// Keys of mediators messages should be routed through.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_keys: Vec<String>,
}

/// Verification method and key types supported by this library.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub enum MethodType {
    /// JSON Web Key (JWK), version 2020.
    #[default]
    JsonWebKey2020,

    /// `ED25519` Verification key, version 2020.
    Ed25519VerificationKey2020,

    /// `X25519` Key Agreement Key, version 2019.
    X25519KeyAgreementKey2019,

    /// Any other declared type. Kept so foreign documents deserialize; keys
    /// of this type are rejected on resolution.
    #[serde(untagged)]
    Other(String),
}

impl Display for MethodType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::JsonWebKey2020 => write!(f, "JsonWebKey2020"),
            Self::Ed25519VerificationKey2020 => write!(f, "Ed25519VerificationKey2020"),
            Self::X25519KeyAgreementKey2019 => write!(f, "X25519KeyAgreementKey2019"),
            Self::Other(type_) => write!(f, "{type_}"),
        }
    }
}

/// Service endpoint templates. The subject's method-specific identifier is
/// appended to each as `<template>/<value>`, with the template used verbatim.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoints {
    /// Authentication service base URL.
    pub auth: String,

    /// Messaging service base URL.
    pub messaging: String,
}

impl ServiceEndpoints {
    /// Create endpoint templates. No validation is applied; call
    /// [`ServiceEndpoints::validate`] to check them.
    #[must_use]
    pub fn new(auth: impl Into<String>, messaging: impl Into<String>) -> Self {
        Self {
            auth: auth.into(),
            messaging: messaging.into(),
        }
    }

    /// Check both templates parse as absolute URLs with a host.
    ///
    /// Building a document does not call this. It is for callers loading
    /// templates from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] naming the offending template.
    pub fn validate(&self) -> crate::Result<()> {
        for template in [&self.auth, &self.messaging] {
            match url::Url::parse(template) {
                Ok(url) if url.has_host() => {}
                Ok(_) => tracerr!(Error::InvalidEndpoint(format!("{template}: missing host"))),
                Err(e) => tracerr!(Error::InvalidEndpoint(format!("{template}: {e}"))),
            }
        }
        Ok(())
    }

    /// Authentication endpoint for a subject.
    #[must_use]
    pub fn auth_endpoint(&self, value: &str) -> String {
        format!("{}/{value}", self.auth)
    }

    /// Messaging endpoint for a subject.
    #[must_use]
    pub fn messaging_endpoint(&self, value: &str) -> String {
        format!("{}/{value}", self.messaging)
    }
}
