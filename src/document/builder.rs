//! # Document Builder
//!
//! Assembles a `did:mailio` DID Document from the subject's key material.
//!
//! The services listed in the document are operated by a separate principal
//! (the hosting service), so their ids are namespaced by the operator's DID
//! rather than the subject's.

use ed25519_dalek::PUBLIC_KEY_LENGTH;

use super::{
    AUTH_SERVICE_TYPE, DOCUMENT_CONTEXT, Document, KeyAgreement, MESSAGING_ACCEPT,
    MESSAGING_SERVICE_TYPE, MethodType, Service, ServiceEndpoints, VerificationMethod,
};
use crate::core::Kind;
use crate::did::Did;
use crate::error::{Error, tracerr};
use crate::jwk::{encode_agreement_key, encode_verification_key};
use crate::key::{Key, KeyMaterial};

/// A builder for creating a DID Document.
#[derive(Debug)]
pub struct DocumentBuilder<'a> {
    keys: &'a KeyMaterial,
    operator_key: Option<&'a [u8]>,
    endpoints: ServiceEndpoints,
}

impl<'a> DocumentBuilder<'a> {
    /// Creates a new `DocumentBuilder` for the subject holding `keys`, with
    /// services reached through `endpoints`.
    #[must_use]
    pub const fn new(keys: &'a KeyMaterial, endpoints: ServiceEndpoints) -> Self {
        Self {
            keys,
            operator_key: None,
            endpoints,
        }
    }

    /// The master signing key of the service operator hosting the subject's
    /// services.
    #[must_use]
    pub fn operator(mut self, public_key: &'a [u8]) -> Self {
        self.operator_key = Some(public_key);
        self
    }

    /// Build the DID Document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingMasterKey`] if either the subject's master key
    /// or the operator key is missing, and [`Error::KeyEncoding`] if any key
    /// cannot be encoded. No partial document is returned.
    pub fn build(self) -> crate::Result<Document> {
        let did = self.keys.identifier()?;
        let Some(operator_key) = self.operator_key else {
            tracerr!(Error::MissingMasterKey, "operator key required");
        };
        let operator = KeyMaterial::new(operator_key).identifier()?;
        let endpoints = &self.endpoints;

        let controller = did.to_string();

        // master key first, then auxiliary keys numbered from 1
        let Some(master) = &self.keys.master_sign_key else {
            tracerr!(Error::MissingMasterKey);
        };
        let mut verification_method = vec![jwk_method(master, &controller)?];
        verification_method[0].id = format!("{did}#{}", super::MASTER_FRAGMENT);
        for (i, key) in self.keys.verification_keys.iter().enumerate() {
            let mut vm = jwk_method(key, &controller)?;
            vm.id = format!("#{}", i + 1);
            verification_method.push(vm);
        }

        // the subject's DID is used as the key agreement id
        let mut key_agreement = vec![];
        if let Some(key) = &self.keys.master_agreement_key {
            key_agreement.push(agreement(key, &did)?);
        }

        // master key is the default proof of control; extra keys are embedded
        let mut authentication = vec![Kind::String(verification_method[0].id.clone())];
        for key in &self.keys.authentication_keys {
            authentication.push(Kind::Object(jwk_method(key, &controller)?));
        }

        let service = vec![
            Service {
                id: format!("{operator}#auth"),
                type_: AUTH_SERVICE_TYPE.to_string(),
                service_endpoint: endpoints.auth_endpoint(did.value()),
                ..Service::default()
            },
            Service {
                id: format!("{operator}#didcomm"),
                type_: MESSAGING_SERVICE_TYPE.to_string(),
                service_endpoint: endpoints.messaging_endpoint(did.value()),
                accept: MESSAGING_ACCEPT.iter().map(ToString::to_string).collect(),
                ..Service::default()
            },
        ];

        let document = Document {
            context: DOCUMENT_CONTEXT.iter().map(ToString::to_string).collect(),
            id: did,
            verification_method,
            key_agreement,
            authentication,
            service,
            ..Document::default()
        };
        document.validate()?;

        tracing::debug!("built document for {}", document.id);
        Ok(document)
    }
}

/// Create a DID Document for the subject holding `keys`.
///
/// `operator_key` is the master signing key of the service hosting the
/// subject's authentication and messaging services.
///
/// # Errors
///
/// See [`DocumentBuilder::build`].
pub fn create(
    keys: &KeyMaterial, operator_key: &[u8], auth_endpoint: &str, messaging_endpoint: &str,
) -> crate::Result<Document> {
    DocumentBuilder::new(keys, ServiceEndpoints::new(auth_endpoint, messaging_endpoint))
        .operator(operator_key)
        .build()
}

fn jwk_method(key: &Key, controller: &str) -> crate::Result<VerificationMethod> {
    Ok(VerificationMethod {
        id: String::new(),
        type_: MethodType::JsonWebKey2020,
        controller: controller.to_string(),
        public_key_jwk: encode_verification_key(&key.public_key)?,
    })
}

fn agreement(key: &Key, did: &Did) -> crate::Result<KeyAgreement> {
    if key.public_key.len() != PUBLIC_KEY_LENGTH {
        tracerr!(Error::KeyEncoding(format!(
            "agreement key is {} bytes, expected {PUBLIC_KEY_LENGTH}",
            key.public_key.len()
        )));
    }
    Ok(KeyAgreement {
        id: did.to_string(),
        type_: MethodType::X25519KeyAgreementKey2019,
        controller: did.to_string(),
        public_key_multibase: encode_agreement_key(&key.public_key),
        public_key_jwk: None,
    })
}
