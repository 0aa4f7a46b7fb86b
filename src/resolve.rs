//! # Key Resolution
//!
//! Look up and decode public keys held in a DID Document.

use crate::core::Kind;
use crate::document::{Document, KeyAgreement, MethodType, VerificationMethod};
use crate::error::{Error, tracerr};
use crate::jwk::{KeyScheme, PublicKey, decode_agreement_key, decode_verification_key};

/// Resolve the public key of the verification method with the given id.
///
/// An empty `id` matches the first verification method in the document.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if no verification method matches, and
/// [`Error::UnsupportedKeyType`] if the matched method's key is not an
/// Ed25519 signature key.
pub fn resolve_verification_key(doc: &Document, id: &str) -> crate::Result<PublicKey> {
    let Some(vm) = doc.verification_method.iter().find(|vm| id.is_empty() || vm.id == id) else {
        tracerr!(Error::NotFound(id.to_string()), "no key found by id {id}");
    };
    decode_method(vm)
}

/// Resolve the public key held in a key agreement entry.
///
/// # Errors
///
/// Returns [`Error::NoKeyPresent`] if the entry has no Base58 key,
/// [`Error::UnsupportedKeyType`] if the entry is not an X25519 key, and
/// [`Error::KeyEncoding`] if the key can't be decoded.
pub fn resolve_agreement_key(key_agreement: &KeyAgreement) -> crate::Result<PublicKey> {
    if key_agreement.public_key_multibase.is_empty() {
        tracerr!(Error::NoKeyPresent);
    }
    if key_agreement.type_ != MethodType::X25519KeyAgreementKey2019 {
        tracerr!(Error::UnsupportedKeyType(key_agreement.type_.to_string()));
    }

    Ok(PublicKey::Agreement {
        scheme: KeyScheme::X25519,
        bytes: decode_agreement_key(&key_agreement.public_key_multibase)?,
    })
}

/// Resolve the keys of every authentication entry, in document order.
///
/// Referenced entries are looked up in the document's verification methods;
/// embedded entries are decoded directly.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if a reference doesn't resolve, or any
/// decoding error for the referenced key.
pub fn resolve_authentication_keys(doc: &Document) -> crate::Result<Vec<PublicKey>> {
    doc.authentication
        .iter()
        .map(|entry| match entry {
            // an empty reference is not a wildcard here
            Kind::String(id) if id.is_empty() => Err(Error::NotFound(String::new())),
            Kind::String(id) => resolve_verification_key(doc, id),
            Kind::Object(vm) => decode_method(vm),
        })
        .collect()
}

fn decode_method(vm: &VerificationMethod) -> crate::Result<PublicKey> {
    match vm.type_ {
        MethodType::JsonWebKey2020 | MethodType::Ed25519VerificationKey2020 => {
            decode_verification_key(&vm.public_key_jwk)
        }
        MethodType::X25519KeyAgreementKey2019 | MethodType::Other(_) => {
            tracerr!(Error::UnsupportedKeyType(vm.type_.to_string()))
        }
    }
}

#[cfg(test)]
mod test {
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    use super::*;
    use crate::document::create;
    use crate::jwk::PublicKeyJwk;
    use crate::key::KeyMaterial;

    fn public_key() -> [u8; 32] {
        SigningKey::generate(&mut OsRng).verifying_key().to_bytes()
    }

    fn document(keys: &KeyMaterial) -> Document {
        create(keys, &public_key(), "https://auth.mailio.com", "https://msg.mailio.com")
            .expect("should build")
    }

    #[test]
    fn master_key() {
        let master = public_key();
        let keys = KeyMaterial::new(master);
        let doc = document(&keys);

        let key =
            resolve_verification_key(&doc, &format!("{}#master", doc.id)).expect("should resolve");
        assert!(key.is_signing());
        assert_eq!(key.as_bytes(), master);
    }

    #[test]
    fn auxiliary_key() {
        let aux = public_key();
        let keys = KeyMaterial::new(public_key()).verification_key(aux);
        let doc = document(&keys);

        let key = resolve_verification_key(&doc, "#1").expect("should resolve");
        assert_eq!(key.as_bytes(), aux);
    }

    #[test]
    fn wildcard() {
        let master = public_key();
        let keys = KeyMaterial::new(master).verification_key(public_key());
        let doc = document(&keys);

        let key = resolve_verification_key(&doc, "").expect("should resolve");
        assert_eq!(key.as_bytes(), master);
    }

    #[test]
    fn not_found() {
        let doc = document(&KeyMaterial::new(public_key()));
        let err = resolve_verification_key(&doc, "#7").expect_err("should fail");
        assert!(matches!(err, Error::NotFound(_)));

        let empty = Document::default();
        let err = resolve_verification_key(&empty, "").expect_err("should fail");
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn unsupported_key_type() {
        let mut doc = document(&KeyMaterial::new(public_key()));
        doc.verification_method[0].public_key_jwk = PublicKeyJwk {
            kty: "EC".to_string(),
            crv: "P-256".to_string(),
            x: "f83OJ3D2xF1Bg8vub9tLe1gHMzV76e8Tus9uPHvRVEU".to_string(),
        };
        let err = resolve_verification_key(&doc, "").expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedKeyType(_)));

        doc.verification_method[0].type_ = MethodType::X25519KeyAgreementKey2019;
        let err = resolve_verification_key(&doc, "").expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedKeyType(_)));
    }

    #[test]
    fn foreign_key_types() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": "did:example:123",
            "verificationMethod": [{
                "id": "did:example:123#key-1",
                "type": "Ed25519VerificationKey2018",
                "controller": "did:example:123",
                "publicKeyJwk": {"kty": "OKP", "crv": "Ed25519", "x": "abc"}
            }],
            "keyAgreement": [{
                "id": "did:example:123#key-2",
                "type": "X25519KeyAgreementKey2020",
                "controller": "did:example:123",
                "publicKeyMultibase": "z6LSbysY2xFMRpGMhb7tFTLMpeuPRaqaWM1yECx2AtzE3KCc"
            }]
        }))
        .expect("should deserialize");

        let vm = &doc.verification_method[0];
        assert_eq!(vm.type_, MethodType::Other("Ed25519VerificationKey2018".to_string()));
        let err = resolve_verification_key(&doc, "did:example:123#key-1").expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedKeyType(t) if t == "Ed25519VerificationKey2018"));

        let err = resolve_agreement_key(&doc.key_agreement[0]).expect_err("should fail");
        assert!(matches!(err, Error::UnsupportedKeyType(t) if t == "X25519KeyAgreementKey2020"));

        let ser = serde_json::to_value(&doc).expect("should serialize");
        assert_eq!(ser["verificationMethod"][0]["type"], "Ed25519VerificationKey2018");
    }

    #[test]
    fn agreement_key() {
        let agreement = [3u8; 32];
        let keys = KeyMaterial::new(public_key()).agreement_key(agreement);
        let doc = document(&keys);

        let key = resolve_agreement_key(&doc.key_agreement[0]).expect("should resolve");
        assert!(!key.is_signing());
        assert_eq!(key.scheme(), KeyScheme::X25519);
        assert_eq!(key.as_bytes(), agreement);
    }

    #[test]
    fn no_agreement_key() {
        let err = resolve_agreement_key(&KeyAgreement::default()).expect_err("should fail");
        assert!(matches!(err, Error::NoKeyPresent));

        let bad = KeyAgreement {
            type_: MethodType::X25519KeyAgreementKey2019,
            public_key_multibase: "0OIl".to_string(),
            ..KeyAgreement::default()
        };
        let err = resolve_agreement_key(&bad).expect_err("should fail");
        assert!(matches!(err, Error::KeyEncoding(_)));
    }

    #[test]
    fn authentication_keys() {
        let master = public_key();
        let auth = public_key();
        let keys = KeyMaterial::new(master).authentication_key(auth);
        let doc = document(&keys);

        let resolved = resolve_authentication_keys(&doc).expect("should resolve");
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].as_bytes(), master);
        assert_eq!(resolved[1].as_bytes(), auth);
    }
}
