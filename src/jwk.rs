//! # Key Encoding
//!
//! Converts raw public keys to and from the encodings used in a DID
//! Document: a JSON Web Key for verification methods and a Base58 string for
//! key agreement entries.
//!
//! Only Ed25519 signature keys are accepted as verification keys. Any other
//! declared key type is rejected rather than decoded on a best-effort basis.

use std::fmt::{self, Display, Formatter};

use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::{PUBLIC_KEY_LENGTH, VerifyingKey};
use multibase::Base;
use serde::{Deserialize, Serialize};

use crate::error::{Error, tracerr};

/// Multicodec prefix for Ed25519 public keys (varint of `0xed`).
pub const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// Multicodec prefix for X25519 public keys (varint of `0xec`).
pub const X25519_CODEC: [u8; 2] = [0xec, 0x01];

/// JWK key type for octet key pairs.
pub const KTY_OKP: &str = "OKP";

/// Key schemes understood by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyScheme {
    /// Edwards-curve signature key.
    Ed25519,

    /// Montgomery-curve Diffie-Hellman key.
    X25519,
}

// (kty, crv) -> scheme
const JWK_SCHEMES: [(&str, &str, KeyScheme); 2] =
    [(KTY_OKP, "Ed25519", KeyScheme::Ed25519), (KTY_OKP, "X25519", KeyScheme::X25519)];

// scheme -> multicodec prefix
const MULTICODECS: [(KeyScheme, [u8; 2]); 2] =
    [(KeyScheme::Ed25519, ED25519_CODEC), (KeyScheme::X25519, X25519_CODEC)];

impl KeyScheme {
    /// Look up the scheme for a JWK `kty`/`crv` pair.
    #[must_use]
    pub fn from_jwk(kty: &str, crv: &str) -> Option<Self> {
        JWK_SCHEMES.iter().find(|(t, c, _)| *t == kty && *c == crv).map(|(_, _, s)| *s)
    }

    /// The JWK curve name for the scheme.
    #[must_use]
    pub fn curve(self) -> &'static str {
        JWK_SCHEMES.iter().find(|(_, _, s)| *s == self).map_or("", |(_, c, _)| *c)
    }

    /// The multicodec prefix for the scheme.
    #[must_use]
    pub fn codec(self) -> [u8; 2] {
        MULTICODECS.iter().find(|(s, _)| *s == self).map_or([0, 0], |(_, c)| *c)
    }

    /// Look up the scheme for a multicodec-prefixed key.
    #[must_use]
    pub fn from_codec(prefixed: &[u8]) -> Option<Self> {
        MULTICODECS.iter().find(|(_, c)| prefixed.starts_with(c)).map(|(s, _)| *s)
    }
}

impl Display for KeyScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.curve())
    }
}

/// Simplified JSON Web Key holding a public octet key.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PublicKeyJwk {
    /// Key type.
    pub kty: String,

    /// Cryptographic curve.
    #[serde(default)]
    pub crv: String,

    /// Public key bytes, base64url encoded without padding.
    #[serde(default)]
    pub x: String,
}

impl PublicKeyJwk {
    /// The scheme declared by the key, if supported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedKeyType`] for any `kty`/`crv` combination
    /// outside the supported schemes.
    pub fn scheme(&self) -> crate::Result<KeyScheme> {
        let Some(scheme) = KeyScheme::from_jwk(&self.kty, &self.crv) else {
            tracerr!(
                Error::UnsupportedKeyType(format!("{}/{}", self.kty, self.crv)),
                "unsupported key type: {}/{}",
                self.kty,
                self.crv
            );
        };
        Ok(scheme)
    }
}

/// A decoded public key, tagged with its intended use so an agreement key
/// can't be passed where a signature key is expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// A key used to verify signatures.
    Signing {
        /// Key scheme.
        scheme: KeyScheme,
        /// Raw key bytes.
        bytes: Vec<u8>,
    },

    /// A key used to derive shared secrets.
    Agreement {
        /// Key scheme.
        scheme: KeyScheme,
        /// Raw key bytes.
        bytes: Vec<u8>,
    },
}

impl PublicKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Signing { bytes, .. } | Self::Agreement { bytes, .. } => bytes,
        }
    }

    /// The key's scheme.
    #[must_use]
    pub const fn scheme(&self) -> KeyScheme {
        match self {
            Self::Signing { scheme, .. } | Self::Agreement { scheme, .. } => *scheme,
        }
    }

    /// Returns `true` for signature keys.
    #[must_use]
    pub const fn is_signing(&self) -> bool {
        matches!(self, Self::Signing { .. })
    }

    /// Convert to an Ed25519 verifying key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedKeyType`] for agreement keys and
    /// [`Error::KeyEncoding`] if the bytes are not a valid Ed25519 point.
    pub fn verifying_key(&self) -> crate::Result<VerifyingKey> {
        match self {
            Self::Signing {
                scheme: KeyScheme::Ed25519,
                bytes,
            } => ed25519_key(bytes),
            _ => tracerr!(Error::UnsupportedKeyType(format!(
                "{} key can't verify signatures",
                self.scheme()
            ))),
        }
    }

    /// Encode as a multicodec-prefixed, Base58btc multibase string (the
    /// `did:key` representation).
    #[must_use]
    pub fn to_multikey(&self) -> String {
        let mut multi_bytes = self.scheme().codec().to_vec();
        multi_bytes.extend_from_slice(self.as_bytes());
        multibase::encode(Base::Base58Btc, &multi_bytes)
    }

    /// Decode a multikey string produced by [`PublicKey::to_multikey`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyEncoding`] when the string is not valid multibase
    /// and [`Error::UnsupportedKeyType`] for unknown multicodec prefixes.
    pub fn from_multikey(multikey: &str) -> crate::Result<Self> {
        let (_, multi_bytes) =
            multibase::decode(multikey).map_err(|e| Error::KeyEncoding(e.to_string()))?;
        let Some(scheme) = KeyScheme::from_codec(&multi_bytes) else {
            tracerr!(Error::UnsupportedKeyType(format!("unknown multicodec in {multikey}")));
        };
        let bytes = multi_bytes[scheme.codec().len()..].to_vec();

        Ok(match scheme {
            KeyScheme::Ed25519 => Self::Signing { scheme, bytes },
            KeyScheme::X25519 => Self::Agreement { scheme, bytes },
        })
    }
}

/// Encode a raw Ed25519 public key as a JWK.
///
/// # Errors
///
/// Returns [`Error::KeyEncoding`] if the bytes are not a valid Ed25519
/// public key.
pub fn encode_verification_key(raw: &[u8]) -> crate::Result<PublicKeyJwk> {
    ed25519_key(raw)?;
    Ok(PublicKeyJwk {
        kty: KTY_OKP.to_string(),
        crv: KeyScheme::Ed25519.curve().to_string(),
        x: Base64UrlUnpadded::encode_string(raw),
    })
}

/// Decode a verification method JWK into a signing key.
///
/// # Errors
///
/// Returns [`Error::UnsupportedKeyType`] when the JWK is not an Ed25519 key
/// and [`Error::KeyEncoding`] when the key material is malformed.
pub fn decode_verification_key(jwk: &PublicKeyJwk) -> crate::Result<PublicKey> {
    let scheme = jwk.scheme()?;
    if scheme != KeyScheme::Ed25519 {
        tracerr!(Error::UnsupportedKeyType(format!("{scheme} is not a verification key")));
    }

    let bytes = Base64UrlUnpadded::decode_vec(&jwk.x)
        .map_err(|e| Error::KeyEncoding(format!("issue decoding key: {e}")))?;
    ed25519_key(&bytes)?;

    Ok(PublicKey::Signing { scheme, bytes })
}

/// Encode a raw key agreement key as Base58 (no multibase prefix).
#[must_use]
pub fn encode_agreement_key(raw: &[u8]) -> String {
    Base::Base58Btc.encode(raw)
}

/// Decode a Base58 key agreement key.
///
/// # Errors
///
/// Returns [`Error::KeyEncoding`] if the string is not valid Base58.
pub fn decode_agreement_key(encoded: &str) -> crate::Result<Vec<u8>> {
    Base::Base58Btc
        .decode(encoded)
        .map_err(|e| Error::KeyEncoding(format!("issue decoding key: {e}")))
}

fn ed25519_key(raw: &[u8]) -> crate::Result<VerifyingKey> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = raw.try_into().map_err(|_| {
        Error::KeyEncoding(format!("public key is not {PUBLIC_KEY_LENGTH} bytes"))
    })?;
    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::KeyEncoding(format!("invalid Ed25519 public key: {e}")))
}
