//! # Decentralized Identifier
//!
//! Parses and formats identifiers of the form
//!
//! `did:<method>:<method-specific-id>[#<fragment>]`
//!
//! A bare fragment (`#key-1`) is also accepted as a relative reference to a
//! resource inside the containing document.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, tracerr};

/// Scheme prefix every absolute identifier starts with.
pub const DID_SCHEME: &str = "did";

/// A parsed DID.
///
/// The original string is retained verbatim and is what gets serialized, so
/// parsing and re-serializing an identifier is lossless.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did {
    raw: String,
    method: String,
    value: String,
    fragment: Option<String>,
}

impl Did {
    /// Parse a string into a `Did`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedIdentifier`] when the string is neither a
    /// bare fragment nor has at least three colon-separated segments starting
    /// with `did`.
    pub fn parse(s: &str) -> crate::Result<Self> {
        // fragment-only: keep the marker
        if s.starts_with('#') {
            return Ok(Self {
                raw: s.to_string(),
                fragment: Some(s.to_string()),
                ..Self::default()
            });
        }

        let (core, fragment) = match s.split_once('#') {
            Some((core, fragment)) => (core, Some(fragment.to_string())),
            None => (s, None),
        };

        let parts = core.splitn(3, ':').collect::<Vec<_>>();
        if parts.len() != 3 {
            tracerr!(
                Error::MalformedIdentifier(format!("{s}: must contain three parts")),
                "invalid did {s}: {} part(s)",
                parts.len()
            );
        }
        if parts[0] != DID_SCHEME {
            tracerr!(
                Error::MalformedIdentifier(format!("{s}: first segment must be '{DID_SCHEME}'")),
                "invalid did {s}: bad scheme"
            );
        }

        Ok(Self {
            raw: s.to_string(),
            method: parts[1].to_string(),
            value: parts[2].to_string(),
            fragment,
        })
    }

    /// Format a method name and method-specific identifier as a DID string.
    #[must_use]
    pub fn format(method: &str, value: &str) -> String {
        format!("{DID_SCHEME}:{method}:{value}")
    }

    /// The identifier exactly as it was parsed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// DID method, e.g. `mailio` or `web`. Empty for fragment-only
    /// identifiers.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method-specific identifier. Empty for fragment-only identifiers.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Fragment without its leading `#`, except for fragment-only
    /// identifiers where the marker is kept.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Returns `true` if the identifier is a bare `#fragment`.
    #[must_use]
    pub fn is_fragment_only(&self) -> bool {
        self.method.is_empty() && self.value.is_empty() && self.raw.starts_with('#')
    }

    /// The DID without any fragment: `did:<method>:<value>`.
    #[must_use]
    pub fn did(&self) -> String {
        if self.is_fragment_only() {
            return String::new();
        }
        Self::format(&self.method, &self.value)
    }
}

impl Display for Did {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for Did {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Did {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.raw
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mailio_did() {
        let did = Did::parse("did:mailio:1234").expect("should parse");
        assert_eq!(did.method(), "mailio");
        assert_eq!(did.value(), "1234");
        assert_eq!(did.fragment(), None);
        assert_eq!(did.to_string(), "did:mailio:1234");
    }

    #[test]
    fn web_did_with_fragment() {
        let did = Did::parse("did:web:mail.io#0xAlice").expect("should parse");
        assert_eq!(did.method(), "web");
        assert_eq!(did.value(), "mail.io");
        assert_eq!(did.fragment(), Some("0xAlice"));
        assert_eq!(did.did(), "did:web:mail.io");
        assert_eq!(did.to_string(), "did:web:mail.io#0xAlice");
    }

    #[test]
    fn fragment_only() {
        let did = Did::parse("#fragonly").expect("should parse");
        assert!(did.is_fragment_only());
        assert_eq!(did.as_str(), "#fragonly");
        assert_eq!(did.method(), "");
        assert_eq!(did.value(), "");
        assert_eq!(did.fragment(), Some("#fragonly"));
        assert_eq!(did.did(), "");
    }

    #[test]
    fn fragment_marker_stripped_once() {
        let did = Did::parse("did:mailio:0xabc##nested").expect("should parse");
        assert_eq!(did.fragment(), Some("#nested"));
        assert_eq!(did.to_string(), "did:mailio:0xabc##nested");
    }

    #[test]
    fn colons_in_value() {
        let did = Did::parse("did:web:example.com:users:alice").expect("should parse");
        assert_eq!(did.method(), "web");
        assert_eq!(did.value(), "example.com:users:alice");
    }

    #[test]
    fn too_few_parts() {
        let err = Did::parse("did:mailio").expect_err("should fail");
        assert!(matches!(err, Error::MalformedIdentifier(_)));

        let err = Did::parse("mailio").expect_err("should fail");
        assert!(matches!(err, Error::MalformedIdentifier(_)));
    }

    #[test]
    fn wrong_scheme() {
        let err = Did::parse("uri:mailio:1234").expect_err("should fail");
        assert!(matches!(err, Error::MalformedIdentifier(_)));
    }

    #[test]
    fn round_trip() {
        for s in ["did:mailio:0x1234", "did:web:mail.io#0xAlice", "#master", "did:key:z6Mk#z6Mk"] {
            let did: Did = s.parse().expect("should parse");
            assert_eq!(did.to_string(), s);
            assert_eq!(Did::parse(did.as_str()).expect("should reparse"), did);
        }
    }

    #[test]
    fn format() {
        assert_eq!(Did::format("mailio", "0x01"), "did:mailio:0x01");
    }

    #[test]
    fn serde_as_string() {
        let did = Did::parse("did:web:mail.io#0xAlice").expect("should parse");
        let json = serde_json::to_string(&did).expect("should serialize");
        assert_eq!(json, r#""did:web:mail.io#0xAlice""#);

        let back: Did = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, did);

        let res = serde_json::from_str::<Did>(r#""not-a-did""#);
        assert!(res.is_err());
    }
}
