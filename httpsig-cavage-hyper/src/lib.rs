//! # httpsig-cavage-hyper
//!
//! `httpsig-cavage-hyper` is a crate that provides a convenient API for `hyper` users to handle
//! draft-cavage style HTTP signatures. This crate extends hyper's http request messages with the
//! ability to attach and verify a `Signature` authorization header, and to set and verify the
//! RFC 3230 `digest` header the default verification policy covers.
//!
//! Signing and verification operate on headers only and are synchronous; the digest helpers read
//! the body and are therefore async.

mod error;
mod hyper_content_digest;
mod hyper_http;

/// digest header name
const DIGEST_HEADER: &str = "digest";

/// digest header type
pub enum ContentDigestType {
  Sha256,
  Sha512,
}

impl std::fmt::Display for ContentDigestType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ContentDigestType::Sha256 => write!(f, "SHA-256"),
      ContentDigestType::Sha512 => write!(f, "SHA-512"),
    }
  }
}

impl std::str::FromStr for ContentDigestType {
  type Err = error::HyperDigestError;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_uppercase().as_str() {
      "SHA-256" => Ok(ContentDigestType::Sha256),
      "SHA-512" => Ok(ContentDigestType::Sha512),
      _ => Err(error::HyperDigestError::InvalidContentDigestType(s.to_string())),
    }
  }
}

pub use error::{HyperDigestError, HyperDigestResult, HyperSigError, HyperSigResult};
pub use httpsig_cavage::prelude;
pub use hyper_content_digest::{ContentDigest, RequestContentDigest};
pub use hyper_http::RequestMessageSignature;

/* ----------------------------------------------------------------- */
