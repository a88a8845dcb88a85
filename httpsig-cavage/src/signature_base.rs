use crate::{
  algorithm::AlgorithmHandle,
  crypto::SharedKey,
  error::{HttpSigError, HttpSigResult},
  message::Message,
  message_component::{MessageComponent, REQUEST_TARGET},
};
use base64::{engine::general_purpose, Engine as _};
use subtle::ConstantTimeEq;

/* ---------------------------------------- */
/// Canonical signing string, one component line per covered header in the
/// exact order of the message's covered-header list. Both parties rebuild this
/// byte-for-byte; any divergence shows up as a digest mismatch.
pub struct SignatureBase {
  component_lines: Vec<MessageComponent>,
}

impl SignatureBase {
  /// Build the component lines from a message. The `(request-target)` line is
  /// synthesized from method and path at the position it occupies in the
  /// covered order; every other line is looked up in the header set.
  pub fn try_new(message: &Message) -> HttpSigResult<Self> {
    let component_lines = message
      .signed_headers()
      .iter()
      .map(|name| {
        if name == REQUEST_TARGET {
          Ok(MessageComponent::RequestTarget {
            method: message.method().to_string(),
            path: message.path().to_string(),
          })
        } else {
          let values = message
            .field_values(name)
            .ok_or_else(|| HttpSigError::MissingCoveredHeader(name.clone()))?;
          Ok(MessageComponent::HttpField {
            name: name.clone(),
            values: values.to_vec(),
          })
        }
      })
      .collect::<HttpSigResult<Vec<_>>>()?;
    Ok(Self { component_lines })
  }

  /// Signing string as bytes to be fed into the keyed digest
  pub fn as_bytes(&self) -> Vec<u8> {
    self.to_string().into_bytes()
  }

  /// Compute the digest over the signing string and return it base64 encoded
  pub fn sign(&self, algorithm: &AlgorithmHandle, key: &SharedKey) -> String {
    let digest = algorithm.compute(key.as_bytes(), &self.as_bytes());
    general_purpose::STANDARD.encode(digest)
  }

  /// Recompute the digest and compare against a received base64 signature
  /// value in constant time over the decoded bytes. A mismatch is a normal
  /// `false` outcome; only undecodable input is a hard failure.
  pub fn verify(&self, algorithm: &AlgorithmHandle, key: &SharedKey, encoded_signature: &str) -> HttpSigResult<bool> {
    let received = general_purpose::STANDARD.decode(encoded_signature)?;
    let expected = algorithm.compute(key.as_bytes(), &self.as_bytes());
    Ok(expected.ct_eq(received.as_slice()).into())
  }
}

impl std::fmt::Display for SignatureBase {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let joined = self
      .component_lines
      .iter()
      .map(|line| line.to_string())
      .collect::<Vec<_>>()
      .join("\n");
    write!(f, "{}", joined.trim_end())
  }
}

/* ---------------------------------------- */
#[cfg(test)]
mod tests {
  use super::*;
  use crate::algorithm::{AlgorithmRegistry, HMAC_SHA256};

  fn handle() -> AlgorithmHandle {
    AlgorithmRegistry::default().resolve(HMAC_SHA256).unwrap()
  }

  fn test_message(signed: &[&str]) -> Message {
    Message::try_new(
      "GET",
      "/foo?param=value",
      &[
        ("Host", "example.org"),
        ("Date", "Mon, 01 Jan 2024 00:00:00 GMT"),
        ("Digest", "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE="),
      ],
      signed,
    )
    .unwrap()
  }

  #[test]
  fn test_signing_string_layout() {
    let message = test_message(&["(request-target)", "host", "date"]);
    let base = SignatureBase::try_new(&message).unwrap();
    assert_eq!(
      base.to_string(),
      "(request-target): get /foo?param=value\nhost: example.org\ndate: Mon, 01 Jan 2024 00:00:00 GMT"
    );
  }

  #[test]
  fn test_request_target_position_is_order_driven() {
    // (request-target) is emitted where the covered order puts it, not first
    let message = test_message(&["date", "(request-target)", "host"]);
    let base = SignatureBase::try_new(&message).unwrap();
    assert_eq!(
      base.to_string(),
      "date: Mon, 01 Jan 2024 00:00:00 GMT\n(request-target): get /foo?param=value\nhost: example.org"
    );
  }

  #[test]
  fn test_different_orders_yield_different_strings() {
    let a = SignatureBase::try_new(&test_message(&["date", "digest"])).unwrap();
    let b = SignatureBase::try_new(&test_message(&["digest", "date"])).unwrap();
    assert_ne!(a.to_string(), b.to_string());
  }

  #[test]
  fn test_sign_and_verify() {
    let key = SharedKey::new(b"01234567890123456789012345678901".to_vec());
    let base = SignatureBase::try_new(&test_message(&["date", "digest"])).unwrap();
    let encoded = base.sign(&handle(), &key);
    assert!(base.verify(&handle(), &key, &encoded).unwrap());

    let other_key = SharedKey::new(b"another-secret".to_vec());
    assert!(!base.verify(&handle(), &other_key, &encoded).unwrap());
  }

  #[test]
  fn test_verify_rejects_undecodable_signature() {
    let key = SharedKey::new(b"secret".to_vec());
    let base = SignatureBase::try_new(&test_message(&["date"])).unwrap();
    let res = base.verify(&handle(), &key, "not base64 !!");
    assert!(matches!(res, Err(HttpSigError::Base64DecodeError(_))));
  }

  #[test]
  fn test_verify_length_mismatch_is_false() {
    let key = SharedKey::new(b"secret".to_vec());
    let base = SignatureBase::try_new(&test_message(&["date"])).unwrap();
    assert!(!base.verify(&handle(), &key, "c2hvcnQ=").unwrap());
  }
}
