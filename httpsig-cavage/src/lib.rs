mod algorithm;
mod crypto;
mod error;
mod message;
mod message_component;
mod signature;
mod signature_base;
mod signature_params;
mod trace;
mod util;

pub mod prelude {
  pub use crate::{
    algorithm::{AlgorithmHandle, AlgorithmRegistry, KeyedDigestFn, HMAC_SHA256},
    crypto::{InMemorySharedKeyStore, SharedKey, SharedKeyStore},
    error::{HttpSigError, HttpSigResult},
    message::Message,
    message_component::{MessageComponent, REQUEST_TARGET},
    signature::HttpSignature,
    signature_base::SignatureBase,
    signature_params::{CoveredHeaderPolicy, SignatureParams},
  };
}

/* ----------------------------------------------------------------- */
#[cfg(test)]
mod tests {
  use super::prelude::*;

  /* ----------------------------------------------------------------- */
  // pinned regression scenario: hmac-sha256 with the shared secret below over
  // `date` and `digest` must reproduce this exact digest
  const KEY_ID: &str = "hmac-key-1";
  const SHARED_SECRET_B64: &str = "Feg20ShPuW9rdxV12e20nkoKNXI=";
  const DATE_VALUE: &str = "Mon, 01 Jan 2024 00:00:00 GMT";
  const DIGEST_VALUE: &str = "SHA-256=X48E9qOokqqrvdts8nOJRJN3OWDUoyWxBf7kbu9DBPE=";
  const GOLDEN_SIGNATURE: &str = "8swhSYpcLzjnbBpITrKTI3yORHkmMexV09yLLKHAJ/E=";
  // the same secret and headers with `(request-target): get /foo?param=value` prepended
  const GOLDEN_SIGNATURE_WITH_TARGET: &str = "hlrCLF2J9INdHMDp5wHQugQi6MObkNiP4SIvXLPbPgk=";

  fn shared_key() -> SharedKey {
    SharedKey::from_base64(SHARED_SECRET_B64).unwrap()
  }

  fn signed_message(signed: &[&str]) -> Message {
    Message::try_new(
      "GET",
      "/foo?param=value",
      &[("Date", DATE_VALUE), ("Digest", DIGEST_VALUE), ("Host", "example.org")],
      signed,
    )
    .unwrap()
  }

  #[test]
  fn test_golden_signing_string_and_signature() {
    let registry = AlgorithmRegistry::default();
    let message = signed_message(&["date", "digest"]);
    let mut signature = HttpSignature::try_new(KEY_ID, HMAC_SHA256, message, &registry).unwrap();

    let base = signature.signature_base().unwrap();
    assert_eq!(base.to_string(), format!("date: {DATE_VALUE}\ndigest: {DIGEST_VALUE}"));

    let encoded = signature.sign(&shared_key()).unwrap();
    assert_eq!(encoded, GOLDEN_SIGNATURE);
    assert_eq!(
      signature.to_header_value().unwrap(),
      format!(
        "keyId=\"{KEY_ID}\",algorithm=\"hmac-sha256\",headers=\"date digest\",signature=\"{GOLDEN_SIGNATURE}\""
      )
    );
  }

  #[test]
  fn test_golden_signature_with_request_target() {
    let registry = AlgorithmRegistry::default();
    let message = signed_message(&["(request-target)", "date", "digest"]);
    let mut signature = HttpSignature::try_new(KEY_ID, HMAC_SHA256, message, &registry).unwrap();
    let encoded = signature.sign(&shared_key()).unwrap();
    assert_eq!(encoded, GOLDEN_SIGNATURE_WITH_TARGET);
  }

  #[test]
  fn test_sign_verify_round_trip_through_wire_format() {
    let registry = AlgorithmRegistry::default();

    // signer side
    let message = signed_message(&["(request-target)", "date", "digest"]);
    let mut signature = HttpSignature::try_new(KEY_ID, HMAC_SHA256, message, &registry).unwrap();
    signature.sign(&shared_key()).unwrap();
    let header_value = signature.to_header_value().unwrap();

    // verifier side, from the wire string and the raw transport headers
    let policy = CoveredHeaderPolicy::default().bind_request_target();
    let params = SignatureParams::try_parse(&header_value, &policy).unwrap();
    assert_eq!(params.key_id, KEY_ID);
    let message = Message::for_verification(
      "GET",
      "/foo?param=value",
      &[("Date", DATE_VALUE), ("Digest", DIGEST_VALUE), ("Host", "example.org")],
      &params,
    )
    .unwrap();
    let received = HttpSignature::from_params(&params, message, &registry).unwrap();
    assert!(received.verify(&shared_key()).unwrap());
  }

  #[test]
  fn test_tampering_is_detected() {
    let registry = AlgorithmRegistry::default();
    let mut signature = HttpSignature::try_new(
      KEY_ID,
      HMAC_SHA256,
      signed_message(&["(request-target)", "date", "digest"]),
      &registry,
    )
    .unwrap();
    signature.sign(&shared_key()).unwrap();
    let header_value = signature.to_header_value().unwrap();
    let params = SignatureParams::try_from(header_value.as_str()).unwrap();

    let tampered = [
      // covered header value changed
      ("GET", "/foo?param=value", "Tue, 02 Jan 2024 00:00:00 GMT"),
      // method changed
      ("POST", "/foo?param=value", DATE_VALUE),
      // path changed
      ("GET", "/bar", DATE_VALUE),
    ];
    for (method, path, date) in tampered {
      let message =
        Message::for_verification(method, path, &[("Date", date), ("Digest", DIGEST_VALUE)], &params).unwrap();
      let received = HttpSignature::from_params(&params, message, &registry).unwrap();
      assert!(!received.verify(&shared_key()).unwrap());
    }
  }

  #[test]
  fn test_verification_with_wrong_order_fails() {
    let registry = AlgorithmRegistry::default();
    let mut signature = HttpSignature::try_new(KEY_ID, HMAC_SHA256, signed_message(&["date", "digest"]), &registry).unwrap();
    let encoded = signature.sign(&shared_key()).unwrap().to_string();

    // same header set, swapped covered order
    let raw = format!(r##"keyId="{KEY_ID}",algorithm="hmac-sha256",headers="digest date",signature="{encoded}""##);
    let params = SignatureParams::try_from(raw.as_str()).unwrap();
    let message =
      Message::for_verification("GET", "/foo?param=value", &[("Date", DATE_VALUE), ("Digest", DIGEST_VALUE)], &params)
        .unwrap();
    let received = HttpSignature::from_params(&params, message, &registry).unwrap();
    assert!(!received.verify(&shared_key()).unwrap());
  }

  #[test]
  fn test_multi_value_header_joined_in_signing_string() {
    let message = Message::try_new("get", "/", &[("x-test", "a"), ("x-test", "b")], &["x-test"]).unwrap();
    let base = SignatureBase::try_new(&message).unwrap();
    assert_eq!(base.to_string(), "x-test: a, b");
  }

  #[test]
  fn test_unknown_algorithm_surfaces_at_construction() {
    let registry = AlgorithmRegistry::default();
    let raw = r##"keyId="k1",algorithm="rsa-sha512",headers="date digest",signature="c2ln""##;
    let params = SignatureParams::try_from(raw).unwrap();
    let message =
      Message::for_verification("GET", "/", &[("Date", DATE_VALUE), ("Digest", DIGEST_VALUE)], &params).unwrap();
    let res = HttpSignature::from_params(&params, message, &registry);
    assert!(matches!(res, Err(HttpSigError::UnknownAlgorithm(_))));
  }

  #[test]
  fn test_key_store_resolves_signing_secret() {
    let registry = AlgorithmRegistry::default();
    let mut store = InMemorySharedKeyStore::default();
    store.insert(KEY_ID, shared_key());

    let mut signature = HttpSignature::try_new(KEY_ID, HMAC_SHA256, signed_message(&["date", "digest"]), &registry).unwrap();
    let key = store.shared_key(signature.key_id()).unwrap();
    assert_eq!(signature.sign(&key).unwrap(), GOLDEN_SIGNATURE);
  }
}
