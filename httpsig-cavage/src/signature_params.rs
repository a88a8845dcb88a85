use crate::{
  error::{HttpSigError, HttpSigResult},
  message_component::REQUEST_TARGET,
  trace::*,
};

/// Wire field names that may appear in a `Signature` authorization parameter
const VALID_FIELDS: &[&str] = &["keyId", "algorithm", "headers", "signature"];

/* ---------------------------------------- */
#[derive(Debug, Clone)]
/// Verification policy for the covered-header list: which header names the
/// `headers` field must contain before a signature is even considered.
pub struct CoveredHeaderPolicy {
  required: Vec<String>,
  bind_request_target: bool,
}

impl Default for CoveredHeaderPolicy {
  /// `date` and `digest` must be covered; request-target binding is opt-in
  fn default() -> Self {
    Self {
      required: vec!["date".to_string(), "digest".to_string()],
      bind_request_target: false,
    }
  }
}

impl CoveredHeaderPolicy {
  /// Policy requiring the given header names, lowercased
  pub fn new(required: &[&str]) -> Self {
    Self {
      required: required.iter().map(|v| v.trim().to_ascii_lowercase()).collect(),
      bind_request_target: false,
    }
  }

  /// Additionally require the `(request-target)` pseudo-header to be covered,
  /// binding the signature to method and path
  pub fn bind_request_target(mut self) -> Self {
    self.bind_request_target = true;
    self
  }

  /// Check a covered-header list against this policy
  pub fn check(&self, covered_headers: &[String]) -> HttpSigResult<()> {
    for required in &self.required {
      if !covered_headers.contains(required) {
        return Err(HttpSigError::MissingCoveredHeader(required.clone()));
      }
    }
    if self.bind_request_target && !covered_headers.iter().any(|v| v == REQUEST_TARGET) {
      return Err(HttpSigError::MissingCoveredHeader(REQUEST_TARGET.to_string()));
    }
    Ok(())
  }
}

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Structured fields parsed from the parameter string following the
/// `Signature` scheme token, e.g.
/// `keyId="k1",algorithm="hmac-sha256",headers="(request-target) date digest",signature="..."`.
///
/// Transient: exists to carry validated wire data into `HttpSignature`
/// construction, nothing else.
pub struct SignatureParams {
  /// keyId field, verbatim
  pub key_id: String,
  /// algorithm field, verbatim; resolved against the registry at signature
  /// construction, not here
  pub algorithm: String,
  /// ordered covered-header list from the headers field, lowercased
  pub covered_headers: Vec<String>,
  /// base64 signature value, verbatim and untrusted
  pub signature: String,
}

impl SignatureParams {
  /// Parse the raw parameter string and enforce the covered-header policy.
  ///
  /// Parsing is total and side-effect free. Each `name="value"` segment must
  /// carry exactly two quote characters; unknown names and duplicates are
  /// rejected rather than skipped or overwritten.
  pub fn try_parse(raw: &str, policy: &CoveredHeaderPolicy) -> HttpSigResult<Self> {
    let raw = raw.trim();
    if raw.is_empty() {
      return Err(HttpSigError::InvalidSignatureString("empty parameter string".to_string()));
    }

    let mut key_id: Option<String> = None;
    let mut algorithm: Option<String> = None;
    let mut covered_headers: Option<Vec<String>> = None;
    let mut signature: Option<String> = None;

    // values are guaranteed not to contain commas, so a plain split is a
    // faithful top-level comma split
    for segment in raw.split(',') {
      if segment.chars().filter(|c| *c == '"').count() != 2 {
        return Err(HttpSigError::InvalidSignatureString(format!(
          "malformed field segment: {segment}"
        )));
      }
      let Some((name, value)) = segment.split_once('=') else {
        return Err(HttpSigError::InvalidSignatureString(format!(
          "field segment without '=': {segment}"
        )));
      };
      let name = name.trim();
      let value = value.trim();
      if !(value.len() >= 2 && value.starts_with('"') && value.ends_with('"')) {
        return Err(HttpSigError::InvalidSignatureString(format!(
          "field value not quote-delimited: {segment}"
        )));
      }
      // quote-stripping only, no unescaping
      let value = &value[1..value.len() - 1];

      if !VALID_FIELDS.contains(&name) {
        return Err(HttpSigError::InvalidSignatureField(name.to_string()));
      }

      let slot = match name {
        "keyId" => &mut key_id,
        "algorithm" => &mut algorithm,
        "signature" => &mut signature,
        "headers" => {
          if covered_headers.is_some() {
            return Err(HttpSigError::InvalidSignatureString("duplicate field: headers".to_string()));
          }
          covered_headers = Some(
            value
              .split(' ')
              .filter(|v| !v.is_empty())
              .map(|v| v.to_ascii_lowercase())
              .collect(),
          );
          continue;
        }
        _ => unreachable!(),
      };
      if slot.is_some() {
        return Err(HttpSigError::InvalidSignatureString(format!("duplicate field: {name}")));
      }
      *slot = Some(value.to_string());
    }

    let missing = [
      ("keyId", key_id.is_none()),
      ("algorithm", algorithm.is_none()),
      ("headers", covered_headers.is_none()),
      ("signature", signature.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(name, _)| *name)
    .collect::<Vec<_>>();
    if !missing.is_empty() {
      return Err(HttpSigError::MissingSignatureField(missing.join(", ")));
    }

    let covered_headers = covered_headers.unwrap();
    policy.check(&covered_headers)?;

    debug!(covered = covered_headers.len(), "parsed signature parameter string");

    Ok(Self {
      key_id: key_id.unwrap(),
      algorithm: algorithm.unwrap(),
      covered_headers,
      signature: signature.unwrap(),
    })
  }
}

impl TryFrom<&str> for SignatureParams {
  type Error = HttpSigError;

  /// Parse with the default covered-header policy (`date` and `digest`)
  fn try_from(value: &str) -> HttpSigResult<Self> {
    Self::try_parse(value, &CoveredHeaderPolicy::default())
  }
}

/* ---------------------------------------- */
#[cfg(test)]
mod tests {
  use super::*;

  const PARAM: &str = r##"keyId="k1",algorithm="hmac-sha256",headers="(request-target) host date digest",signature="ZmFrZXNpZ25hdHVyZQ==""##;

  #[test]
  fn test_parse_full_parameter() {
    let params = SignatureParams::try_from(PARAM).unwrap();
    assert_eq!(params.key_id, "k1");
    assert_eq!(params.algorithm, "hmac-sha256");
    assert_eq!(params.covered_headers, vec!["(request-target)", "host", "date", "digest"]);
    assert_eq!(params.signature, "ZmFrZXNpZ25hdHVyZQ==");
  }

  #[test]
  fn test_parse_empty_parameter() {
    for raw in ["", "   "] {
      let res = SignatureParams::try_from(raw);
      assert!(matches!(res, Err(HttpSigError::InvalidSignatureString(_))));
    }
  }

  #[test]
  fn test_parse_unknown_field() {
    let raw = r##"keyId="k1",foo="bar""##;
    let res = SignatureParams::try_from(raw);
    assert!(matches!(res, Err(HttpSigError::InvalidSignatureField(name)) if name == "foo"));
  }

  #[test]
  fn test_parse_missing_fields() {
    let raw = r##"keyId="k1""##;
    let res = SignatureParams::try_from(raw);
    let Err(HttpSigError::MissingSignatureField(missing)) = res else {
      panic!("expected MissingSignatureField");
    };
    assert_eq!(missing, "algorithm, headers, signature");
  }

  #[test]
  fn test_parse_duplicate_field() {
    let raw = r##"keyId="k1",keyId="k2",algorithm="hmac-sha256",headers="date digest",signature="c2ln""##;
    let res = SignatureParams::try_from(raw);
    assert!(matches!(res, Err(HttpSigError::InvalidSignatureString(msg)) if msg.contains("duplicate")));
  }

  #[test]
  fn test_parse_embedded_quote() {
    let raw = r##"keyId="k"1",algorithm="hmac-sha256",headers="date digest",signature="c2ln""##;
    let res = SignatureParams::try_from(raw);
    assert!(matches!(res, Err(HttpSigError::InvalidSignatureString(_))));
  }

  #[test]
  fn test_parse_unquoted_value() {
    let raw = r##"keyId=k1,algorithm="hmac-sha256",headers="date digest",signature="c2ln""##;
    let res = SignatureParams::try_from(raw);
    assert!(matches!(res, Err(HttpSigError::InvalidSignatureString(_))));
  }

  #[test]
  fn test_required_covered_headers() {
    let raw = r##"keyId="k1",algorithm="hmac-sha256",headers="host date",signature="c2ln""##;
    let res = SignatureParams::try_from(raw);
    assert!(matches!(res, Err(HttpSigError::MissingCoveredHeader(name)) if name == "digest"));

    let raw = r##"keyId="k1",algorithm="hmac-sha256",headers="date digest",signature="c2ln""##;
    assert!(SignatureParams::try_from(raw).is_ok());
  }

  #[test]
  fn test_request_target_binding_policy() {
    let policy = CoveredHeaderPolicy::default().bind_request_target();
    let raw = r##"keyId="k1",algorithm="hmac-sha256",headers="date digest",signature="c2ln""##;
    let res = SignatureParams::try_parse(raw, &policy);
    assert!(matches!(res, Err(HttpSigError::MissingCoveredHeader(name)) if name == REQUEST_TARGET));

    let raw = r##"keyId="k1",algorithm="hmac-sha256",headers="(request-target) date digest",signature="c2ln""##;
    assert!(SignatureParams::try_parse(raw, &policy).is_ok());
  }

  #[test]
  fn test_covered_headers_lowercased_in_order() {
    let raw = r##"keyId="k1",algorithm="hmac-sha256",headers="Digest Date",signature="c2ln""##;
    let params = SignatureParams::try_from(raw).unwrap();
    assert_eq!(params.covered_headers, vec!["digest", "date"]);
  }

  #[test]
  fn test_unknown_algorithm_is_not_a_parse_error() {
    // registry resolution happens at signature construction, not here
    let raw = r##"keyId="k1",algorithm="rsa-sha512",headers="date digest",signature="c2ln""##;
    let params = SignatureParams::try_from(raw).unwrap();
    assert_eq!(params.algorithm, "rsa-sha512");
  }
}
