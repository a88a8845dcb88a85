use crate::{
  error::{HttpSigError, HttpSigResult},
  message_component::REQUEST_TARGET,
  signature_params::SignatureParams,
  util::has_unique_elements,
};
use indexmap::IndexMap;

/* ---------------------------------------- */
#[derive(Debug, Clone, PartialEq, Eq)]
/// Normalized view of an HTTP request for signing purposes: method, path, a
/// case-insensitive multi-value header map, and the ordered list of header
/// names participating in the signature. Immutable after construction.
pub struct Message {
  method: String,
  path: String,
  headers: IndexMap<String, Vec<String>>,
  signed_headers: Vec<String>,
}

impl Message {
  /// Build a message from transport data.
  ///
  /// Header pairs are taken in transport order; repeated names accumulate
  /// their values in that order. Names, method and path are lowercased and
  /// trimmed; header values are trimmed but case-preserved since value case is
  /// signature-significant. An empty `signed_headers` slice covers all headers
  /// in transport order.
  ///
  /// Every name in `signed_headers` must exist in the header set, except the
  /// `(request-target)` pseudo-header which is synthesized at signing time.
  pub fn try_new(method: &str, path: &str, headers: &[(&str, &str)], signed_headers: &[&str]) -> HttpSigResult<Self> {
    let method = method.trim().to_ascii_lowercase();
    if method.is_empty() {
      return Err(HttpSigError::InvalidMessage("empty method".to_string()));
    }
    let path = path.trim().to_ascii_lowercase();
    if path.is_empty() {
      return Err(HttpSigError::InvalidMessage("empty path".to_string()));
    }

    let mut header_map: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, value) in headers {
      header_map
        .entry(name.trim().to_ascii_lowercase())
        .or_default()
        .push(value.trim().to_string());
    }

    let signed_headers = if signed_headers.is_empty() {
      header_map.keys().cloned().collect::<Vec<_>>()
    } else {
      signed_headers
        .iter()
        .map(|v| v.trim().to_ascii_lowercase())
        .collect::<Vec<_>>()
    };
    if !has_unique_elements(signed_headers.iter()) {
      return Err(HttpSigError::InvalidMessage("duplicate signed header names".to_string()));
    }
    for name in &signed_headers {
      if name != REQUEST_TARGET && !header_map.contains_key(name) {
        return Err(HttpSigError::MissingCoveredHeader(name.clone()));
      }
    }

    Ok(Self {
      method,
      path,
      headers: header_map,
      signed_headers,
    })
  }

  /// Build a message for verification of a received request: the covered
  /// order comes verbatim from the parsed signature fields, and the header
  /// set is filtered down to the headers that list says were signed.
  pub fn for_verification(
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    params: &SignatureParams,
  ) -> HttpSigResult<Self> {
    let filtered = headers
      .iter()
      .filter(|(name, _)| {
        params
          .covered_headers
          .contains(&name.trim().to_ascii_lowercase())
      })
      .copied()
      .collect::<Vec<_>>();
    let covered = params.covered_headers.iter().map(|v| v.as_str()).collect::<Vec<_>>();
    Self::try_new(method, path, &filtered, &covered)
  }

  /// Lowercase request method
  pub fn method(&self) -> &str {
    &self.method
  }

  /// Lowercase request path, including the query string
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Ordered covered-header names
  pub fn signed_headers(&self) -> &[String] {
    &self.signed_headers
  }

  /// Values of a header by lowercase name, in preserved transport order
  pub fn field_values(&self, name: &str) -> Option<&[String]> {
    self.headers.get(name).map(|v| v.as_slice())
  }
}

/* ---------------------------------------- */
