use crate::error::{HyperSigError, HyperSigResult};
use http::{header, Request};
use httpsig_cavage::prelude::{
  AlgorithmRegistry, CoveredHeaderPolicy, HttpSignature, Message, SharedKey, SharedKeyStore, SignatureParams,
};
use tracing::debug;

/// Authorization scheme token carrying the signature parameter string
const SIGNATURE_SCHEME: &str = "Signature";

/* --------------------------------------- */
/// Extension trait attaching and verifying a cavage `Authorization: Signature ...`
/// header on an http request.
///
/// The request supplies method, path and headers; key material and the
/// algorithm registry are handed in by the caller. Signing covers headers
/// only, so everything here is synchronous.
pub trait RequestMessageSignature {
  type Error;

  /// Check if the request has an authorization header of the Signature scheme
  fn has_message_signature(&self) -> bool;

  /// Build the signature over the given covered-header order (empty slice
  /// covers all request headers in transport order) and set the resulting
  /// authorization header. The `(request-target)` pseudo-header may appear
  /// anywhere in `covered_headers`.
  fn set_message_signature(
    &mut self,
    key_id: &str,
    key: &SharedKey,
    algorithm: &str,
    covered_headers: &[&str],
    registry: &AlgorithmRegistry,
  ) -> Result<(), Self::Error>;

  /// Verify the signature carried in the authorization header. The secret is
  /// resolved through the key store by the received keyId. Returns
  /// `Ok(false)` on digest mismatch; malformed wire data, policy violations
  /// and unknown keys are errors. Callers should collapse both rejection
  /// shapes into one uniform "authentication failed" response.
  fn verify_message_signature(
    &self,
    key_store: &impl SharedKeyStore,
    policy: &CoveredHeaderPolicy,
    registry: &AlgorithmRegistry,
  ) -> Result<bool, Self::Error>;
}

impl<B> RequestMessageSignature for Request<B> {
  type Error = HyperSigError;

  fn has_message_signature(&self) -> bool {
    self
      .headers()
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|v| v.strip_prefix(SIGNATURE_SCHEME).is_some_and(|rest| rest.starts_with(' ')))
  }

  fn set_message_signature(
    &mut self,
    key_id: &str,
    key: &SharedKey,
    algorithm: &str,
    covered_headers: &[&str],
    registry: &AlgorithmRegistry,
  ) -> HyperSigResult<()> {
    let headers = collect_headers(self)?;
    let header_refs = as_str_pairs(&headers);
    let message = Message::try_new(self.method().as_str(), request_path(self), &header_refs, covered_headers)?;
    let mut signature = HttpSignature::try_new(key_id, algorithm, message, registry)?;
    signature.sign(key)?;
    let header_value = format!("{SIGNATURE_SCHEME} {}", signature.to_header_value()?);
    self.headers_mut().insert(header::AUTHORIZATION, header_value.parse()?);
    Ok(())
  }

  fn verify_message_signature(
    &self,
    key_store: &impl SharedKeyStore,
    policy: &CoveredHeaderPolicy,
    registry: &AlgorithmRegistry,
  ) -> HyperSigResult<bool> {
    let authorization = self
      .headers()
      .get(header::AUTHORIZATION)
      .ok_or(HyperSigError::NoSignatureHeader)?
      .to_str()?;
    let parameter = authorization
      .strip_prefix(SIGNATURE_SCHEME)
      .and_then(|rest| rest.strip_prefix(' '))
      .ok_or_else(|| HyperSigError::InvalidAuthorizationHeader("not of the Signature scheme".to_string()))?;

    let params = SignatureParams::try_parse(parameter, policy)?;
    let key = key_store
      .shared_key(&params.key_id)
      .ok_or_else(|| HyperSigError::UnknownKeyId(params.key_id.clone()))?;

    let headers = collect_headers(self)?;
    let header_refs = as_str_pairs(&headers);
    let message = Message::for_verification(self.method().as_str(), request_path(self), &header_refs, &params)?;
    let signature = HttpSignature::from_params(&params, message, registry)?;
    let valid = signature.verify(&key)?;
    if !valid {
      // internally distinguishable from a parse failure for diagnostics only
      debug!(key_id = %params.key_id, "message signature digest mismatch");
    }
    Ok(valid)
  }
}

/// Path including the query string, as the signing string expects it
fn request_path<B>(req: &Request<B>) -> &str {
  let uri = req.uri();
  uri.path_and_query().map_or_else(|| uri.path(), |pq| pq.as_str())
}

/// Header pairs in transport order, repeated names kept separate so the
/// message model can preserve multi-value order
fn collect_headers<B>(req: &Request<B>) -> HyperSigResult<Vec<(String, String)>> {
  let mut headers = Vec::with_capacity(req.headers().len());
  for (name, value) in req.headers() {
    headers.push((name.as_str().to_string(), value.to_str()?.to_string()));
  }
  Ok(headers)
}

fn as_str_pairs(headers: &[(String, String)]) -> Vec<(&str, &str)> {
  headers.iter().map(|(name, value)| (name.as_str(), value.as_str())).collect()
}

/* --------------------------------------- */
