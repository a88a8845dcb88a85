use crate::{
  algorithm::{AlgorithmHandle, AlgorithmRegistry},
  crypto::SharedKey,
  error::{HttpSigError, HttpSigResult},
  message::Message,
  signature_base::SignatureBase,
  signature_params::SignatureParams,
  trace::*,
};

/* ---------------------------------------- */
#[derive(Debug, Clone)]
/// Signature context: keyId, resolved algorithm, the message and, once signing
/// has happened (or a received value was attached), the base64 signature.
///
/// Constructed either from a local message about to be signed or from parsed
/// incoming wire fields; mutated exactly once, by `sign`.
pub struct HttpSignature {
  key_id: String,
  algorithm: AlgorithmHandle,
  message: Message,
  encoded_signature: Option<String>,
}

impl HttpSignature {
  /// Sign path construction: the algorithm is resolved against the registry
  /// here, so an unregistered name fails before any crypto is attempted.
  pub fn try_new(key_id: &str, algorithm: &str, message: Message, registry: &AlgorithmRegistry) -> HttpSigResult<Self> {
    let key_id = key_id.trim().to_ascii_lowercase();
    if key_id.is_empty() {
      return Err(HttpSigError::InvalidMessage("empty keyId".to_string()));
    }
    if message.signed_headers().is_empty() {
      return Err(HttpSigError::InvalidMessage("empty covered-header order".to_string()));
    }
    let algorithm = registry.resolve(algorithm)?;
    Ok(Self {
      key_id,
      algorithm,
      message,
      encoded_signature: None,
    })
  }

  /// Verify path construction: the received signature value is kept aside,
  /// untrusted until `verify` says otherwise.
  pub fn from_params(params: &SignatureParams, message: Message, registry: &AlgorithmRegistry) -> HttpSigResult<Self> {
    let mut signature = Self::try_new(&params.key_id, &params.algorithm, message, registry)?;
    signature.encoded_signature = Some(params.signature.clone());
    Ok(signature)
  }

  /// Opaque key identifier, normalized lowercase
  pub fn key_id(&self) -> &str {
    &self.key_id
  }

  /// Resolved algorithm handle
  pub fn algorithm(&self) -> &AlgorithmHandle {
    &self.algorithm
  }

  /// The message this signature covers
  pub fn message(&self) -> &Message {
    &self.message
  }

  /// Base64 signature value, absent until signing completes
  pub fn encoded_signature(&self) -> Option<&str> {
    self.encoded_signature.as_deref()
  }

  /// Canonical signing string for this context
  pub fn signature_base(&self) -> HttpSigResult<SignatureBase> {
    SignatureBase::try_new(&self.message)
  }

  /// Compute the digest over the signing string with the given shared key and
  /// attach it. Returns the base64 signature value.
  pub fn sign(&mut self, key: &SharedKey) -> HttpSigResult<&str> {
    let base = self.signature_base()?;
    let encoded = base.sign(&self.algorithm, key);
    debug!(key_id = %self.key_id, algorithm = %self.algorithm.name(), "signed message");
    Ok(self.encoded_signature.insert(encoded).as_str())
  }

  /// Recompute the signing string and digest and compare against the attached
  /// signature value in constant time. A mismatch is `Ok(false)`; an absent
  /// signature value is a usage error.
  pub fn verify(&self, key: &SharedKey) -> HttpSigResult<bool> {
    let received = self
      .encoded_signature
      .as_deref()
      .ok_or_else(|| HttpSigError::MissingSignatureField("signature".to_string()))?;
    let base = self.signature_base()?;
    let valid = base.verify(&self.algorithm, key, received)?;
    if !valid {
      debug!(key_id = %self.key_id, "digest mismatch");
    }
    Ok(valid)
  }

  /// Render the wire-format parameter value, always in
  /// `keyId, algorithm, headers, signature` order for interoperability.
  pub fn to_header_value(&self) -> HttpSigResult<String> {
    let encoded_signature = self.encoded_signature.as_deref().ok_or(HttpSigError::SignatureNotYetComputed)?;
    Ok(format!(
      "keyId=\"{}\",algorithm=\"{}\",headers=\"{}\",signature=\"{}\"",
      self.key_id,
      self.algorithm.name(),
      self.message.signed_headers().join(" "),
      encoded_signature
    ))
  }
}

/* ---------------------------------------- */
