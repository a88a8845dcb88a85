use thiserror::Error;

/// Result type for http signature
pub type HttpSigResult<T> = std::result::Result<T, HttpSigError>;

/// Error type for http signature
#[derive(Error, Debug)]
pub enum HttpSigError {
  /// Signature parameter string is empty, malformed, or missing quote delimiters
  #[error("Invalid signature string: {0}")]
  InvalidSignatureString(String),

  /// A field name outside of keyId, algorithm, headers and signature
  #[error("Invalid signature field: {0}")]
  InvalidSignatureField(String),

  /// One of the four required fields is absent
  #[error("Missing signature field: {0}")]
  MissingSignatureField(String),

  /// A required header is not covered, or a covered header is absent from the message
  #[error("Missing covered header: {0}")]
  MissingCoveredHeader(String),

  /// The algorithm field names an algorithm not present in the registry
  #[error("Unknown algorithm: {0}")]
  UnknownAlgorithm(String),

  /// Malformed message model input (empty method, path or keyId, inconsistent header order)
  #[error("Invalid message: {0}")]
  InvalidMessage(String),

  /// Wire rendering was requested before the signature was computed
  #[error("Signature not yet computed")]
  SignatureNotYetComputed,

  /// Received signature value is not valid base64
  #[error("Base64 decode error: {0}")]
  Base64DecodeError(#[from] base64::DecodeError),
}
