use httpsig_cavage::prelude::HttpSigError;
use thiserror::Error;

/// Result type for http signature
pub type HyperSigResult<T> = std::result::Result<T, HyperSigError>;

/// Error type for http signature for hyper
#[derive(Error, Debug)]
pub enum HyperSigError {
  /// No authorization header with the Signature scheme found
  #[error("No signature authorization header found")]
  NoSignatureHeader,

  /// Authorization header present but not of the Signature scheme, or unreadable
  #[error("Invalid authorization header: {0}")]
  InvalidAuthorizationHeader(String),

  /// Failed to stringify a header value
  #[error("Failed to stringify header value: {0}")]
  FailedToStrHeaderValue(#[from] http::header::ToStrError),

  /// Failed to build a header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

  /// The key store has no entry for the received keyId
  #[error("Unknown keyId: {0}")]
  UnknownKeyId(String),

  /// Inherited from HttpSigError
  #[error("HttpSigError: {0}")]
  HttpSigError(#[from] HttpSigError),
}

/// Result type for the digest header
pub type HyperDigestResult<T> = std::result::Result<T, HyperDigestError>;

/// Error type for the digest header for hyper
#[derive(Error, Debug)]
pub enum HyperDigestError {
  /// Http body error
  #[error("Http body error: {0}")]
  HttpBodyError(String),

  /// No digest header found
  #[error("No digest header found")]
  NoDigestHeader,

  /// Failed to stringify the digest header
  #[error("Failed to stringify digest header: {0}")]
  FailedToStrDigestHeader(#[from] http::header::ToStrError),

  /// Malformed digest header value
  #[error("Invalid digest header: {0}")]
  InvalidDigestHeader(String),

  /// Unsupported digest algorithm token
  #[error("Invalid content digest type: {0}")]
  InvalidContentDigestType(String),

  /// Failed to build a header value
  #[error("Failed to parse header value: {0}")]
  InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
}
