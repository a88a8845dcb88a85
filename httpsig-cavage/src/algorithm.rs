use crate::error::{HttpSigError, HttpSigResult};
use hmac::{Hmac, Mac};
use std::sync::Arc;

type HmacSha256 = Hmac<sha2::Sha256>;

/// Canonical name of the built-in hmac-sha256 algorithm
pub const HMAC_SHA256: &str = "hmac-sha256";

/// Keyed digest function type registered under a canonical algorithm name.
/// Given a secret byte string and a message, it produces the raw digest bytes.
pub type KeyedDigestFn = dyn Fn(&[u8], &[u8]) -> Vec<u8> + Send + Sync + 'static;

/* ---------------------------------------- */
#[derive(Clone)]
/// Resolved handle to a registered algorithm, cheap to clone and share
pub struct AlgorithmHandle {
  name: String,
  digest: Arc<KeyedDigestFn>,
}

impl AlgorithmHandle {
  /// Canonical lowercase algorithm name
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Compute the keyed digest over the given message
  pub fn compute(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
    (self.digest)(key, message)
  }
}

impl std::fmt::Debug for AlgorithmHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AlgorithmHandle").field("name", &self.name).finish()
  }
}

impl PartialEq for AlgorithmHandle {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}
impl Eq for AlgorithmHandle {}

/* ---------------------------------------- */
/// Registry mapping canonical algorithm names to keyed digest functions.
///
/// Registration happens at process start through `&mut self`; once the registry
/// is shared, only `resolve` is available and concurrent reads are safe.
pub struct AlgorithmRegistry {
  algorithms: rustc_hash::FxHashMap<String, Arc<KeyedDigestFn>>,
}

impl AlgorithmRegistry {
  /// Create an empty registry without any built-in entry
  pub fn new() -> Self {
    Self {
      algorithms: rustc_hash::FxHashMap::default(),
    }
  }

  /// Register a keyed digest function under the given name, lowercased.
  /// Re-registration replaces the previous entry (last write wins); replacing
  /// the built-in `hmac-sha256` with different behavior is a configuration
  /// error the registry cannot detect.
  pub fn register<F>(&mut self, name: &str, digest: F)
  where
    F: Fn(&[u8], &[u8]) -> Vec<u8> + Send + Sync + 'static,
  {
    self.algorithms.insert(name.trim().to_ascii_lowercase(), Arc::new(digest));
  }

  /// Resolve a handle by canonical name
  pub fn resolve(&self, name: &str) -> HttpSigResult<AlgorithmHandle> {
    let name = name.trim().to_ascii_lowercase();
    let digest = self
      .algorithms
      .get(&name)
      .ok_or_else(|| HttpSigError::UnknownAlgorithm(name.clone()))?;
    Ok(AlgorithmHandle {
      name,
      digest: digest.clone(),
    })
  }
}

impl Default for AlgorithmRegistry {
  /// Registry with the built-in `hmac-sha256` entry
  fn default() -> Self {
    let mut registry = Self::new();
    registry.register(HMAC_SHA256, |key, message| {
      let mut mac = HmacSha256::new_from_slice(key).unwrap();
      mac.update(message);
      mac.finalize().into_bytes().to_vec()
    });
    registry
  }
}

/* ---------------------------------------- */
