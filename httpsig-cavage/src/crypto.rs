use crate::error::HttpSigResult;
use base64::{engine::general_purpose, Engine as _};

/* -------------------------------- */
#[derive(Clone)]
/// Shared secret key material for keyed digest computation.
/// The key carries no algorithm identity; the algorithm is resolved separately
/// through the registry and dispatched at sign/verify time.
pub struct SharedKey(Vec<u8>);

impl SharedKey {
  /// Create a new shared key from raw secret bytes
  pub fn new(secret: impl Into<Vec<u8>>) -> Self {
    Self(secret.into())
  }

  /// Create a new shared key from base64 encoded string
  pub fn from_base64(key: &str) -> HttpSigResult<Self> {
    let key = general_purpose::STANDARD.decode(key)?;
    Ok(Self(key))
  }

  /// Raw secret bytes
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

impl std::fmt::Debug for SharedKey {
  // secret material never appears in logs
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("SharedKey").field(&"<redacted>").finish()
  }
}

/* -------------------------------- */
/// Key store collaborator interface: maps an opaque keyId to the shared secret
/// used for digest computation. Key management and distribution are out of
/// scope; implementations are typically populated from configuration.
pub trait SharedKeyStore {
  /// Look up the shared key for the given keyId
  fn shared_key(&self, key_id: &str) -> Option<SharedKey>;
}

/// In-memory key store backed by a hash map, for configuration-driven setups and tests
#[derive(Default)]
pub struct InMemorySharedKeyStore {
  keys: rustc_hash::FxHashMap<String, SharedKey>,
}

impl InMemorySharedKeyStore {
  /// Insert a key under the given keyId, lowercased
  pub fn insert(&mut self, key_id: &str, key: SharedKey) {
    self.keys.insert(key_id.trim().to_ascii_lowercase(), key);
  }
}

impl SharedKeyStore for InMemorySharedKeyStore {
  fn shared_key(&self, key_id: &str) -> Option<SharedKey> {
    self.keys.get(&key_id.trim().to_ascii_lowercase()).cloned()
  }
}

/* -------------------------------- */
