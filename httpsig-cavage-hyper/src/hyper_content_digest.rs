use super::{ContentDigestType, DIGEST_HEADER};
use crate::error::{HyperDigestError, HyperDigestResult};
use base64::{engine::general_purpose, Engine as _};
use bytes::{Buf, Bytes};
use http::Request;
use http_body::Body;
use http_body_util::{BodyExt, Full};
use sha2::Digest;
use std::future::Future;

// RFC 3230 instance digest over the request body, the `digest` header the
// default covered-header policy expects

/* --------------------------------------- */
pub trait ContentDigest: http_body::Body {
  /// Returns the bytes object of the body
  fn into_bytes(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send
  where
    Self: Sized + Send,
    Self::Data: Send,
  {
    async {
      let mut body_buf = self.collect().await?.aggregate();
      Ok(body_buf.copy_to_bytes(body_buf.remaining()))
    }
  }

  /// Returns the body bytes along with their digest in base64
  fn into_bytes_with_digest(
    self,
    cd_type: &ContentDigestType,
  ) -> impl Future<Output = Result<(Bytes, String), Self::Error>> + Send
  where
    Self: Sized + Send,
    Self::Data: Send,
  {
    async move {
      let body_bytes = self.into_bytes().await?;
      let digest = derive_digest(&body_bytes, cd_type);
      Ok((body_bytes, general_purpose::STANDARD.encode(digest)))
    }
  }
}

/// Returns the digest of the given body in Vec<u8>
fn derive_digest(body_bytes: &Bytes, cd_type: &ContentDigestType) -> Vec<u8> {
  match cd_type {
    ContentDigestType::Sha256 => {
      let mut hasher = sha2::Sha256::new();
      hasher.update(body_bytes);
      hasher.finalize().to_vec()
    }

    ContentDigestType::Sha512 => {
      let mut hasher = sha2::Sha512::new();
      hasher.update(body_bytes);
      hasher.finalize().to_vec()
    }
  }
}

impl<T: ?Sized> ContentDigest for T where T: http_body::Body {}

/* --------------------------------------- */
/// A trait to set and verify the `digest` header of a request,
/// `Digest: SHA-256=<base64>` per RFC 3230
pub trait RequestContentDigest {
  type Error;
  fn set_content_digest(
    self,
    cd_type: &ContentDigestType,
  ) -> impl Future<Output = Result<Request<Full<Bytes>>, Self::Error>> + Send
  where
    Self: Sized;
  fn verify_content_digest(self) -> impl Future<Output = Result<bool, Self::Error>> + Send
  where
    Self: Sized;
}

impl<B> RequestContentDigest for Request<B>
where
  B: Body + Send,
  <B as Body>::Data: Send,
{
  type Error = HyperDigestError;

  async fn set_content_digest(self, cd_type: &ContentDigestType) -> HyperDigestResult<Request<Full<Bytes>>>
  where
    Self: Sized,
  {
    let (mut parts, body) = self.into_parts();
    let (body_bytes, digest) = body
      .into_bytes_with_digest(cd_type)
      .await
      .map_err(|_e| HyperDigestError::HttpBodyError("failed to generate digest".to_string()))?;
    let new_body = Full::new(body_bytes);

    parts.headers.insert(DIGEST_HEADER, format!("{cd_type}={digest}").parse()?);

    Ok(Request::from_parts(parts, new_body))
  }

  async fn verify_content_digest(self) -> HyperDigestResult<bool>
  where
    Self: Sized,
  {
    let (cd_type, expected) = extract_content_digest(self.headers())?;
    let (_, body) = self.into_parts();
    let body_bytes = body
      .into_bytes()
      .await
      .map_err(|_e| HyperDigestError::HttpBodyError("failed to read body".to_string()))?;
    Ok(derive_digest(&body_bytes, &cd_type) == expected)
  }
}

fn extract_content_digest(header_map: &http::HeaderMap) -> HyperDigestResult<(ContentDigestType, Vec<u8>)> {
  let digest_header = header_map
    .get(DIGEST_HEADER)
    .ok_or(HyperDigestError::NoDigestHeader)?
    .to_str()?;
  // the base64 value may itself contain '=', so only the first one splits
  let Some((cd_type, digest)) = digest_header.split_once('=') else {
    return Err(HyperDigestError::InvalidDigestHeader(digest_header.to_string()));
  };
  let cd_type = cd_type.parse::<ContentDigestType>()?;
  let digest = general_purpose::STANDARD
    .decode(digest)
    .map_err(|e| HyperDigestError::InvalidDigestHeader(e.to_string()))?;
  Ok((cd_type, digest))
}

/* --------------------------------------- */
