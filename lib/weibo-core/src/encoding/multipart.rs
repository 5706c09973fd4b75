use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};

use super::{ParamValue, RequestParameter};

const BOUNDARY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const BOUNDARY_LENGTH: usize = 10;

/// Generates a 10 character `[a-z0-9]` multipart boundary.
pub fn generate_boundary<R>(rng: &mut R) -> String
where
    R: RngCore + ?Sized,
{
    (0..BOUNDARY_LENGTH)
        .filter_map(|_| BOUNDARY_ALPHABET.choose(rng))
        .map(|&byte| char::from(byte))
        .collect()
}

/// A serialized `multipart/form-data` payload.
///
/// Fields are written sorted by name (ordinal order), text and binary parameters
/// interleaved by that sort. Empty text fields are skipped. Binary fields are sent
/// as `upload{n}` file parts, where `n` is a random 64-bit integer drawn per field.
///
/// # Examples
///
/// ```rust
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use weibo_core::RequestParameter;
/// use weibo_core::encoding::MultipartBody;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let body = MultipartBody::build(
///     &[
///         RequestParameter::text("status", "hello"),
///         RequestParameter::binary("pic", vec![0xFF, 0xD8]),
///     ],
///     &mut rng,
/// );
///
/// assert_eq!(body.boundary().len(), 10);
/// assert!(body.content_type().starts_with("multipart/form-data; boundary="));
/// ```
#[derive(Clone, derive_more::Debug)]
pub struct MultipartBody {
    boundary: String,
    #[debug(ignore)]
    data: Vec<u8>,
}

impl MultipartBody {
    /// Serializes the parameters with a freshly generated boundary.
    pub fn build<R>(parameters: &[RequestParameter], rng: &mut R) -> Self
    where
        R: RngCore + ?Sized,
    {
        let boundary = generate_boundary(rng);
        Self::with_boundary(boundary, parameters, rng)
    }

    /// Serializes the parameters with the given boundary.
    ///
    /// The random source is still used for the file-part names.
    pub fn with_boundary<R>(
        boundary: impl Into<String>,
        parameters: &[RequestParameter],
        rng: &mut R,
    ) -> Self
    where
        R: RngCore + ?Sized,
    {
        let boundary = boundary.into();

        let mut sorted = parameters.iter().collect::<Vec<_>>();
        sorted.sort_by(|left, right| left.cmp_by_name(right));

        let part_header = format!("\r\n--{boundary}\r\n");
        let mut data = Vec::new();

        for param in sorted {
            match param.value() {
                ParamValue::Text(value) => {
                    if value.is_empty() {
                        continue;
                    }
                    data.extend_from_slice(part_header.as_bytes());
                    data.extend_from_slice(
                        format!(
                            "content-disposition: form-data; name=\"{}\"\r\n\r\n{value}",
                            param.name()
                        )
                        .as_bytes(),
                    );
                }
                ParamValue::Binary(bytes) => {
                    let suffix: i64 = rng.random();
                    data.extend_from_slice(part_header.as_bytes());
                    data.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"upload{suffix}\"\r\n\
                             Content-Type: \"image/unknow\"\r\n\
                             Content-Transfer-Encoding: binary\r\n\r\n",
                            param.name()
                        )
                        .as_bytes(),
                    );
                    data.extend_from_slice(bytes);
                }
            }
        }

        data.extend_from_slice(format!("\r\n--{boundary}--").as_bytes());

        Self { boundary, data }
    }

    /// Returns the boundary separating the parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Returns the `Content-Type` header value for this body.
    pub fn content_type(&self) -> String {
        format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, self.boundary)
    }

    /// Returns the serialized payload.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the body and returns the serialized payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
