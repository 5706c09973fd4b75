//! Request encoding: query strings, form bodies and multipart payloads.
//!
//! Everything here is pure: no I/O, and randomness comes from the caller.

mod multipart;
mod param;
mod query;

pub use self::multipart::{MultipartBody, generate_boundary};
pub use self::param::{ParamValue, RequestParameter};
pub(crate) use self::query::append_query;
pub use self::query::{build_query_string, encode_component, parameters_query_string};
