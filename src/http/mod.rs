//! HTTP client module with retry logic and error handling.

mod client;
mod error;
mod request;
mod response;

pub use client::HttpClient;
pub use error::{ErrorKind, RequestError};
pub use request::{FormPart, FormPayload, RequestBody, RequestOptions, default_headers, merge_headers};
pub use response::Payload;
