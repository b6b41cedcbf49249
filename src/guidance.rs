//! User-facing guidance for failed requests.

use std::fmt;

use crate::http::{ErrorKind, RequestError};

/// What the user should do about a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    InvalidFile,
    Unauthorized,
    BadRequest,
    ServiceUnavailable,
    Network,
}

impl Guidance {
    /// Picks guidance from the server's explicit `code` field, falling back
    /// to the error kind and status code.
    pub fn for_error(error: &RequestError) -> Self {
        if let Some(guidance) = error
            .payload()
            .and_then(|payload| payload.str_field("code"))
            .and_then(Self::from_code)
        {
            return guidance;
        }

        match error.kind() {
            ErrorKind::Network => Guidance::Network,
            ErrorKind::Server => Guidance::ServiceUnavailable,
            ErrorKind::Client => match error.status_code() {
                401 | 403 => Guidance::Unauthorized,
                413 | 415 => Guidance::InvalidFile,
                _ => Guidance::BadRequest,
            },
        }
    }

    /// Maps a server-provided error code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "INVALID_FILE" | "UNSUPPORTED_FORMAT" | "FILE_TOO_LARGE" => Some(Guidance::InvalidFile),
            "UNAUTHORIZED" | "FORBIDDEN" => Some(Guidance::Unauthorized),
            "BAD_REQUEST" | "INVALID_INPUT" => Some(Guidance::BadRequest),
            "SERVICE_UNAVAILABLE" | "INTERNAL" => Some(Guidance::ServiceUnavailable),
            _ => None,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Guidance::InvalidFile => {
                "The document could not be read. Upload a PDF, image or text file within the size limit."
            }
            Guidance::Unauthorized => {
                "You are not signed in or not allowed to do this. Register with `myvakeel register` and try again."
            }
            Guidance::BadRequest => "The request was rejected. Check your input and try again.",
            Guidance::ServiceUnavailable => {
                "The analysis service is having trouble right now. Please try again in a few minutes."
            }
            Guidance::Network => {
                "Could not reach the analysis service. Check your connection and the --origin setting."
            }
        }
    }
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hint())
    }
}
