//! Command implementations behind the CLI subcommands.

use std::fmt::Write;

use crate::guidance::Guidance;
use crate::http::{Payload, RequestError};

mod account;
mod analyze;
mod chat;
pub mod config;
mod health;
mod language;
mod paths;

pub use account::{admin_login, logout, register, whoami};
pub use analyze::{analyze_file, analyze_text};
pub use chat::chat;
pub use config::{Config, ConfigOptions};
pub use health::health;
pub use language::language;

pub(crate) fn print_payload(payload: &Payload) {
    println!("{}", payload);
}

/// Formats a command failure for the terminal, adding guidance for request errors.
pub fn describe_error(error: &anyhow::Error) -> String {
    let mut out = format!("Error: {:#}", error);

    if let Some(request_error) = error.downcast_ref::<RequestError>() {
        let guidance = Guidance::for_error(request_error);
        let _ = write!(out, "\n{}", guidance);
    }

    out
}
