//! User interaction operations (stdin input, confirmation prompts).

use anyhow::{Context, Result};

use super::RealRuntime;

use std::io::{self, BufRead, Read, Write};

/// Testable core of [`RealRuntime::confirm_impl`].
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Reads an entire input stream as text.
pub(crate) fn read_all_with_io<R: Read>(input: &mut R) -> Result<String> {
    let mut text = String::new();
    input
        .read_to_string(&mut text)
        .context("Failed to read text from standard input")?;
    Ok(text)
}

impl RealRuntime {
    pub(crate) fn read_stdin_impl(&self) -> Result<String> {
        let stdin = io::stdin();
        let mut stdin_lock = stdin.lock();
        read_all_with_io(&mut stdin_lock)
    }

    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, &mut stdin_lock, &mut stdout)
    }
}
