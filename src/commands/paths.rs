use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::runtime::Runtime;

/// Directory name under the platform config directory.
const STATE_DIR_NAME: &str = "myvakeel";

/// Get the directory holding persisted client state
#[tracing::instrument(skip(runtime))]
pub fn default_state_dir<R: Runtime>(runtime: &R, home: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match home {
        Some(path) => path,
        None => runtime
            .config_dir()
            .context("Could not find a configuration directory; set MYVAKEEL_HOME")?
            .join(STATE_DIR_NAME),
    };

    info!("Using state directory: {}", dir.display());
    Ok(dir)
}
