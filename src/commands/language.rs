use anyhow::Result;

use crate::api::AnalysisApi;
use crate::runtime::Runtime;

use super::config::Config;

/// Show the language preference, or set it when a code is given
#[tracing::instrument(skip(config))]
pub fn language<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    code: Option<&str>,
) -> Result<()> {
    let mut state = config.load_state()?;

    match code {
        Some(code) => {
            state.set_language(&config.storage(), code)?;
            println!("Language set to {}", state.language());
        }
        None => println!("{}", state.language()),
    }
    Ok(())
}
