use anyhow::{Result, bail};
use log::debug;

use crate::api::AnalysisApi;
use crate::report::chat_reply;
use crate::runtime::Runtime;

use super::config::Config;
use super::print_payload;

/// Ask the assistant a question about legal terms
#[tracing::instrument(skip(config))]
pub async fn chat<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    query: &str,
    speak: bool,
    json: bool,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("Ask a question, e.g. `myvakeel chat \"What is an indemnity clause?\"`");
    }

    let mut state = config.load_state()?;
    let payload = config.api.chat(query, &state.caller()).await?;

    if json {
        print_payload(&payload);
        return Ok(());
    }

    let Some(reply) = chat_reply(&payload) else {
        debug!("Chat payload has no reply field");
        print_payload(&payload);
        return Ok(());
    };

    println!("{}", reply);

    if speak && !state.toggle_speaking(config.speech.as_ref(), &reply)? {
        println!("(Speech playback is not available on this system.)");
    }
    Ok(())
}
