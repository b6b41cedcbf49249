use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::path::Path;

use crate::api::{AnalysisApi, FileUpload};
use crate::http::Payload;
use crate::report::AnalysisReport;
use crate::runtime::Runtime;

use super::config::Config;
use super::print_payload;

/// Upload a document and show its analysis
#[tracing::instrument(skip(config))]
pub async fn analyze_file<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    path: &Path,
    json: bool,
) -> Result<()> {
    let state = config.load_state()?;
    if state.user().is_none() {
        warn!("No registered identity; the server may reject the upload");
    }

    let upload = FileUpload::from_path(&config.runtime, path)?;
    info!(
        "Uploading {} ({}, {} bytes)...",
        upload.file_name,
        upload.mime,
        upload.bytes.len()
    );

    let payload = config.api.analyze_file(&upload, &state.caller()).await?;
    show_analysis(&payload, json);
    Ok(())
}

/// Analyze pasted text, read from standard input when not given
#[tracing::instrument(skip(config, text))]
pub async fn analyze_text<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    text: Option<String>,
    json: bool,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            debug!("Reading document text from standard input");
            config.runtime.read_stdin()?
        }
    };

    let text = text.trim();
    if text.is_empty() {
        bail!("No text to analyze.");
    }

    let state = config.load_state()?;
    let payload = config.api.analyze_text(text, &state.caller()).await?;
    show_analysis(&payload, json);
    Ok(())
}

fn show_analysis(payload: &Payload, json: bool) {
    if json {
        print_payload(payload);
        return;
    }

    match AnalysisReport::from_payload(payload) {
        Some(report) if !report.is_empty() => println!("{}", report.render()),
        _ => {
            debug!("Payload has no recognizable report, printing as-is");
            print_payload(payload);
        }
    }
}
