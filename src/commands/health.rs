use anyhow::Result;
use log::debug;

use crate::api::AnalysisApi;
use crate::runtime::Runtime;

use super::config::Config;
use super::print_payload;

/// Check that the analysis service is reachable
#[tracing::instrument(skip(config))]
pub async fn health<R: Runtime, A: AnalysisApi>(config: &Config<R, A>, json: bool) -> Result<()> {
    let payload = config.api.health_check().await?;
    debug!("Health check payload: {:?}", payload);

    if json {
        print_payload(&payload);
        return Ok(());
    }

    match payload.str_field("status") {
        Some(status) => println!("Service is up ({})", status),
        None => println!("Service is up"),
    }
    Ok(())
}
