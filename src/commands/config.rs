use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;

use crate::{
    api::{AnalysisApi, DEFAULT_ORIGIN, VakeelApi, resolve_base_url},
    http::HttpClient,
    retry::RetryPolicy,
    runtime::Runtime,
    speech::{NoopSpeech, SpeechService},
    state::AppState,
    storage::LocalStorage,
};

use super::paths::default_state_dir;

/// Settings collected from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    pub origin: Option<String>,
    pub home: Option<PathBuf>,
    pub max_attempts: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl ConfigOptions {
    pub fn retry_policy(&self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy::new(
            self.max_attempts.unwrap_or(defaults.max_attempts()),
            self.retry_delay_ms.unwrap_or(defaults.base_delay_ms()),
        )
    }
}

pub struct Config<R: Runtime, A: AnalysisApi> {
    pub runtime: R,
    pub api: A,
    pub speech: Box<dyn SpeechService>,
    pub state_dir: PathBuf,
}

impl<R: Runtime> Config<R, VakeelApi> {
    pub fn new(runtime: R, options: ConfigOptions) -> Result<Self> {
        let origin = options.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
        let base_url = resolve_base_url(origin)?;
        let policy = options.retry_policy();
        let state_dir = default_state_dir(&runtime, options.home.clone())?;

        debug!(
            "Using API {} with {} attempts, {}ms base delay, state in {}",
            base_url,
            policy.max_attempts(),
            policy.base_delay_ms(),
            state_dir.display()
        );

        let client = Client::builder()
            .user_agent(concat!("myvakeel-cli/", env!("MYVAKEEL_VERSION")))
            .build()?;

        let api = VakeelApi::new(HttpClient::new(client, base_url, policy));

        Ok(Self {
            runtime,
            api,
            speech: Box::new(NoopSpeech),
            state_dir,
        })
    }
}

impl<R: Runtime, A: AnalysisApi> Config<R, A> {
    pub fn storage(&self) -> LocalStorage<'_, R> {
        LocalStorage::new(&self.runtime, self.state_dir.clone())
    }

    pub fn load_state(&self) -> Result<AppState> {
        AppState::load(&self.storage())
    }
}
