use anyhow::{Result, bail};
use log::{debug, info};

use crate::api::AnalysisApi;
use crate::runtime::Runtime;
use crate::state::UserIdentity;

use super::config::Config;
use super::print_payload;

/// Register a user with the service and remember the identity locally
#[tracing::instrument(skip(config))]
pub async fn register<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    name: &str,
    email: &str,
    json: bool,
) -> Result<()> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
        bail!("Both a name and an email are required to register.");
    }

    let user = UserIdentity {
        name: name.to_string(),
        email: email.to_string(),
    };

    let payload = config.api.register_user(&user).await?;
    debug!("Register payload: {:?}", payload);

    let storage = config.storage();
    let mut state = config.load_state()?;
    state.set_user(&storage, user)?;
    info!("Stored identity in {}", storage.path().display());

    if json {
        print_payload(&payload);
    } else {
        println!("Registered as {} <{}>", name, email);
    }
    Ok(())
}

/// Show the stored identity and language
#[tracing::instrument(skip(config))]
pub fn whoami<R: Runtime, A: AnalysisApi>(config: &Config<R, A>) -> Result<()> {
    let state = config.load_state()?;
    match state.user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not registered. Run `myvakeel register` first."),
    }
    println!("Language: {}", state.language());
    Ok(())
}

/// Forget the stored identity
#[tracing::instrument(skip(config))]
pub fn logout<R: Runtime, A: AnalysisApi>(config: &Config<R, A>, yes: bool) -> Result<()> {
    let storage = config.storage();
    let mut state = config.load_state()?;

    let Some(user) = state.user().cloned() else {
        println!("No stored identity.");
        return Ok(());
    };

    if !yes
        && !config
            .runtime
            .confirm(&format!("Forget identity {} <{}>?", user.name, user.email))?
    {
        println!("Logout cancelled.");
        return Ok(());
    }

    state.clear_user(&storage)?;
    println!("Forgot identity {}", user.email);
    Ok(())
}

/// Sign in to the admin area
#[tracing::instrument(skip(config, password))]
pub async fn admin_login<R: Runtime, A: AnalysisApi>(
    config: &Config<R, A>,
    username: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let payload = config.api.admin_login(username, password).await?;

    if json {
        print_payload(&payload);
        return Ok(());
    }

    match payload.str_field("message") {
        Some(message) => println!("{}", message),
        None => println!("Signed in as {}", username),
    }
    Ok(())
}
