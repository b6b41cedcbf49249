//! Application state owned by the command layer.

use anyhow::{Result, bail};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::api::Caller;
use crate::runtime::Runtime;
use crate::speech::SpeechService;
use crate::storage::{LANGUAGE_KEY, LocalStorage, USER_KEY};

/// Language used until the user picks one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// The registered user this client acts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

/// Session state: current user, language preference and playback flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    user: Option<UserIdentity>,
    language: String,
    speaking: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            language: DEFAULT_LANGUAGE.to_string(),
            speaking: false,
        }
    }
}

impl AppState {
    /// Restores state from storage. An unreadable user record is ignored.
    #[tracing::instrument(skip(storage))]
    pub fn load<R: Runtime>(storage: &LocalStorage<R>) -> Result<Self> {
        let user = match storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<UserIdentity>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable user record: {}", e);
                    None
                }
            },
            None => None,
        };

        let language = storage
            .get(LANGUAGE_KEY)?
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        debug!(
            "Loaded state: user={:?} language={}",
            user.as_ref().map(|u| &u.email),
            language
        );

        Ok(Self {
            user,
            language,
            speaking: false,
        })
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Request context for API calls made on behalf of this session.
    pub fn caller(&self) -> Caller {
        Caller {
            email: self.user.as_ref().map(|u| u.email.clone()),
            language: self.language.clone(),
        }
    }

    pub fn set_user<R: Runtime>(
        &mut self,
        storage: &LocalStorage<R>,
        user: UserIdentity,
    ) -> Result<()> {
        storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
        self.user = Some(user);
        Ok(())
    }

    /// Forgets the current user. Returns whether one was stored.
    pub fn clear_user<R: Runtime>(&mut self, storage: &LocalStorage<R>) -> Result<bool> {
        let removed = storage.remove(USER_KEY)?;
        self.user = None;
        Ok(removed)
    }

    /// Stores a language code such as `en` or `pt-br`.
    pub fn set_language<R: Runtime>(
        &mut self,
        storage: &LocalStorage<R>,
        language: &str,
    ) -> Result<()> {
        let language = normalize_language(language)?;
        storage.set(LANGUAGE_KEY, &language)?;
        self.language = language;
        Ok(())
    }

    /// Starts or stops reading `text` aloud. Returns the new playback flag.
    pub fn toggle_speaking(&mut self, speech: &dyn SpeechService, text: &str) -> Result<bool> {
        if self.speaking {
            speech.stop()?;
            self.speaking = false;
        } else if speech.is_supported() {
            speech.speak(text, &self.language)?;
            self.speaking = true;
        } else {
            warn!("Speech is not supported on this platform");
        }
        Ok(self.speaking)
    }
}

fn normalize_language(language: &str) -> Result<String> {
    let language = language.trim().to_ascii_lowercase();
    if language.is_empty()
        || !language
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        bail!("Invalid language code '{}'", language);
    }
    Ok(language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use crate::speech::{MockSpeechService, NoopSpeech};
    use mockall::predicate::eq;
    use tempfile::tempdir;

    fn user() -> UserIdentity {
        UserIdentity {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);

        let storage = LocalStorage::new(&runtime, "/state");
        let state = AppState::load(&storage).unwrap();

        assert_eq!(state, AppState::default());
        assert_eq!(state.language(), "en");
        assert!(state.caller().email.is_none());
    }

    #[test]
    fn test_load_ignores_corrupt_user_record() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime.expect_read_to_string().returning(|_| {
            Ok(r#"{"myvakeel_user": "not json", "myvakeel_language": "hi"}"#.to_string())
        });

        let storage = LocalStorage::new(&runtime, "/state");
        let state = AppState::load(&storage).unwrap();

        assert!(state.user().is_none());
        assert_eq!(state.language(), "hi");
    }

    #[test]
    fn test_load_survives_truncated_storage_file() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("local_storage.json"),
            r#"{"myvakeel_language": "h"#,
        )
        .unwrap();

        let storage = LocalStorage::new(&runtime, dir.path());
        let state = AppState::load(&storage).unwrap();

        assert_eq!(state, AppState::default());
    }

    #[test]
    fn test_clear_user_keeps_user_when_storage_fails() {
        // --- Setup ---
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{"myvakeel_user": "{}"}"#.to_string()));
        runtime.expect_create_dir_all().returning(|_| Ok(()));
        runtime
            .expect_write()
            .returning(|_, _| Err(anyhow::anyhow!("read-only file system")));

        let storage = LocalStorage::new(&runtime, "/state");
        let mut state = AppState::default();
        state.user = Some(user());

        // --- Execute ---
        let result = state.clear_user(&storage);

        // --- Verify ---
        assert!(result.is_err());
        assert_eq!(state.user(), Some(&user()));
    }

    #[test]
    fn test_state_persists_across_loads() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(&runtime, dir.path());

        let mut state = AppState::load(&storage).unwrap();
        state.set_user(&storage, user()).unwrap();
        state.set_language(&storage, " HI ").unwrap();

        let reloaded = AppState::load(&storage).unwrap();
        assert_eq!(reloaded.user(), Some(&user()));
        assert_eq!(reloaded.language(), "hi");
        assert_eq!(
            reloaded.caller(),
            Caller {
                email: Some("asha@example.com".to_string()),
                language: "hi".to_string(),
            }
        );

        let mut reloaded = reloaded;
        assert!(reloaded.clear_user(&storage).unwrap());
        assert!(AppState::load(&storage).unwrap().user().is_none());
    }

    #[test]
    fn test_set_language_rejects_invalid_codes() {
        let runtime = MockRuntime::new();
        let storage = LocalStorage::new(&runtime, "/state");
        let mut state = AppState::default();

        assert!(state.set_language(&storage, "").is_err());
        assert!(state.set_language(&storage, "en us").is_err());
        assert_eq!(state.language(), "en");
    }

    #[test]
    fn test_toggle_speaking_with_supported_service() {
        let mut speech = MockSpeechService::new();
        speech.expect_is_supported().returning(|| true);
        speech
            .expect_speak()
            .with(eq("Your policy excludes floods."), eq("en"))
            .times(1)
            .returning(|_, _| Ok(()));
        speech.expect_stop().times(1).returning(|| Ok(()));

        let mut state = AppState::default();
        assert!(state.toggle_speaking(&speech, "Your policy excludes floods.").unwrap());
        assert!(state.is_speaking());
        assert!(!state.toggle_speaking(&speech, "ignored").unwrap());
        assert!(!state.is_speaking());
    }

    #[test]
    fn test_toggle_speaking_without_support_stays_off() {
        let mut state = AppState::default();
        assert!(!state.toggle_speaking(&NoopSpeech, "hello").unwrap());
        assert!(!state.is_speaking());
    }
}
