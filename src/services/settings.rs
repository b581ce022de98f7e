use anyhow::{Context, Result};

use crate::models::{ApiConfig, UserSettings};
use crate::services::storage::{get_json, set_json, KeyValueStore};

pub const KEY_USER_SETTINGS: &str = "userSettings";
pub const KEY_API_CONFIG: &str = "apiConfig";

pub async fn load_user_settings(store: &dyn KeyValueStore) -> Result<UserSettings> {
    Ok(get_json(store, KEY_USER_SETTINGS)
        .await
        .context("failed to load settings")?
        .unwrap_or_default())
}

pub async fn save_user_settings(store: &dyn KeyValueStore, settings: &UserSettings) -> Result<()> {
    set_json(store, KEY_USER_SETTINGS, settings)
        .await
        .context("failed to save settings")
}

/// Flip dark mode, persist, and return the new settings.
pub async fn toggle_dark_mode(store: &dyn KeyValueStore, current: &UserSettings) -> Result<UserSettings> {
    let next = UserSettings {
        dark_mode: !current.dark_mode,
    };
    save_user_settings(store, &next).await?;
    Ok(next)
}

pub async fn load_api_config(store: &dyn KeyValueStore) -> Result<ApiConfig> {
    Ok(get_json(store, KEY_API_CONFIG)
        .await
        .context("failed to load API configuration")?
        .unwrap_or_default())
}

pub async fn save_api_config(store: &dyn KeyValueStore, config: &ApiConfig) -> Result<()> {
    set_json(store, KEY_API_CONFIG, config)
        .await
        .context("failed to save API configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn defaults_when_nothing_stored() {
        let store = MemoryStore::default();
        block_on(async {
            assert_eq!(load_user_settings(&store).await.unwrap(), UserSettings::default());
            assert_eq!(load_api_config(&store).await.unwrap(), ApiConfig::default());
        });
    }

    #[test]
    fn toggle_persists_flag() {
        let store = MemoryStore::default();
        block_on(async {
            let on = toggle_dark_mode(&store, &UserSettings::default()).await.unwrap();
            assert!(on.dark_mode);
            assert_eq!(load_user_settings(&store).await.unwrap(), on);

            let off = toggle_dark_mode(&store, &on).await.unwrap();
            assert!(!off.dark_mode);
            assert_eq!(load_user_settings(&store).await.unwrap(), off);
        });
    }

    #[test]
    fn api_config_round_trips() {
        let store = MemoryStore::default();
        let config = ApiConfig {
            api_key: "sk-or-123".into(),
            model: "meta-llama/llama-3-8b-instruct".into(),
            ..ApiConfig::default()
        };
        block_on(async {
            save_api_config(&store, &config).await.unwrap();
            assert_eq!(load_api_config(&store).await.unwrap(), config);
        });
    }
}
