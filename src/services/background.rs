use anyhow::{Context, Result};

use crate::models::{RuntimeRequest, TempInputResponse, UserSettings};
use crate::services::history::KEY_CHAT_HISTORY;
use crate::services::settings::{save_user_settings, KEY_USER_SETTINGS};
use crate::services::storage::{get_json, set_json, KeyValueStore};

pub const KEY_TEMP_USER_INPUT: &str = "tempUserInput";

/// Seed storage on install/update without overwriting existing values.
pub async fn initialize_storage(store: &dyn KeyValueStore) -> Result<()> {
    if store.get(KEY_CHAT_HISTORY).await?.is_none() {
        set_json(store, KEY_CHAT_HISTORY, "").await?;
    }
    if store.get(KEY_USER_SETTINGS).await?.is_none() {
        save_user_settings(store, &UserSettings::default()).await?;
    }
    log::info!("storage initialized");
    Ok(())
}

/// Remember text selected on a page so the side panel can pick it up.
pub async fn stash_selection(store: &dyn KeyValueStore, selection: &str) -> Result<()> {
    if selection.trim().is_empty() {
        return Ok(());
    }
    set_json(store, KEY_TEMP_USER_INPUT, selection)
        .await
        .context("failed to stash selection")
}

/// Read and clear the stashed selection. A second call returns empty text.
pub async fn take_temp_input(store: &dyn KeyValueStore) -> Result<TempInputResponse> {
    let text: Option<String> = get_json(store, KEY_TEMP_USER_INPUT).await?;
    if text.is_some() {
        store.remove(KEY_TEMP_USER_INPUT).await?;
    }
    Ok(TempInputResponse {
        text: text.unwrap_or_default(),
    })
}

/// Dispatch a runtime message given as JSON. Messages this module does not
/// handle produce `None` so other listeners can answer them.
pub async fn handle_runtime_message(store: &dyn KeyValueStore, message: &str) -> Result<Option<String>> {
    let request = match serde_json::from_str::<RuntimeRequest>(message) {
        Ok(request) => request,
        Err(_) => {
            log::debug!("ignoring runtime message: {}", message);
            return Ok(None);
        }
    };

    match request {
        RuntimeRequest::GetTempUserInput => {
            let response = take_temp_input(store).await?;
            Ok(Some(serde_json::to_string(&response)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn initialize_seeds_missing_keys_only() {
        let store = MemoryStore::default();
        block_on(async {
            set_json(&store, KEY_CHAT_HISTORY, "<p>kept</p>").await.unwrap();
            initialize_storage(&store).await.unwrap();

            let history: Option<String> = get_json(&store, KEY_CHAT_HISTORY).await.unwrap();
            assert_eq!(history.as_deref(), Some("<p>kept</p>"));
            let settings: Option<UserSettings> = get_json(&store, KEY_USER_SETTINGS).await.unwrap();
            assert_eq!(settings, Some(UserSettings { dark_mode: false }));
        });
    }

    #[test]
    fn initialize_on_empty_store() {
        let store = MemoryStore::default();
        block_on(initialize_storage(&store)).unwrap();
        assert_eq!(block_on(store.get(KEY_CHAT_HISTORY)).unwrap(), Some(json!("")));
        assert_eq!(block_on(store.get(KEY_USER_SETTINGS)).unwrap(), Some(json!({ "darkMode": false })));
    }

    #[test]
    fn temp_input_is_delivered_at_most_once() {
        let store = MemoryStore::default();
        block_on(async {
            stash_selection(&store, "selected words").await.unwrap();

            let first = handle_runtime_message(&store, r#"{"action":"getTempUserInput"}"#)
                .await
                .unwrap();
            assert_eq!(first.as_deref(), Some(r#"{"text":"selected words"}"#));
            assert!(!store.contains(KEY_TEMP_USER_INPUT));

            let second = take_temp_input(&store).await.unwrap();
            assert_eq!(second.text, "");
        });
    }

    #[test]
    fn existing_object_settings_survive_install() {
        let store = MemoryStore::default();
        block_on(async {
            store.set(KEY_USER_SETTINGS, json!({ "darkMode": true })).await.unwrap();
            initialize_storage(&store).await.unwrap();
            assert_eq!(store.get(KEY_USER_SETTINGS).await.unwrap(), Some(json!({ "darkMode": true })));
        });
    }

    #[test]
    fn blank_selection_is_not_stashed() {
        let store = MemoryStore::default();
        block_on(stash_selection(&store, "   ")).unwrap();
        assert!(!store.contains(KEY_TEMP_USER_INPUT));
    }

    #[test]
    fn unknown_messages_get_no_response() {
        let store = MemoryStore::default();
        block_on(async {
            assert_eq!(handle_runtime_message(&store, r#"{"action":"ping"}"#).await.unwrap(), None);
            assert_eq!(handle_runtime_message(&store, "not json").await.unwrap(), None);
        });
    }
}
