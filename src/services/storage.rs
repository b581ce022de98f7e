use anyhow::{anyhow, Context, Result};
use futures_util::future::{self, FutureExt, LocalBoxFuture};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use crate::utils::has_global_path;

/// Asynchronous key-value store holding structured values. A string is
/// stored as a plain string and an object as an object, so the layout is
/// the one the extension's JS side reads and writes. Use [`get_json`] /
/// [`set_json`] for typed access.
pub trait KeyValueStore {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Option<Value>>>;
    fn set<'a>(&'a self, key: &'a str, value: Value) -> LocalBoxFuture<'a, Result<()>>;
    fn remove<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<()>>;
}

pub async fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .with_context(|| format!("stored value for '{}' is not valid", key)),
        None => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value).with_context(|| format!("failed to serialize '{}'", key))?;
    store.set(key, value).await
}

/// Best store available in the current context: extension storage, then
/// the page's localStorage, then an in-memory map.
pub fn open_store() -> Rc<dyn KeyValueStore> {
    if ChromeStorage::is_available() {
        log::debug!("using chrome.storage.local");
        return Rc::new(ChromeStorage);
    }
    if let Some(storage) = LocalStorage::open() {
        log::debug!("chrome.storage unavailable, using window.localStorage");
        return Rc::new(storage);
    }
    log::warn!("no persistent storage available, chat history will not survive a reload");
    Rc::new(MemoryStore::default())
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = get, catch)]
    fn chrome_storage_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = set, catch)]
    fn chrome_storage_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(js_namespace = ["chrome", "storage", "local"], js_name = remove, catch)]
    fn chrome_storage_remove(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

fn js_error(context: &str, err: JsValue) -> anyhow::Error {
    anyhow!("{}: {:?}", context, err)
}

/// `chrome.storage.local`, shared between the side panel and the
/// background worker.
pub struct ChromeStorage;

impl ChromeStorage {
    pub fn is_available() -> bool {
        has_global_path(&["chrome", "storage", "local"])
    }
}

impl KeyValueStore for ChromeStorage {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Option<Value>>> {
        chrome_get(key).boxed_local()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> LocalBoxFuture<'a, Result<()>> {
        chrome_set(key, value).boxed_local()
    }

    fn remove<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        chrome_remove(key).boxed_local()
    }
}

async fn chrome_get(key: &str) -> Result<Option<Value>> {
    let promise = chrome_storage_get(&JsValue::from_str(key)).map_err(|e| js_error("storage.get", e))?;
    let items = JsFuture::from(promise).await.map_err(|e| js_error("storage.get", e))?;
    let value = js_sys::Reflect::get(&items, &JsValue::from_str(key)).map_err(|e| js_error("storage.get", e))?;
    if value.is_undefined() {
        return Ok(None);
    }
    let json: String = js_sys::JSON::stringify(&value)
        .map_err(|e| js_error("storage.get", e))?
        .into();
    serde_json::from_str(&json)
        .map(Some)
        .with_context(|| format!("chrome.storage value for '{}' is not JSON-compatible", key))
}

async fn chrome_set(key: &str, value: Value) -> Result<()> {
    let js_value = js_sys::JSON::parse(&value.to_string()).map_err(|e| js_error("storage.set", e))?;
    let items = js_sys::Object::new();
    js_sys::Reflect::set(&items, &JsValue::from_str(key), &js_value).map_err(|e| js_error("storage.set", e))?;
    let promise = chrome_storage_set(&items).map_err(|e| js_error("storage.set", e))?;
    JsFuture::from(promise).await.map_err(|e| js_error("storage.set", e))?;
    Ok(())
}

async fn chrome_remove(key: &str) -> Result<()> {
    let promise = chrome_storage_remove(&JsValue::from_str(key)).map_err(|e| js_error("storage.remove", e))?;
    JsFuture::from(promise).await.map_err(|e| js_error("storage.remove", e))?;
    Ok(())
}

/// localStorage only holds strings. Strings are kept raw so a stored
/// markup fragment stays readable; everything else is JSON text.
fn encode_local(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn decode_local(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

/// `window.localStorage`, for running the panel as a plain web page.
pub struct LocalStorage(web_sys::Storage);

impl LocalStorage {
    pub fn open() -> Option<Self> {
        let storage = window()?.local_storage().ok()??;
        Some(Self(storage))
    }
}

impl KeyValueStore for LocalStorage {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Option<Value>>> {
        let item = self
            .0
            .get_item(key)
            .map(|raw| raw.map(decode_local))
            .map_err(|e| js_error("localStorage.getItem", e));
        future::ready(item).boxed_local()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> LocalBoxFuture<'a, Result<()>> {
        let result = self
            .0
            .set_item(key, &encode_local(&value))
            .map_err(|e| js_error("localStorage.setItem", e));
        future::ready(result).boxed_local()
    }

    fn remove<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        future::ready(self.0.remove_item(key).map_err(|e| js_error("localStorage.removeItem", e))).boxed_local()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<Option<Value>>> {
        future::ready(Ok(self.entries.borrow().get(key).cloned())).boxed_local()
    }

    fn set<'a>(&'a self, key: &'a str, value: Value) -> LocalBoxFuture<'a, Result<()>> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        future::ready(Ok(())).boxed_local()
    }

    fn remove<'a>(&'a self, key: &'a str) -> LocalBoxFuture<'a, Result<()>> {
        self.entries.borrow_mut().remove(key);
        future::ready(Ok(())).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserSettings;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn settings_are_stored_as_a_flat_object() {
        let store = MemoryStore::default();
        block_on(async {
            set_json(&store, "userSettings", &UserSettings { dark_mode: true }).await.unwrap();
            let loaded: Option<UserSettings> = get_json(&store, "userSettings").await.unwrap();
            assert_eq!(loaded, Some(UserSettings { dark_mode: true }));
        });
        assert_eq!(
            block_on(store.get("userSettings")).unwrap(),
            Some(json!({ "darkMode": true }))
        );
    }

    #[test]
    fn strings_are_stored_unquoted() {
        let store = MemoryStore::default();
        block_on(set_json(&store, "chatHistory", "<p>x</p>")).unwrap();
        assert_eq!(
            block_on(store.get("chatHistory")).unwrap(),
            Some(Value::String("<p>x</p>".into()))
        );
    }

    #[test]
    fn missing_key_is_none() {
        let store = MemoryStore::default();
        let loaded: Option<UserSettings> = block_on(get_json(&store, "nope")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn wrongly_shaped_value_reports_key() {
        let store = MemoryStore::default();
        block_on(store.set("userSettings", json!("dark"))).unwrap();
        let err = block_on(get_json::<UserSettings>(&store, "userSettings")).unwrap_err();
        assert!(err.to_string().contains("userSettings"));
    }

    #[test]
    fn remove_deletes_entry() {
        let store = MemoryStore::default();
        block_on(store.set("k", json!("v"))).unwrap();
        assert!(store.contains("k"));
        block_on(store.remove("k")).unwrap();
        assert!(!store.contains("k"));
    }

    #[test]
    fn local_storage_keeps_markup_raw() {
        let markup = "<div class=\"message-group\">old</div>";
        assert_eq!(encode_local(&json!(markup)), markup);
        assert_eq!(decode_local(markup.to_string()), json!(markup));
        assert_eq!(decode_local(String::new()), json!(""));
    }

    #[test]
    fn local_storage_objects_are_json_text() {
        let settings = json!({ "darkMode": false });
        let raw = encode_local(&settings);
        assert_eq!(raw, r#"{"darkMode":false}"#);
        assert_eq!(decode_local(raw), settings);
    }
}
