//! Entry points for the extension's background worker. The JS shim
//! registers the context menu and runtime listeners and forwards events
//! here.

use wasm_bindgen::prelude::*;

use crate::services::background;
use crate::services::storage::open_store;

fn to_js(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}

#[wasm_bindgen]
pub async fn on_installed() -> Result<(), JsValue> {
    let store = open_store();
    background::initialize_storage(store.as_ref()).await.map_err(to_js)
}

#[wasm_bindgen]
pub async fn on_context_selection(text: String) -> Result<(), JsValue> {
    let store = open_store();
    background::stash_selection(store.as_ref(), &text).await.map_err(to_js)
}

/// Resolves to the response object, or `undefined` for messages this
/// worker does not answer.
#[wasm_bindgen]
pub async fn on_runtime_message(message: JsValue) -> Result<JsValue, JsValue> {
    let json = String::from(js_sys::JSON::stringify(&message)?);
    let store = open_store();
    match background::handle_runtime_message(store.as_ref(), &json).await.map_err(to_js)? {
        Some(response) => js_sys::JSON::parse(&response),
        None => Ok(JsValue::UNDEFINED),
    }
}
