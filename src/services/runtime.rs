use anyhow::{anyhow, Context, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::models::{RuntimeRequest, TempInputResponse};
use crate::services::background::take_temp_input;
use crate::services::storage::KeyValueStore;
use crate::utils::has_global_path;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["chrome", "runtime"], js_name = sendMessage, catch)]
    fn chrome_runtime_send_message(message: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

/// Ask the background worker for text stashed from the context menu.
///
/// Outside the extension there is no worker to ask, so the stash is read
/// from `store` directly. Either way the text is handed out at most once.
pub async fn request_temp_input(store: &dyn KeyValueStore) -> Result<TempInputResponse> {
    if !has_global_path(&["chrome", "runtime", "sendMessage"]) {
        log::debug!("chrome.runtime unavailable, reading tempUserInput from storage");
        return take_temp_input(store).await;
    }

    let request = serde_json::to_string(&RuntimeRequest::GetTempUserInput)?;
    let message = js_sys::JSON::parse(&request).map_err(|e| anyhow!("runtime.sendMessage: {:?}", e))?;
    let promise = chrome_runtime_send_message(&message).map_err(|e| anyhow!("runtime.sendMessage: {:?}", e))?;
    let response = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow!("runtime.sendMessage rejected: {:?}", e))?;

    if response.is_undefined() || response.is_null() {
        return Ok(TempInputResponse::default());
    }
    let json: String = js_sys::JSON::stringify(&response)
        .map_err(|e| anyhow!("runtime response: {:?}", e))?
        .into();
    parse_temp_input_response(&json)
}

pub fn parse_temp_input_response(json: &str) -> Result<TempInputResponse> {
    serde_json::from_str(json).context("malformed getTempUserInput response")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::background::{handle_runtime_message, stash_selection};
    use crate::services::storage::MemoryStore;
    use futures::executor::block_on;

    #[test]
    fn response_text_is_read() {
        let response = parse_temp_input_response(r#"{"text":"selected words"}"#).unwrap();
        assert_eq!(response.text, "selected words");
    }

    #[test]
    fn response_without_text_is_empty() {
        assert_eq!(parse_temp_input_response("{}").unwrap(), TempInputResponse::default());
    }

    #[test]
    fn garbage_response_is_an_error() {
        assert!(parse_temp_input_response("[1,2]").is_err());
    }

    #[test]
    fn answers_match_what_the_worker_sends() {
        let store = MemoryStore::default();
        block_on(async {
            stash_selection(&store, "from the page").await.unwrap();
            let request = serde_json::to_string(&RuntimeRequest::GetTempUserInput).unwrap();
            let answer = handle_runtime_message(&store, &request).await.unwrap().unwrap();
            assert_eq!(parse_temp_input_response(&answer).unwrap().text, "from the page");
        });
    }
}
