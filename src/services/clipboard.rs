use anyhow::{anyhow, Result};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// `navigator.clipboard.writeText(text)`.
pub async fn write_text(text: &str) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
    let navigator = Reflect::get(&window, &JsValue::from_str("navigator")).map_err(|e| anyhow!("{:?}", e))?;
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard")).map_err(|e| anyhow!("{:?}", e))?;
    if clipboard.is_undefined() {
        return Err(anyhow!("clipboard API unavailable"));
    }

    let write: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(|e| anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|_| anyhow!("clipboard.writeText is not a function"))?;
    let promise = write
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(|e| anyhow!("{:?}", e))?;

    JsFuture::from(Promise::from(promise))
        .await
        .map_err(|e| anyhow!("clipboard write rejected: {:?}", e))?;
    Ok(())
}
