use chrono::{DateTime, TimeZone};
use regex::Regex;
use std::sync::OnceLock;
use wasm_bindgen::JsValue;

pub fn set_panic_hook() {
    // Panics show up in the devtools console instead of as "unreachable".
    console_error_panic_hook::set_once();
}

/// Whether `globalThis.a.b.c` resolves to something other than
/// `undefined`/`null`.
pub fn has_global_path(path: &[&str]) -> bool {
    path.iter()
        .try_fold(JsValue::from(js_sys::global()), |obj, name| {
            js_sys::Reflect::get(&obj, &JsValue::from_str(name))
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        })
        .is_some()
}

pub fn init_logging() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));
}

/// Escape HTML special characters, including both quote kinds so the
/// result is safe inside attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#039;")
}

fn url_pattern() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"))
}

/// Wrap bare `http(s)://` URLs in new-tab anchors. The surrounding text is
/// left untouched.
pub fn linkify_urls(text: &str) -> String {
    url_pattern()
        .replace_all(text, r#"<a href="$0" target="_blank" rel="noopener noreferrer">$0</a>"#)
        .into_owned()
}

/// `HH:MM`, the timestamp shown under each chat message.
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M").to_string()
}
