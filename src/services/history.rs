use anyhow::{Context, Result};

use crate::errors::RequestError;
use crate::markdown::{self, RenderOptions};
use crate::models::{ChatMessage, Role};
use crate::services::storage::{get_json, set_json, KeyValueStore};
use crate::utils::{escape_html, format_clock, linkify_urls};

pub const KEY_CHAT_HISTORY: &str = "chatHistory";

/// Shown in place of the raw error; the error itself only goes to the log.
pub const GENERIC_ERROR_TEXT: &str =
    "Sorry, I encountered an error processing your request. Please try again later.";

/// The rendered chat. Messages are appended as markup and the whole blob
/// is persisted; there is no way back to structured messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    markup: String,
}

impl Transcript {
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn push(&mut self, message: &ChatMessage) {
        self.markup.push_str(&message_markup(message));
    }

    pub fn as_html(&self) -> &str {
        &self.markup
    }

    pub fn is_empty(&self) -> bool {
        self.markup.trim().is_empty()
    }
}

/// Transcript entry for the outcome of a send. A failure is logged and
/// shown only as [`GENERIC_ERROR_TEXT`].
pub fn reply_message(outcome: Result<String, RequestError>) -> ChatMessage {
    match outcome {
        Ok(reply) => ChatMessage::assistant(reply),
        Err(err) => {
            log::error!("Error in AI response: {}", err);
            ChatMessage::error(GENERIC_ERROR_TEXT)
        }
    }
}

fn message_markup(message: &ChatMessage) -> String {
    let body = match message.role {
        Role::User => linkify_urls(&message.text),
        Role::Assistant => markdown::render_with(&message.text, &RenderOptions { copy_buttons: true }),
        Role::Error => message.text.clone(),
    };

    let actions = match message.role {
        Role::User | Role::Assistant => format!(
            r#"<div class="message-actions"><button class="message-action-button copy-button" title="Copy to clipboard" data-copy="{}">Copy</button></div>"#,
            escape_html(&message.text)
        ),
        Role::Error => String::new(),
    };

    format!(
        r#"<div class="message-group"><div class="{}">{}<div class="message-time">{}</div>{}</div></div>"#,
        message.role.css_class(),
        body,
        format_clock(&message.timestamp),
        actions
    )
}

pub async fn load_transcript(store: &dyn KeyValueStore) -> Result<Transcript> {
    let markup: Option<String> = get_json(store, KEY_CHAT_HISTORY)
        .await
        .context("failed to load chat history")?;
    Ok(markup
        .filter(|m| !m.trim().is_empty())
        .map(Transcript::from_markup)
        .unwrap_or_default())
}

/// Replace the stored blob with the full transcript.
pub async fn save_transcript(store: &dyn KeyValueStore, transcript: &Transcript) -> Result<()> {
    set_json(store, KEY_CHAT_HISTORY, transcript.as_html())
        .await
        .context("failed to save chat history")
}

pub async fn clear_transcript(store: &dyn KeyValueStore) -> Result<()> {
    store
        .remove(KEY_CHAT_HISTORY)
        .await
        .context("failed to clear chat history")
}
