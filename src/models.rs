use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemma-3-12b-it";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant embedded in a Chrome extension. \
Format your responses with markdown when appropriate for better readability. \
Keep your responses concise and focused.";

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Error,
}

impl Role {
    /// CSS class of the message bubble in the transcript markup.
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user-message",
            Role::Assistant => "ai-message",
            Role::Error => "ai-message error",
        }
    }
}

/// A message as it exists between send/receive and rendering. Only its
/// markup is persisted.
#[derive(Clone, PartialEq, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Role::Error, text)
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default)]
    pub dark_mode: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase", default)] // older stored configs may lack fields
pub struct ApiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

// API DTOs
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    /// System instruction followed by the single user turn.
    pub fn new(config: &ApiConfig, text: &str) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![
                Message {
                    role: "system".into(),
                    content: config.system_prompt.clone(),
                },
                Message {
                    role: "user".into(),
                    content: text.to_string(),
                },
            ],
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub message: Option<String>,
}

/// Messages exchanged over the extension runtime between the side panel
/// and the background handler.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "action")]
pub enum RuntimeRequest {
    #[serde(rename = "getTempUserInput")]
    GetTempUserInput,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TempInputResponse {
    #[serde(default)]
    pub text: String,
}
