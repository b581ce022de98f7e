use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::{
    chat_area::ChatArea,
    header::Header,
    input_bar::{can_send, InputBar},
    settings::SettingsModal,
    toasts::{notify, ToastStack, Toasts},
};
use crate::models::{ApiConfig, ChatMessage, UserSettings};
use crate::services::{
    clipboard,
    history::{clear_transcript, load_transcript, reply_message, save_transcript, Transcript},
    llm::LlmService,
    pipeline::{BrowserTimer, ChatPipeline, RequestContext},
    runtime::request_temp_input,
    settings::{load_api_config, load_user_settings, save_api_config, toggle_dark_mode},
    storage::{open_store, KeyValueStore},
};

const SHARE_URL: &str = "https://chrome.google.com/webstore/detail/ai-assistant/your-extension-id";

const GLOBAL_STYLES: &str = r#"
    :root {
        --bg-app: #ffffff;
        --bg-user: #e8f1fd;
        --bg-assistant: #f4f4f4;
        --border-color: #e5e5e5;
        --text-primary: #333;
        --text-secondary: #666;
        --accent-color: #4f6ef7;
        --accent-hover: #3b57d6;
        --danger-color: #ef4444;
    }
    .dark-mode {
        --bg-app: #1e1e1e;
        --bg-user: #2b3a55;
        --bg-assistant: #2a2a2a;
        --border-color: #3a3a3a;
        --text-primary: #e6e6e6;
        --text-secondary: #a0a0a0;
    }

    * { box-sizing: border-box; }
    body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; }

    .side-panel { display: flex; flex-direction: column; height: 100vh; position: relative; background: var(--bg-app); color: var(--text-primary); }
    .header { padding: 8px 12px; border-bottom: 1px solid var(--border-color); display: flex; justify-content: space-between; align-items: center; height: 48px; }
    .header h2 { font-size: 1rem; margin: 0; font-weight: 600; }
    .header-actions { display: flex; gap: 4px; }

    .btn { cursor: pointer; border: 1px solid var(--border-color); background: var(--bg-app); padding: 6px 12px; border-radius: 6px; font-size: 0.9rem; color: var(--text-primary); }
    .btn:disabled { opacity: 0.5; cursor: default; }
    .btn-primary { background: var(--accent-color); color: white; border-color: transparent; }
    .btn-primary:hover:enabled { background: var(--accent-hover); }
    .btn-icon { cursor: pointer; border: none; background: transparent; font-size: 1.1rem; padding: 5px; color: var(--text-secondary); border-radius: 4px; }
    .btn-icon:hover { background: rgba(127,127,127,0.15); color: var(--text-primary); }

    .chat-area { flex-grow: 1; overflow-y: auto; padding: 12px; }
    .welcome-message { text-align: center; padding: 24px 8px; color: var(--text-secondary); }
    .welcome-message h2 { color: var(--text-primary); font-size: 1.2rem; }
    .suggestion-chips { display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; }
    .suggestion-chip { cursor: pointer; border: 1px solid var(--border-color); background: var(--bg-assistant); color: var(--text-primary); border-radius: 16px; padding: 6px 12px; font-size: 0.85rem; }

    .message-group { margin-bottom: 12px; display: flex; flex-direction: column; }
    .user-message, .ai-message { padding: 8px 12px; border-radius: 10px; max-width: 90%; line-height: 1.5; white-space: pre-wrap; word-wrap: break-word; }
    .user-message { align-self: flex-end; background: var(--bg-user); }
    .ai-message { align-self: flex-start; background: var(--bg-assistant); white-space: normal; }
    .ai-message.error { color: var(--danger-color); }
    .ai-message pre { position: relative; background: #2d2d2d; color: #fff; padding: 12px; border-radius: 6px; overflow-x: auto; }
    .ai-message code { font-family: monospace; font-size: 0.9em; }
    .copy-code-button { position: absolute; top: 4px; right: 4px; font-size: 0.7rem; cursor: pointer; }
    .message-time { font-size: 0.7rem; color: var(--text-secondary); margin-top: 4px; }
    .message-action-button { font-size: 0.7rem; cursor: pointer; border: none; background: transparent; color: var(--text-secondary); padding: 0; }

    .typing-indicator { display: flex; gap: 4px; padding: 8px 12px; }
    .typing-indicator span { width: 6px; height: 6px; border-radius: 50%; background: var(--text-secondary); animation: blink 1.4s infinite both; }
    .typing-indicator span:nth-child(2) { animation-delay: 0.2s; }
    .typing-indicator span:nth-child(3) { animation-delay: 0.4s; }
    @keyframes blink { 0%, 80%, 100% { opacity: 0.2; } 40% { opacity: 1; } }

    .input-bar { border-top: 1px solid var(--border-color); padding: 8px 12px; }
    .chat-input { width: 100%; resize: none; min-height: 40px; max-height: 160px; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; font: inherit; background: var(--bg-app); color: var(--text-primary); }
    .input-footer { display: flex; justify-content: space-between; align-items: center; margin-top: 6px; }
    .char-counter { font-size: 0.75rem; color: var(--text-secondary); }
    .char-counter.warning { color: var(--danger-color); }

    .toast-stack { position: absolute; bottom: 90px; left: 0; right: 0; display: flex; flex-direction: column; align-items: center; gap: 6px; pointer-events: none; }
    .toast { padding: 8px 14px; border-radius: 6px; font-size: 0.85rem; color: white; background: #333; }
    .toast.error { background: var(--danger-color); }
"#;

type Pipeline = ChatPipeline<LlmService, BrowserTimer>;

/// The rendered conversation. `revision` counts local edits so loading a
/// stored transcript does not write it straight back. Nothing may be sent
/// until `loaded`, otherwise the first save would replace stored history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub transcript: Transcript,
    pub revision: u32,
    pub loaded: bool,
}

pub enum ChatAction {
    Loaded(Transcript),
    Push(ChatMessage),
    Clear,
}

impl Reducible for ChatState {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ChatAction::Loaded(transcript) => {
                if next.revision == 0 {
                    next.transcript = transcript;
                }
                next.loaded = true;
            }
            ChatAction::Push(message) => {
                next.transcript.push(&message);
                next.revision += 1;
            }
            ChatAction::Clear => {
                next.transcript = Transcript::default();
                next.revision += 1;
            }
        }
        Rc::new(next)
    }
}

impl ChatState {
    pub fn accepts_send(loaded: bool, busy: bool, text: &str) -> bool {
        loaded && can_send(text, busy)
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[function_component(App)]
pub fn app() -> Html {
    let store: Rc<dyn KeyValueStore> = (*use_memo((), |_| open_store())).clone();

    let settings = use_state(UserSettings::default);
    let api_config = use_state(ApiConfig::default);
    let chat = use_reducer(ChatState::default);
    let toasts = use_reducer(Toasts::default);
    let input = use_state(String::new);
    let busy = use_state(|| false);
    let show_settings = use_state(|| false);
    let request_ctx = use_mut_ref(RequestContext::default);

    let pipeline: Rc<Pipeline> = use_memo((*api_config).clone(), |config| {
        ChatPipeline::new(LlmService::new(config), BrowserTimer, config.clone())
    });

    // --- EFFECTS ---

    // Restore state and pick up text selected via the context menu.
    {
        let store = store.clone();
        let settings = settings.clone();
        let api_config = api_config.clone();
        let chat = chat.dispatcher();
        let input = input.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match load_user_settings(&*store).await {
                    Ok(s) => settings.set(s),
                    Err(err) => log::error!("{:#}", err),
                }
                match load_api_config(&*store).await {
                    Ok(c) => api_config.set(c),
                    Err(err) => log::error!("{:#}", err),
                }
                match load_transcript(&*store).await {
                    Ok(t) => chat.dispatch(ChatAction::Loaded(t)),
                    Err(err) => {
                        log::error!("{:#}", err);
                        chat.dispatch(ChatAction::Loaded(Transcript::default()));
                    }
                }
                match request_temp_input(&*store).await {
                    Ok(resp) if !resp.text.is_empty() => input.set(resp.text),
                    Ok(_) => {}
                    Err(err) => log::error!("{:#}", err),
                }
            });
        });
    }

    {
        let store = store.clone();
        let transcript = chat.transcript.clone();
        use_effect_with(chat.revision, move |revision| {
            if *revision > 0 {
                spawn_local(async move {
                    let result = if transcript.is_empty() {
                        clear_transcript(&*store).await
                    } else {
                        save_transcript(&*store, &transcript).await
                    };
                    if let Err(err) = result {
                        log::error!("{:#}", err);
                    }
                });
            }
        });
    }

    // --- ACTIONS ---

    let on_send = {
        let loaded = chat.loaded;
        let chat = chat.dispatcher();
        let input = input.clone();
        let busy = busy.clone();
        let pipeline = pipeline.clone();
        let request_ctx = request_ctx.clone();
        Callback::from(move |text: String| {
            let text = text.trim().to_string();
            if !ChatState::accepts_send(loaded, *busy, &text) {
                return;
            }

            chat.dispatch(ChatAction::Push(ChatMessage::user(text.clone())));
            input.set(String::new());
            busy.set(true);

            let chat = chat.clone();
            let busy = busy.clone();
            let pipeline = pipeline.clone();
            let request_ctx = request_ctx.clone();
            spawn_local(async move {
                let mut ctx = *request_ctx.borrow();
                let outcome = pipeline.send_message(&mut ctx, &text).await;
                *request_ctx.borrow_mut() = ctx;

                chat.dispatch(ChatAction::Push(reply_message(outcome)));
                busy.set(false);
            });
        })
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |value: String| input.set(value))
    };

    let on_toggle_theme = {
        let store = store.clone();
        let settings = settings.clone();
        let toasts = toasts.dispatcher();
        Callback::from(move |_: ()| {
            let store = store.clone();
            let settings = settings.clone();
            let toasts = toasts.clone();
            spawn_local(async move {
                match toggle_dark_mode(&*store, &*settings).await {
                    Ok(next) => settings.set(next),
                    Err(err) => {
                        log::error!("{:#}", err);
                        notify(&toasts, "Failed to save settings", true);
                    }
                }
            });
        })
    };

    let on_clear = {
        let chat = chat.dispatcher();
        let toasts = toasts.dispatcher();
        Callback::from(move |_: ()| {
            if confirm("Are you sure you want to clear the chat history?") {
                chat.dispatch(ChatAction::Clear);
                notify(&toasts, "Chat history cleared", false);
            }
        })
    };

    let on_share = {
        let toasts = toasts.dispatcher();
        Callback::from(move |_: ()| {
            let toasts = toasts.clone();
            spawn_local(async move {
                match clipboard::write_text(SHARE_URL).await {
                    Ok(()) => notify(&toasts, "Extension link copied to clipboard!", false),
                    Err(err) => {
                        log::error!("Could not copy link: {:#}", err);
                        notify(&toasts, "Failed to copy link", true);
                    }
                }
            });
        })
    };

    let on_copy = {
        let toasts = toasts.dispatcher();
        Callback::from(move |text: String| {
            let toasts = toasts.clone();
            spawn_local(async move {
                match clipboard::write_text(&text).await {
                    Ok(()) => notify(&toasts, "Copied to clipboard!", false),
                    Err(err) => {
                        log::error!("Could not copy text: {:#}", err);
                        notify(&toasts, "Failed to copy text", true);
                    }
                }
            });
        })
    };

    let toggle_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_: ()| show_settings.set(!*show_settings))
    };

    let close_settings = {
        let show_settings = show_settings.clone();
        Callback::from(move |_: ()| show_settings.set(false))
    };

    let persist_config = {
        let store = store.clone();
        let api_config = api_config.clone();
        let toasts = toasts.dispatcher();
        Callback::from(move |(config, notice): (ApiConfig, &'static str)| {
            api_config.set(config.clone());
            let store = store.clone();
            let toasts = toasts.clone();
            spawn_local(async move {
                match save_api_config(&*store, &config).await {
                    Ok(()) => notify(&toasts, notice, false),
                    Err(err) => {
                        log::error!("{:#}", err);
                        notify(&toasts, "Failed to save settings", true);
                    }
                }
            });
        })
    };

    let on_settings_save = {
        let persist_config = persist_config.clone();
        let show_settings = show_settings.clone();
        Callback::from(move |config: ApiConfig| {
            persist_config.emit((config, "Settings saved"));
            show_settings.set(false);
        })
    };

    let on_reset_settings = Callback::from(move |_: ()| {
        if confirm("Reset all settings to default?") {
            persist_config.emit((ApiConfig::default(), "Settings reset"));
        }
    });

    html! {
        <>
            <style>{ GLOBAL_STYLES }</style>
            <div class={classes!("side-panel", settings.dark_mode.then_some("dark-mode"))}>
                <Header
                    dark_mode={settings.dark_mode}
                    on_toggle_theme={on_toggle_theme}
                    on_clear={on_clear}
                    on_share={on_share}
                    on_settings={toggle_settings}
                />

                if *show_settings {
                    <SettingsModal
                        config={(*api_config).clone()}
                        on_save={on_settings_save}
                        on_close={close_settings}
                        on_reset={on_reset_settings}
                    />
                }

                <ChatArea
                    transcript={AttrValue::from(chat.transcript.as_html().to_string())}
                    busy={*busy}
                    loaded={chat.loaded}
                    on_suggestion={on_send.clone()}
                    on_copy={on_copy}
                />

                <InputBar
                    value={(*input).clone()}
                    busy={*busy || !chat.loaded}
                    on_input={on_input}
                    on_send={on_send}
                />

                <ToastStack toasts={toasts.items.clone()} />
            </div>
        </>
    }
}
