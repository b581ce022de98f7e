use std::time::Duration;

use gloo_timers::callback::Timeout;
use web_sys::{Element, HtmlElement};
use yew::prelude::*;

pub const SUGGESTIONS: [&str; 4] = ["Who are you?", "Help me with code", "Write a poem", "How does AI work?"];

const COPIED_LABEL_DURATION: Duration = Duration::from_millis(2000);

#[derive(Properties, PartialEq)]
pub struct ChatAreaProps {
    pub transcript: AttrValue,
    pub busy: bool,
    /// Stored history has arrived; until then the welcome chips stay hidden.
    pub loaded: bool,
    pub on_suggestion: Callback<String>,
    pub on_copy: Callback<String>,
}

/// Text a click inside the transcript should copy, if it hit a copy button.
fn copy_target(target: &Element) -> Option<(Element, String, bool)> {
    if let Ok(Some(button)) = target.closest(".copy-code-button") {
        let code = button
            .parent_element()
            .and_then(|pre| pre.query_selector("code").ok().flatten())
            .and_then(|code| code.text_content())?;
        return Some((button, code, true));
    }
    if let Ok(Some(button)) = target.closest(".copy-button") {
        let text = button.get_attribute("data-copy")?;
        return Some((button, text, false));
    }
    None
}

fn flash_copied(button: Element) {
    button.set_text_content(Some("Copied!"));
    Timeout::new(COPIED_LABEL_DURATION.as_millis() as u32, move || {
        button.set_text_content(Some("Copy"));
    })
    .forget();
}

#[function_component(ChatArea)]
pub fn chat_area(props: &ChatAreaProps) -> Html {
    let scroll_ref = use_node_ref();

    // Keep the newest message in view.
    {
        let div_ref = scroll_ref.clone();
        use_effect_with((props.transcript.clone(), props.busy), move |_| {
            if let Some(div) = div_ref.cast::<HtmlElement>() {
                div.set_scroll_top(div.scroll_height());
            }
        });
    }

    // The transcript is raw markup, so its buttons are handled here.
    let on_click = {
        let on_copy = props.on_copy.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(target) = e.target_dyn_into::<Element>() else {
                return;
            };
            if let Some((button, text, is_code)) = copy_target(&target) {
                on_copy.emit(text);
                if is_code {
                    flash_copied(button);
                }
            }
        })
    };

    let welcome = html! {
        <div class="welcome-message">
            <h2>{ "Welcome to AI Assistant" }</h2>
            <p>{ "I'm here to help answer your questions, provide information, assist with tasks, or just chat. What would you like to talk about today?" }</p>
            <div class="suggestion-chips">
                { for SUGGESTIONS.iter().map(|s| {
                    let on_suggestion = props.on_suggestion.clone();
                    let text = s.to_string();
                    html! {
                        <button class="suggestion-chip" onclick={Callback::from(move |_| on_suggestion.emit(text.clone()))}>
                            { *s }
                        </button>
                    }
                }) }
            </div>
        </div>
    };

    html! {
        <div class="chat-area" ref={scroll_ref} onclick={on_click}>
            if !props.loaded {
                <div class="transcript"></div>
            } else if props.transcript.trim().is_empty() && !props.busy {
                { welcome }
            } else {
                <div class="transcript">
                    { Html::from_html_unchecked(props.transcript.clone()) }
                </div>
            }
            if props.busy {
                <div class="typing-indicator">
                    <span></span><span></span><span></span>
                </div>
            }
        </div>
    }
}
