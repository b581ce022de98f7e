use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

pub const MAX_INPUT_CHARS: usize = 2000;
pub const COUNTER_WARN_THRESHOLD: usize = 1800;

pub fn counter_label(text: &str) -> String {
    format!("{}/{}", text.chars().count(), MAX_INPUT_CHARS)
}

pub fn counter_is_warning(text: &str) -> bool {
    text.chars().count() > COUNTER_WARN_THRESHOLD
}

pub fn can_send(text: &str, busy: bool) -> bool {
    !busy && !text.trim().is_empty()
}

#[derive(Properties, PartialEq)]
pub struct InputBarProps {
    pub value: String,
    pub busy: bool,
    pub on_input: Callback<String>,
    pub on_send: Callback<String>,
}

#[function_component(InputBar)]
pub fn input_bar(props: &InputBarProps) -> Html {
    let textarea_ref = use_node_ref();

    // Give focus back once a reply has landed.
    {
        let textarea_ref = textarea_ref.clone();
        use_effect_with(props.busy, move |busy| {
            if !*busy {
                if let Some(textarea) = textarea_ref.cast::<HtmlTextAreaElement>() {
                    let _ = textarea.focus();
                }
            }
        });
    }

    let on_input = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            let textarea: HtmlTextAreaElement = e.target_unchecked_into();
            on_input.emit(textarea.value());
        })
    };

    let on_keydown = {
        let on_send = props.on_send.clone();
        let value = props.value.clone();
        let busy = props.busy;
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                if can_send(&value, busy) {
                    on_send.emit(value.clone());
                }
            }
        })
    };

    let on_click = {
        let on_send = props.on_send.clone();
        let value = props.value.clone();
        Callback::from(move |_: MouseEvent| on_send.emit(value.clone()))
    };

    html! {
        <div class="input-bar">
            <textarea
                ref={textarea_ref}
                class="chat-input"
                placeholder="Ask me anything..."
                rows="1"
                maxlength={MAX_INPUT_CHARS.to_string()}
                value={props.value.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
            />
            <div class="input-footer">
                <span class={classes!("char-counter", counter_is_warning(&props.value).then_some("warning"))}>
                    { counter_label(&props.value) }
                </span>
                <button class="btn btn-primary send-btn" disabled={!can_send(&props.value, props.busy)} onclick={on_click}>
                    { "Send" }
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_counts_characters_not_bytes() {
        assert_eq!(counter_label(""), "0/2000");
        assert_eq!(counter_label("héllo"), "5/2000");
    }

    #[test]
    fn counter_warns_past_threshold() {
        assert!(!counter_is_warning(&"a".repeat(1800)));
        assert!(counter_is_warning(&"a".repeat(1801)));
    }

    #[test]
    fn send_needs_text_and_idle_panel() {
        assert!(can_send("hi", false));
        assert!(!can_send("hi", true));
        assert!(!can_send("  \n ", false));
        assert!(!can_send("", false));
    }
}
