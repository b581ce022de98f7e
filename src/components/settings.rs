use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::models::ApiConfig;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsProps {
    pub config: ApiConfig,
    pub on_save: Callback<ApiConfig>,
    pub on_close: Callback<()>,
    pub on_reset: Callback<()>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsProps) -> Html {
    // Edits stay local until saved.
    let draft = use_state(|| props.config.clone());
    {
        let draft = draft.clone();
        use_effect_with(props.config.clone(), move |config| draft.set(config.clone()));
    }

    let on_key_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(ApiConfig {
                api_key: input.value(),
                ..(*draft).clone()
            });
        })
    };

    let on_model_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            draft.set(ApiConfig {
                model: input.value(),
                ..(*draft).clone()
            });
        })
    };

    let on_prompt_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            draft.set(ApiConfig {
                system_prompt: input.value(),
                ..(*draft).clone()
            });
        })
    };

    let on_save_click = {
        let on_save = props.on_save.clone();
        let draft = draft.clone();
        Callback::from(move |_| on_save.emit((*draft).clone()))
    };

    let css = r#"
        .settings-backdrop { position: absolute; top: 0; left: 0; width: 100%; height: 100%; background: rgba(0,0,0,0.25); z-index: 99; cursor: pointer; }
        .settings-panel { position: absolute; top: 56px; left: 12px; right: 12px; background: var(--bg-app); border: 1px solid var(--border-color); border-radius: 8px; box-shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1); padding: 16px; z-index: 100; display: flex; flex-direction: column; gap: 12px; }
        .settings-header { display: flex; justify-content: space-between; align-items: center; border-bottom: 1px solid var(--border-color); padding-bottom: 8px; }
        .settings-header h3 { margin: 0; font-size: 1rem; }
        .close-btn { background: none; border: none; font-size: 1.5rem; line-height: 1; cursor: pointer; color: var(--text-secondary); padding: 0 5px; }
        .form-label { display: block; font-size: 0.85rem; font-weight: 600; margin-bottom: 5px; color: var(--text-secondary); }
        .form-input, .form-textarea { width: 100%; padding: 8px; border: 1px solid var(--border-color); border-radius: 6px; background: var(--bg-app); color: var(--text-primary); font: inherit; }
        .form-hint { font-size: 0.75rem; color: var(--text-secondary); margin-top: 4px; }
        .actions { display: flex; gap: 8px; justify-content: flex-end; }
    "#;

    html! {
        <>
            <style>{ css }</style>
            <div class="settings-backdrop" onclick={props.on_close.reform(|_| ())}></div>

            <div class="settings-panel">
                <div class="settings-header">
                    <h3>{ "Configuration" }</h3>
                    <button class="close-btn" onclick={props.on_close.reform(|_| ())} title="Close">{"×"}</button>
                </div>

                <div>
                    <label class="form-label">{ "API Key" }</label>
                    <input class="form-input" type="password" value={draft.api_key.clone()} oninput={on_key_input} placeholder="sk-or-..." />
                    <div class="form-hint">{ format!("Requests go to {}", draft.endpoint) }</div>
                </div>

                <div>
                    <label class="form-label">{ "Model" }</label>
                    <input class="form-input" type="text" value={draft.model.clone()} oninput={on_model_input} />
                </div>

                <div>
                    <label class="form-label">{ "System Prompt" }</label>
                    <textarea class="form-textarea" value={draft.system_prompt.clone()} oninput={on_prompt_input} style="height: 80px; resize: none;" />
                </div>

                <div class="actions">
                    <button class="btn" onclick={props.on_reset.reform(|_| ())}>{ "Reset" }</button>
                    <button class="btn btn-primary" onclick={on_save_click}>{ "Save" }</button>
                </div>
            </div>
        </>
    }
}
