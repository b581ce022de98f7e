use std::rc::Rc;
use std::time::Duration;

use uuid::Uuid;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub const TOAST_LIFETIME: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub is_error: bool,
}

impl Toast {
    pub fn new(message: impl Into<String>, is_error: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            is_error,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Toasts {
    pub items: Vec<Toast>,
}

pub enum ToastAction {
    Show(Toast),
    Dismiss(Uuid),
}

impl Reducible for Toasts {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut items = self.items.clone();
        match action {
            ToastAction::Show(toast) => items.push(toast),
            ToastAction::Dismiss(id) => items.retain(|t| t.id != id),
        }
        Rc::new(Self { items })
    }
}

/// Show a toast and schedule its removal.
pub fn notify(toasts: &UseReducerDispatcher<Toasts>, message: impl Into<String>, is_error: bool) {
    let toast = Toast::new(message, is_error);
    let id = toast.id;
    toasts.dispatch(ToastAction::Show(toast));

    let toasts = toasts.clone();
    spawn_local(async move {
        gloo_timers::future::sleep(TOAST_LIFETIME).await;
        toasts.dispatch(ToastAction::Dismiss(id));
    });
}

#[derive(Properties, PartialEq)]
pub struct ToastStackProps {
    pub toasts: Vec<Toast>,
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    html! {
        <div class="toast-stack">
            { for props.toasts.iter().map(|t| html! {
                <div key={t.id.to_string()} class={classes!("toast", if t.is_error { "error" } else { "success" })}>
                    { &t.message }
                </div>
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_dismiss() {
        let first = Toast::new("Copied to clipboard!", false);
        let second = Toast::new("Failed to copy text", true);
        let first_id = first.id;

        let state = Rc::new(Toasts::default())
            .reduce(ToastAction::Show(first))
            .reduce(ToastAction::Show(second.clone()));
        assert_eq!(state.items.len(), 2);

        let state = state.reduce(ToastAction::Dismiss(first_id));
        assert_eq!(state.items, vec![second]);
    }

    #[test]
    fn dismissing_unknown_id_is_harmless() {
        let state = Rc::new(Toasts::default())
            .reduce(ToastAction::Show(Toast::new("hi", false)))
            .reduce(ToastAction::Dismiss(Uuid::new_v4()));
        assert_eq!(state.items.len(), 1);
    }
}
