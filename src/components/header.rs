use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub dark_mode: bool,
    pub on_toggle_theme: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_share: Callback<()>,
    pub on_settings: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let theme_title = if props.dark_mode { "Switch to light mode" } else { "Switch to dark mode" };
    let theme_icon = if props.dark_mode { "☀" } else { "☾" };

    html! {
        <div class="header">
            <h2>{ "AI Assistant" }</h2>
            <div class="header-actions">
                <button class="btn-icon" onclick={props.on_toggle_theme.reform(|_| ())} title={theme_title}>
                    { theme_icon }
                </button>
                <button class="btn-icon" onclick={props.on_clear.reform(|_| ())} title="Clear chat">
                    <svg width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="3 6 5 6 21 6"></polyline><path d="M19 6l-1 14a2 2 0 0 1-2 2H8a2 2 0 0 1-2-2L5 6"></path><path d="M10 11v6"></path><path d="M14 11v6"></path></svg>
                </button>
                <button class="btn-icon" onclick={props.on_share.reform(|_| ())} title="Share">
                    <svg width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><circle cx="18" cy="5" r="3"></circle><circle cx="6" cy="12" r="3"></circle><circle cx="18" cy="19" r="3"></circle><line x1="8.59" y1="13.51" x2="15.42" y2="17.49"></line><line x1="15.41" y1="6.51" x2="8.59" y2="10.49"></line></svg>
                </button>
                <button class="btn-icon" onclick={props.on_settings.reform(|_| ())} title="Settings">
                    <svg width="18" height="18" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><circle cx="12" cy="12" r="3"></circle><path d="M12 1v3M12 20v3M4.22 4.22l2.12 2.12M17.66 17.66l2.12 2.12M1 12h3M20 12h3M4.22 19.78l2.12-2.12M17.66 6.34l2.12-2.12"></path></svg>
                </button>
            </div>
        </div>
    }
}
