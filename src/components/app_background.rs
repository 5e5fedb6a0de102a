//! App Background
//!
//! Full-page logo backdrop every page is rendered on.

use leptos::prelude::*;

#[component]
pub fn AppBackground(children: Children) -> impl IntoView {
    view! {
        <div
            class="app-background"
            style="min-height:100vh;position:relative;background:#979797 url('/logo.png') center/contain no-repeat fixed"
        >
            <div style="position:fixed;inset:0;background:rgba(0,0,0,0.13);pointer-events:none"></div>
            <div style="position:relative;z-index:1">{children()}</div>
        </div>
    }
}

/// Coloured result badge
#[component]
pub fn Badge(#[prop(into)] style: String, #[prop(into)] text: String) -> impl IntoView {
    view! {
        <span
            class="badge"
            style=format!("display:inline-block;padding:2px 10px;border-radius:8px;font-weight:600;{style}")
        >
            {text}
        </span>
    }
}
