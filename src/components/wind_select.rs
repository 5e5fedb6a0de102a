//! Wind Selector
//!
//! The four NAVIN codes with their icons; the active one is highlighted.

use leptos::prelude::*;

use crate::wind::{self, Wind};

#[component]
pub fn WindSelect(
    /// Active rotation index
    index: RwSignal<usize>,
) -> impl IntoView {
    view! {
        <div class="wind-select" style="display:flex;gap:8px;align-items:center">
            {wind::ALL
                .iter()
                .map(|w| {
                    let w: Wind = *w;
                    let active = move || wind::wind_at(index.get()) == w;
                    view! {
                        <button
                            type="button"
                            class="wind-option"
                            title=w.as_str()
                            style=move || {
                                if active() {
                                    "border:3px solid #2563eb;border-radius:8px;background:#dbeafe;padding:2px"
                                } else {
                                    "border:3px solid transparent;border-radius:8px;background:#fff;padding:2px"
                                }
                            }
                            on:click=move |_| index.set(w.rotation_index())
                        >
                            <img src=w.icon() alt=w.as_str() width="48" height="48" />
                            <div style="font-size:12px;font-weight:600">{w.as_str()}</div>
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
