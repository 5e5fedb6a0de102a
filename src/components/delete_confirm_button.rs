//! Delete Confirm Button Component
//!
//! Inline "Vymazať" button that asks for confirmation before deleting a report.

use leptos::prelude::*;

/// Inline delete confirmation button
///
/// Shows "Vymazať" initially. When clicked, shows the prompt with ✓/✗ buttons.
///
/// # Arguments
/// * `prompt` - Question shown while confirming
/// * `on_confirm` - Callback to execute when user confirms deletion
#[component]
pub fn DeleteConfirmButton(
    #[prop(into)] prompt: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let (confirm_delete, set_confirm_delete) = signal(false);

    view! {
        <Show when=move || !confirm_delete.get()>
            <button
                class="delete-btn"
                style="color:#9ca3af;font-weight:600;font-size:14px"
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_confirm_delete.set(true);
                }
            >
                "Vymazať"
            </button>
        </Show>
        <Show when=move || confirm_delete.get()>
            <span class="delete-confirm" style="display:inline-flex;gap:8px;align-items:center;font-size:14px">
                <span class="delete-confirm-text" style="color:#b91c1c;font-weight:600">{prompt.clone()}</span>
                <button
                    class="confirm-btn"
                    style="color:#dc2626;font-weight:700"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                        on_confirm.run(());
                    }
                >
                    "✓"
                </button>
                <button
                    class="cancel-btn"
                    style="color:#6b7280;font-weight:700"
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_confirm_delete.set(false);
                    }
                >
                    "✗"
                </button>
            </span>
        </Show>
    }
}
