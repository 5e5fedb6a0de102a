//! Home Screen
//!
//! Login gate, then the operator job form with shortcuts to the other tools.

use chrono::Local;
use leptos::prelude::*;
use tracing::{info, warn};

use crate::auth::{self, Role, USERNAMES};
use crate::browser;
use crate::context::{use_app_context, Page};
use crate::job::{OperatorJob, MACHINES};

const CARD_STYLE: &str = "max-width:420px;margin:60px auto;background:rgba(255,255,255,0.95);border-radius:16px;padding:28px;box-shadow:0 10px 30px rgba(0,0,0,0.2)";
const FIELD_STYLE: &str = "width:100%;padding:8px;margin:4px 0 12px;border:1px solid #cbd5e1;border-radius:6px";

/// Login form until a role is chosen, then the operator form
#[component]
pub fn HomeSwitch() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <Show
            when=move || ctx.role.get().is_some()
            fallback=move || view! { <LoginForm /> }
        >
            <OperatorForm />
        </Show>
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();
    let (username, set_username) = signal(USERNAMES[0].to_string());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match auth::authenticate(&username.get_untracked(), &password.get_untracked()) {
            Ok(role) => {
                info!("signed in as {}", role.as_str());
                ctx.role.set(Some(role));
            }
            Err(err) => {
                warn!("login refused for {}", username.get_untracked());
                set_error.set(Some(err.to_string()));
            }
        }
    };

    view! {
        <form class="login-form" style=CARD_STYLE on:submit=on_submit>
            <h1 style="margin:0;text-align:center">"Scancontroll"</h1>
            <p style="text-align:center;color:#475569">"Prihlásenie do systému"</p>

            <label>"Meno"</label>
            <select
                style=FIELD_STYLE
                prop:value=move || username.get()
                on:change=move |ev| {
                    set_username.set(event_target_value(&ev));
                    set_error.set(None);
                }
            >
                {USERNAMES
                    .iter()
                    .map(|name| view! { <option value=*name>{*name}</option> })
                    .collect_view()}
            </select>

            <label>"Heslo"</label>
            <input
                type="password"
                style=FIELD_STYLE
                prop:value=move || password.get()
                on:input=move |ev| {
                    set_password.set(event_target_value(&ev));
                    set_error.set(None);
                }
            />

            <Show when=move || error.get().is_some()>
                <p class="login-error" style="color:#dc2626;font-weight:600">
                    {move || error.get().unwrap_or_default()}
                </p>
            </Show>

            <button type="submit" class="primary-btn" style="width:100%;padding:10px">
                "Prihlásiť sa"
            </button>
        </form>
    }
}

/// Job metadata entered before the comparison
#[component]
pub fn OperatorForm() -> impl IntoView {
    let ctx = use_app_context();
    let role = ctx.role.get_untracked().unwrap_or(Role::Operator);
    let job = RwSignal::new(ctx.job.get_untracked().unwrap_or_else(|| OperatorJob::new(role, Local::now())));
    let is_admin = role.is_admin();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let current = job.get_untracked();
        let missing = current.missing_fields();
        if !missing.is_empty() {
            browser::alert(&format!("Vyplň: {}", missing.join(", ")));
            return;
        }
        info!("job {} for product {} on {}", current.job_number, current.product, current.machine);
        ctx.start_job(current);
    };

    // One text input bound to a job field
    let text_field = move |label: &'static str, read: fn(&OperatorJob) -> String, write: fn(&mut OperatorJob, String)| {
        view! {
            <label>{label}</label>
            <input
                type="text"
                style=FIELD_STYLE
                prop:value=move || job.with(read)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    job.update(|j| write(j, value));
                }
            />
        }
    };

    view! {
        <div style=CARD_STYLE>
            <form class="operator-form" on:submit=on_submit>
                <h2 style="margin-top:0">"Údaje o skene"</h2>

                <label>"Meno operátora"</label>
                <input
                    type="text"
                    style=FIELD_STYLE
                    readonly=is_admin
                    prop:value=move || job.with(|j| j.operator.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        job.update(|j| j.operator = value);
                    }
                />

                {text_field("Číslo zákazky", |j| j.job_number.clone(), |j, v| j.job_number = v)}
                {text_field("Číslo produktu", |j| j.product.clone(), |j, v| j.product = v)}

                <label>"Stroj"</label>
                <select
                    style=FIELD_STYLE
                    prop:value=move || job.with(|j| j.machine.clone())
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        job.update(|j| j.machine = value);
                    }
                >
                    <option value="" disabled=true>"Vyber stroj"</option>
                    {MACHINES
                        .iter()
                        .map(|m| view! { <option value=*m>{*m}</option> })
                        .collect_view()}
                </select>

                <div style="display:flex;gap:12px">
                    <div style="flex:1">
                        <label>"Dátum"</label>
                        <input
                            type="date"
                            style=FIELD_STYLE
                            prop:value=move || job.with(|j| j.date.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                job.update(|j| j.date = value);
                            }
                        />
                    </div>
                    <div style="flex:1">
                        <label>"Čas"</label>
                        <input
                            type="time"
                            style=FIELD_STYLE
                            prop:value=move || job.with(|j| j.time.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                job.update(|j| j.time = value);
                            }
                        />
                    </div>
                </div>

                <button type="submit" class="primary-btn" style="width:100%;padding:10px">
                    "Pokračovať"
                </button>
            </form>

            <div style="display:flex;gap:8px;margin-top:16px;justify-content:center">
                <button type="button" on:click=move |_| ctx.navigate(Page::Denzita)>"Denzita"</button>
                <button type="button" on:click=move |_| ctx.navigate(Page::Pantone)>"Pantone"</button>
                <button type="button" on:click=move |_| ctx.navigate(Page::Dashboard)>"Dashboard"</button>
            </div>
        </div>
    }
}
