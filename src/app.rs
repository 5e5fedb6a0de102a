//! Scancontroll App
//!
//! Provides the shared context and switches between the console pages.

use leptos::prelude::*;

use crate::components::{
    AppBackground, CompareReport, CompareWorkflow, DashboardReport, DenzitaReport, HomeSwitch,
    PantoneReport,
};
use crate::context::{AppContext, Page};

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <AppBackground>
            {move || match ctx.page.get() {
                Page::Home => view! { <HomeSwitch /> }.into_any(),
                Page::Compare => view! { <CompareWorkflow /> }.into_any(),
                Page::CompareReport => view! { <CompareReport /> }.into_any(),
                Page::Denzita => view! { <DenzitaReport /> }.into_any(),
                Page::Pantone => view! { <PantoneReport /> }.into_any(),
                Page::Dashboard => view! { <DashboardReport /> }.into_any(),
            }}
        </AppBackground>
    }
}
