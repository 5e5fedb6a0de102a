#![allow(warnings)]
//! Scancontroll Operator Console Entry Point

mod api;
mod app;
mod auth;
mod browser;
mod components;
mod config;
mod context;
mod denzita;
mod geometry;
mod imaging;
mod job;
mod models;
mod pantone;
mod reports;
mod store;
mod verdict;
mod wind;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init_logger("scancontroll", rolling_logger::DEFAULT_CAPACITY) {
        web_sys::console::error_1(&format!("logger init failed: {err}").into());
    }
    tracing::info!("API base {}", config::config().api_base);
    mount_to_body(App);
}
