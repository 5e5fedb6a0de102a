//! UI Components
//!
//! Console pages and the Leptos components they share.

mod app_background;
mod wind_select;
mod crop_dialog;
mod overlay_canvas;
mod label_grid;
mod home;
mod compare_workflow;
mod compare_report;
mod denzita_report;
mod pantone_report;
mod dashboard_report;
mod delete_confirm_button;

pub use app_background::{AppBackground, Badge};
pub use home::HomeSwitch;
pub use compare_workflow::CompareWorkflow;
pub use compare_report::CompareReport;
pub use denzita_report::DenzitaReport;
pub use pantone_report::PantoneReport;
pub use dashboard_report::DashboardReport;
pub use delete_confirm_button::DeleteConfirmButton;
