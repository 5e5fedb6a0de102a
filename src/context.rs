//! Application Context
//!
//! Shared state provided via Leptos Context API: the active page, the
//! signed-in role and the data handed from one page to the next.

use leptos::prelude::*;
use tracing::info;

use crate::auth::Role;
use crate::job::OperatorJob;
use crate::verdict::ReportDraft;

/// Pages of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Login, then the operator form
    Home,
    Compare,
    CompareReport,
    Denzita,
    Pantone,
    Dashboard,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current page - read
    pub page: ReadSignal<Page>,
    /// Current page - write
    set_page: WriteSignal<Page>,
    /// Signed-in role (None = login form)
    pub role: RwSignal<Option<Role>>,
    /// Job entered on the operator form
    pub job: RwSignal<Option<OperatorJob>>,
    /// Compare result handed to the report page
    pub draft: RwSignal<Option<ReportDraft>>,
}

impl AppContext {
    pub fn new() -> Self {
        let (page, set_page) = signal(Page::Home);
        Self {
            page,
            set_page,
            role: RwSignal::new(None),
            job: RwSignal::new(None),
            draft: RwSignal::new(None),
        }
    }

    /// Switch to another page
    pub fn navigate(&self, page: Page) {
        info!("navigate to {:?}", page);
        self.set_page.set(page);
        if let Some(window) = web_sys::window() {
            window.scroll_to_with_x_and_y(0.0, 0.0);
        }
    }

    /// Store the job and open the compare workflow
    pub fn start_job(&self, job: OperatorJob) {
        self.job.set(Some(job));
        self.draft.set(None);
        self.navigate(Page::Compare);
    }

    /// Hand a compare result to the report page
    pub fn open_report(&self, draft: ReportDraft) {
        self.draft.set(Some(draft));
        self.navigate(Page::CompareReport);
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
