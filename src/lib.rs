pub mod actions;
pub mod browser;
pub mod config;
pub mod controller;
pub mod dedup;
pub mod driver;
pub mod eligibility;
pub mod error;
pub mod form;
pub mod i18n;
pub mod locate;
pub mod login;
pub mod pagination;
pub mod report;
pub mod search;
pub mod selectors;

//  Re-export commonly used items
pub use actions::{click_resilient, pause, type_into, wait_for_condition, Timing};
pub use browser::{ChromeSession, LaunchOptions};
pub use config::Config;
pub use controller::{
    ApplicationOutcome, JobListing, OutcomeStatus, RunController, RunSummary, Termination,
};
pub use dedup::SeenJobs;
pub use driver::{Candidate, FieldKind, FormField, PageDriver};
pub use eligibility::{EligibilityFilter, Verdict};
pub use error::BotError;
pub use form::{FormDriver, FormResult, FormState, Terminal};
pub use i18n::Messages;
pub use locate::locate;
pub use login::Credentials;
pub use pagination::{Advance, PageNavigator};
pub use report::ReportWriter;
