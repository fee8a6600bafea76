//! Page capability interface
//!
//! Everything the run logic needs from a browser page, expressed as a trait so
//! the core is agnostic to how the page is actually driven. The production
//! implementation lives in `browser::session`; integration tests script a fake.

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// One strategy for resolving a logical UI target to a concrete element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Direct CSS selector.
    Css(String),
    /// Text-content match: first element under `scope` whose text contains
    /// `needle` (case-insensitive, trimmed).
    Text { scope: String, needle: String },
}

impl Candidate {
    pub fn css(selector: impl Into<String>) -> Self {
        Candidate::Css(selector.into())
    }

    pub fn text(scope: impl Into<String>, needle: impl Into<String>) -> Self {
        Candidate::Text {
            scope: scope.into(),
            needle: needle.into(),
        }
    }

    /// Human-readable form for log lines.
    pub fn describe(&self) -> String {
        match self {
            Candidate::Css(sel) => sel.clone(),
            Candidate::Text { scope, needle } => format!("{scope} ~ \"{needle}\""),
        }
    }
}

/// Kind of form control reported by `enumerate_fields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Radio,
    Select,
}

/// A fillable control in the open application dialog.
///
/// `label` is the lowercased concatenation of label text, placeholder and
/// aria-label, which is what the fill policy keys on. `index` addresses the
/// control in later `set_field_value`/`select_option`/`click_radio` calls.
#[derive(Debug, Clone, Deserialize)]
pub struct FormField {
    pub index: usize,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Browser page operations consumed by the run logic.
///
/// Absence of an element is a value (`false`/`None`), never an error; errors
/// mean the page itself could not be asked.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// True if the target resolves to an element that is currently rendered.
    async fn is_present(&self, target: &Candidate) -> Result<bool>;

    /// Native click through the automation layer. May fail on overlapped or
    /// moving elements; callers fall back to `click_dispatch`.
    async fn click(&self, target: &Candidate) -> Result<()>;

    /// Click dispatched inside the page, bypassing visibility checks.
    /// Returns false when the target does not resolve.
    async fn click_dispatch(&self, target: &Candidate) -> Result<bool>;

    async fn scroll_into_view(&self, target: &Candidate) -> Result<()>;

    /// Append text to the target as discrete input events. Does not clear
    /// pre-existing content.
    async fn type_text(&self, target: &Candidate, text: &str) -> Result<()>;

    /// Reset the target's value to empty and notify the page.
    async fn clear_value(&self, target: &Candidate) -> Result<()>;

    /// Press Enter with the target focused.
    async fn press_enter(&self, target: &Candidate) -> Result<()>;

    async fn inner_text(&self, target: &Candidate) -> Result<Option<String>>;

    async fn attribute(&self, target: &Candidate, name: &str) -> Result<Option<String>>;

    /// Identifiers of the job cards currently rendered on the result page.
    async fn job_ids_on_page(&self) -> Result<Vec<String>>;

    /// Label of the enabled pagination control adjacent to the active page
    /// indicator, if any.
    async fn next_control_from_indicator(&self) -> Result<Option<String>>;

    /// Looser sibling-based lookup for the same control.
    async fn next_control_from_sibling(&self) -> Result<Option<String>>;

    /// Page number reported by the active pagination indicator.
    async fn active_page_number(&self) -> Result<Option<u32>>;

    /// Fillable controls of the open application dialog, in document order.
    async fn enumerate_fields(&self) -> Result<Vec<FormField>>;

    async fn set_field_value(&self, index: usize, value: &str) -> Result<()>;

    async fn select_option(&self, field: usize, option: usize) -> Result<()>;

    async fn click_radio(&self, index: usize) -> Result<()>;
}
