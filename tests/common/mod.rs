//! Scripted fake page driver for integration tests.
//!
//! Models just enough of the listings site to exercise the run loop: result
//! pages with job cards, a details pane, pagination, and application dialogs
//! with configurable form behavior. Every interaction is appended to an
//! action log so tests can assert on ordering and absence.

// Each test binary compiles this module on its own and uses a subset of it.
#![allow(dead_code)]

use async_trait::async_trait;
use easyapply::driver::{Candidate, FieldKind, FormField, PageDriver};
use easyapply::error::{BotError, Result};
use easyapply::selectors;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormScript {
    /// Submit control on the first screen.
    SingleStep,
    /// `screens` secondary advances before the completion dialog shows.
    Steps { screens: usize },
    /// Always offers another continue control, never completes.
    NeverCompletes,
}

#[derive(Debug, Clone)]
pub struct FakeJob {
    pub id: String,
    pub title: String,
    pub company: String,
    pub link: String,
    pub easy_apply: bool,
    pub form: FormScript,
}

impl FakeJob {
    pub fn new(id: &str, title: &str, company: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            link: format!("https://example.com/jobs/{id}"),
            easy_apply: true,
            form: FormScript::SingleStep,
        }
    }

    pub fn with_form(mut self, form: FormScript) -> Self {
        self.form = form;
        self
    }

    pub fn already_applied(mut self) -> Self {
        self.easy_apply = false;
        self
    }
}

#[derive(Debug, Default)]
struct Dialog {
    script: Option<FormScript>,
    screen: usize,
    completed: bool,
    discard_prompt: bool,
    discarded: bool,
}

#[derive(Debug, Default)]
struct State {
    pages: Vec<Vec<FakeJob>>,
    total_text: String,
    limit_banner: Option<String>,
    current_page: usize,
    selected_job: Option<usize>,
    dialog: Option<Dialog>,
    sibling_fallback_only: bool,
    lagged_indicator: bool,
    extra_present: HashSet<String>,
    submissions: usize,
    log: Vec<String>,
}

pub struct FakeDriver {
    state: Mutex<State>,
}

impl FakeDriver {
    pub fn new(pages: Vec<Vec<FakeJob>>, total_text: &str) -> Self {
        Self {
            state: Mutex::new(State {
                pages,
                total_text: total_text.to_string(),
                ..State::default()
            }),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], "0")
    }

    /// A one-job page with the application dialog already open.
    pub fn with_open_dialog(form: FormScript) -> Self {
        let driver = Self::new(vec![vec![FakeJob::new("j1", "Engineer", "Acme")]], "1");
        {
            let mut state = driver.state.lock().unwrap();
            state.selected_job = Some(0);
            state.dialog = Some(Dialog {
                script: Some(form),
                ..Dialog::default()
            });
        }
        driver
    }

    pub fn set_limit_banner(&self, text: &str) {
        self.state.lock().unwrap().limit_banner = Some(text.to_string());
    }

    pub fn set_sibling_fallback_only(&self) {
        self.state.lock().unwrap().sibling_fallback_only = true;
    }

    /// The active-page indicator keeps reporting page one after a transition.
    pub fn set_lagged_indicator(&self) {
        self.state.lock().unwrap().lagged_indicator = true;
    }

    pub fn add_present(&self, selector: &str) {
        self.state
            .lock()
            .unwrap()
            .extra_present
            .insert(selector.to_string());
    }

    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn log_count(&self, entry: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .log
            .iter()
            .filter(|line| line.as_str() == entry)
            .count()
    }

    /// Selectors probed via `is_present`, first probe only, in order.
    pub fn probe_order(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut seen = HashSet::new();
        state
            .log
            .iter()
            .filter_map(|line| line.strip_prefix("probe:"))
            .filter(|sel| seen.insert(sel.to_string()))
            .map(|sel| sel.to_string())
            .collect()
    }

    /// How many forms were actually driven to completion.
    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().submissions
    }

    pub fn dialog_discarded(&self) -> bool {
        self.state
            .lock()
            .unwrap()
            .dialog
            .as_ref()
            .map(|d| d.discarded)
            .unwrap_or(false)
    }
}

fn selected<'a>(state: &'a State) -> Option<&'a FakeJob> {
    let index = state.selected_job?;
    state.pages.get(state.current_page)?.get(index)
}

fn is_job_card(selector: &str) -> Option<usize> {
    for index in 0..64 {
        if selector == selectors::job_card(index) {
            return Some(index);
        }
    }
    None
}

fn is_pagination_button(selector: &str) -> Option<String> {
    selector
        .strip_prefix("button[aria-label=\"")
        .and_then(|rest| rest.strip_suffix("\"]"))
        .map(|label| label.to_string())
}

impl State {
    fn next_page_label(&self) -> Option<String> {
        if self.current_page + 1 < self.pages.len() {
            Some(format!("Page {}", self.current_page + 2))
        } else {
            None
        }
    }

    fn secondary_present(&self) -> bool {
        match &self.dialog {
            Some(dialog) if !dialog.completed => match dialog.script {
                // Paired buttons appear once past the lone-button screen.
                Some(FormScript::Steps { .. }) => dialog.screen >= 1,
                Some(FormScript::NeverCompletes) => true,
                _ => false,
            },
            _ => false,
        }
    }

    /// Shared by native click and in-page dispatch.
    fn perform_click(&mut self, selector: &str) -> bool {
        if let Some(index) = is_job_card(selector) {
            let jobs = self.pages.get(self.current_page).map(Vec::len).unwrap_or(0);
            if index < jobs {
                self.selected_job = Some(index);
                self.log.push(format!("select_card:{index}"));
                return true;
            }
            return false;
        }

        if let Some(label) = is_pagination_button(selector) {
            if Some(label.clone()) == self.next_page_label() {
                self.current_page += 1;
                self.selected_job = None;
                self.log.push(format!("page_advance:{label}"));
                return true;
            }
            return false;
        }

        match selector {
            selectors::EASY_APPLY_BUTTON => {
                let Some(job) = selected(self) else { return false };
                if !job.easy_apply || self.dialog.is_some() {
                    return false;
                }
                let script = job.form;
                let id = job.id.clone();
                self.dialog = Some(Dialog {
                    script: Some(script),
                    ..Dialog::default()
                });
                self.log.push(format!("apply_click:{id}"));
                true
            }
            // The lone-button selector resolves to the FIRST action-bar
            // button, which on paired-button screens is "Back".
            selectors::FORM_PRIMARY_ACTION => {
                let Some(dialog) = self.dialog.as_mut() else { return false };
                if dialog.completed {
                    return false;
                }
                match dialog.script {
                    Some(FormScript::SingleStep) => {
                        self.log.push("primary_click".to_string());
                        dialog.completed = true;
                        self.submissions += 1;
                        true
                    }
                    Some(FormScript::Steps { .. }) => {
                        if dialog.screen == 0 {
                            dialog.screen = 1;
                            self.log.push("next_click".to_string());
                        } else {
                            dialog.screen -= 1;
                            self.log.push("back_click".to_string());
                        }
                        true
                    }
                    Some(FormScript::NeverCompletes) => {
                        self.log.push("back_click".to_string());
                        true
                    }
                    None => false,
                }
            }
            selectors::FORM_SECONDARY_ACTION => {
                let Some(dialog) = self.dialog.as_mut() else { return false };
                if dialog.completed {
                    return false;
                }
                match dialog.script {
                    Some(FormScript::Steps { screens }) => {
                        if dialog.screen == 0 {
                            return false;
                        }
                        self.log.push("secondary_click".to_string());
                        dialog.screen += 1;
                        if dialog.screen > screens {
                            dialog.completed = true;
                            self.submissions += 1;
                        }
                        true
                    }
                    Some(FormScript::NeverCompletes) => {
                        self.log.push("secondary_click".to_string());
                        true
                    }
                    _ => false,
                }
            }
            selectors::MODAL_DISMISS => {
                if let Some(dialog) = self.dialog.as_mut() {
                    if !dialog.completed {
                        dialog.discard_prompt = true;
                    }
                    self.log.push("dismiss".to_string());
                    if dialog.discard_prompt {
                        // Keep the dialog entry so the discard prompt can be
                        // confirmed; the overlay itself is gone.
                        dialog.script = None;
                    } else {
                        self.dialog = None;
                    }
                    true
                } else {
                    false
                }
            }
            selectors::DISCARD_CONFIRM => {
                if let Some(dialog) = self.dialog.as_mut() {
                    if dialog.discard_prompt {
                        dialog.discard_prompt = false;
                        dialog.discarded = true;
                        self.log.push("discard_confirm".to_string());
                        return true;
                    }
                }
                false
            }
            _ => false,
        }
    }

    fn present(&self, selector: &str) -> bool {
        if self.extra_present.contains(selector) {
            return true;
        }
        if let Some(index) = is_job_card(selector) {
            let jobs = self.pages.get(self.current_page).map(Vec::len).unwrap_or(0);
            return index < jobs;
        }
        match selector {
            selectors::EASY_APPLY_BUTTON => selected(self)
                .map(|job| job.easy_apply && self.dialog.is_none())
                .unwrap_or(false),
            selectors::FORM_PRIMARY_ACTION => self
                .dialog
                .as_ref()
                .map(|d| d.script.is_some() && !d.completed)
                .unwrap_or(false),
            selectors::FORM_SECONDARY_ACTION => self.secondary_present(),
            selectors::COMPLETION_MODAL => self
                .dialog
                .as_ref()
                .map(|d| d.completed)
                .unwrap_or(false),
            selectors::MODAL_DISMISS => self
                .dialog
                .as_ref()
                .map(|d| d.script.is_some() || d.discard_prompt)
                .unwrap_or(false),
            selectors::DISCARD_CONFIRM => self
                .dialog
                .as_ref()
                .map(|d| d.discard_prompt)
                .unwrap_or(false),
            selectors::RESULTS_LIST | selectors::PAGINATION => true,
            _ => false,
        }
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.state.lock().unwrap().log.push(format!("navigate:{url}"));
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok("https://example.com/jobs".to_string())
    }

    async fn is_present(&self, target: &Candidate) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match target {
            Candidate::Css(selector) => {
                state.log.push(format!("probe:{selector}"));
                Ok(state.present(selector))
            }
            Candidate::Text { .. } => Ok(false),
        }
    }

    async fn click(&self, target: &Candidate) -> Result<()> {
        let Candidate::Css(selector) = target else {
            return Err(BotError::ElementNotFound(target.describe()));
        };
        let mut state = self.state.lock().unwrap();
        if state.perform_click(selector) {
            Ok(())
        } else {
            Err(BotError::ElementNotFound(selector.clone()))
        }
    }

    async fn click_dispatch(&self, target: &Candidate) -> Result<bool> {
        let Candidate::Css(selector) = target else {
            return Ok(false);
        };
        Ok(self.state.lock().unwrap().perform_click(selector))
    }

    async fn scroll_into_view(&self, _target: &Candidate) -> Result<()> {
        Ok(())
    }

    async fn type_text(&self, target: &Candidate, text: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .log
            .push(format!("type:{}:{text}", target.describe()));
        Ok(())
    }

    async fn clear_value(&self, target: &Candidate) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .log
            .push(format!("clear:{}", target.describe()));
        Ok(())
    }

    async fn press_enter(&self, _target: &Candidate) -> Result<()> {
        self.state.lock().unwrap().log.push("enter".to_string());
        Ok(())
    }

    async fn inner_text(&self, target: &Candidate) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        let Candidate::Css(selector) = target else {
            return Ok(None);
        };
        Ok(match selector.as_str() {
            selectors::TOTAL_RESULTS_SUBTITLE => Some(state.total_text.clone()),
            selectors::COMPANY_NAME => selected(&state).map(|job| job.company.clone()),
            selectors::JOB_TITLE_LINK => selected(&state).map(|job| job.title.clone()),
            selectors::APPLY_LIMIT_BANNER => state.limit_banner.clone(),
            selectors::FORM_PRIMARY_ACTION => state.dialog.as_ref().and_then(|d| {
                d.script.map(|script| match script {
                    FormScript::SingleStep => "Submit application".to_string(),
                    FormScript::Steps { .. } if d.screen == 0 => "Next".to_string(),
                    _ => "Back".to_string(),
                })
            }),
            _ => None,
        })
    }

    async fn attribute(&self, target: &Candidate, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if let Candidate::Css(selector) = target {
            if selector == selectors::JOB_TITLE_LINK && name == "href" {
                return Ok(selected(&state).map(|job| job.link.clone()));
            }
        }
        Ok(None)
    }

    async fn job_ids_on_page(&self) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pages
            .get(state.current_page)
            .map(|jobs| jobs.iter().map(|job| job.id.clone()).collect())
            .unwrap_or_default())
    }

    async fn next_control_from_indicator(&self) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.log.push("next_lookup:indicator".to_string());
        if state.sibling_fallback_only {
            return Ok(None);
        }
        Ok(state.next_page_label())
    }

    async fn next_control_from_sibling(&self) -> Result<Option<String>> {
        let mut state = self.state.lock().unwrap();
        state.log.push("next_lookup:sibling".to_string());
        Ok(state.next_page_label())
    }

    async fn active_page_number(&self) -> Result<Option<u32>> {
        let state = self.state.lock().unwrap();
        if state.lagged_indicator {
            return Ok(Some(1));
        }
        Ok(Some(state.current_page as u32 + 1))
    }

    async fn enumerate_fields(&self) -> Result<Vec<FormField>> {
        let state = self.state.lock().unwrap();
        if !state.secondary_present() {
            return Ok(vec![]);
        }
        Ok(vec![
            FormField {
                index: 0,
                kind: FieldKind::Text,
                label: "years of experience".to_string(),
                options: vec![],
            },
            FormField {
                index: 1,
                kind: FieldKind::Radio,
                label: "yes".to_string(),
                options: vec![],
            },
        ])
    }

    async fn set_field_value(&self, index: usize, value: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .log
            .push(format!("set_field:{index}:{value}"));
        Ok(())
    }

    async fn select_option(&self, field: usize, option: usize) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .log
            .push(format!("select_option:{field}:{option}"));
        Ok(())
    }

    async fn click_radio(&self, index: usize) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .log
            .push(format!("click_radio:{index}"));
        Ok(())
    }
}
