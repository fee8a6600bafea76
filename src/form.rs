//! Application form driver
//!
//! Drives an open application dialog from its first screen to a terminal
//! state, tolerating an unknown number of intermediate steps. The screen kind
//! is re-classified from probes on every iteration; there is no reliable
//! signal for "how many steps remain" or "did this click land", so every
//! probe failure is absorbed as "no progress" and the cycle budget bounds the
//! whole attempt.

use crate::actions::{click_resilient, pause, Timing};
use crate::driver::{Candidate, FieldKind, FormField, PageDriver};
use crate::selectors;
use log::{debug, warn};

/// Steps of interstitial screens skipped without field filling.
const MAX_FAST_FORWARD_HOPS: u32 = 8;
/// Field-completion cycles before the attempt is declared stalled.
const MAX_COMPLETION_CYCLES: u32 = 30;

const SUBMIT_TOKEN: &str = "submit";
const EXPERIENCE_TOKENS: [&str; 2] = ["experience", "years"];
const SALARY_TOKENS: [&str; 1] = ["salary"];

/// Screen classification, recomputed from probes each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Start,
    FastForward,
    FieldCompletion,
    AwaitingCompletion,
    Submitted,
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Submitted,
    /// Cycle budget exhausted without a completion signal. Surfaced to the
    /// caller as a skipped job after the dialog is discarded.
    Stalled,
}

/// Progress of one application attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormResult {
    pub terminal: Terminal,
    pub steps_attempted: u32,
}

/// What the fill policy decided for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldAction {
    SetValue(String),
    SelectOption(usize),
    ClickRadio,
}

/// Policy-driven default for a required field, keyed on the field's
/// label/placeholder/aria text.
pub fn plan_field(field: &FormField, affirmatives: &[String]) -> Option<FieldAction> {
    let label = field.label.to_lowercase();
    let is_affirmative =
        |text: &str| affirmatives.iter().any(|token| text.contains(token.as_str()));

    match field.kind {
        FieldKind::Radio => {
            if is_affirmative(&label) {
                Some(FieldAction::ClickRadio)
            } else {
                None
            }
        }
        FieldKind::Select => {
            let lowered: Vec<String> = field.options.iter().map(|o| o.to_lowercase()).collect();
            if let Some(i) = lowered.iter().position(|o| is_affirmative(o)) {
                return Some(FieldAction::SelectOption(i));
            }
            lowered
                .iter()
                .position(|o| !o.trim().is_empty())
                .map(FieldAction::SelectOption)
        }
        FieldKind::Number | FieldKind::Text => {
            let value = if EXPERIENCE_TOKENS.iter().any(|t| label.contains(t)) {
                "5"
            } else if SALARY_TOKENS.iter().any(|t| label.contains(t)) {
                "85000"
            } else if field.kind == FieldKind::Number {
                "5"
            } else {
                // Single space satisfies "required" validation without
                // asserting a real value.
                " "
            };
            Some(FieldAction::SetValue(value.to_string()))
        }
    }
}

pub struct FormDriver<'a> {
    driver: &'a dyn PageDriver,
    timing: &'a Timing,
    affirmatives: &'a [String],
}

impl<'a> FormDriver<'a> {
    pub fn new(driver: &'a dyn PageDriver, timing: &'a Timing, affirmatives: &'a [String]) -> Self {
        Self {
            driver,
            timing,
            affirmatives,
        }
    }

    /// Drive the dialog to a terminal state. Never propagates an error; every
    /// failure inside a step counts as no progress for that attempt.
    pub async fn run(&self) -> FormResult {
        let primary = Candidate::css(selectors::FORM_PRIMARY_ACTION);
        let secondary = Candidate::css(selectors::FORM_SECONDARY_ACTION);
        let completion = Candidate::css(selectors::COMPLETION_MODAL);

        let mut state = FormState::Start;
        let mut steps_attempted: u32 = 0;
        let mut fast_forward_hops: u32 = 0;
        let mut cycles_left = MAX_COMPLETION_CYCLES;

        loop {
            state = match state {
                FormState::Start => {
                    // Single-step application: the lone action button already
                    // says submit.
                    match self.driver.inner_text(&primary).await {
                        Ok(Some(text)) if text.to_lowercase().contains(SUBMIT_TOKEN) => {
                            steps_attempted += 1;
                            if click_resilient(self.driver, &[primary.clone()], self.timing).await {
                                FormState::Submitted
                            } else {
                                FormState::FastForward
                            }
                        }
                        _ => FormState::FastForward,
                    }
                }

                FormState::FastForward => {
                    // Informational interstitials with a lone continue button;
                    // no field filling on this path. On paired-button screens
                    // the lone-button selector resolves to "Back", so the
                    // dispatch result is not a progress signal: the presence
                    // of the paired control is what ends this phase.
                    if fast_forward_hops >= MAX_FAST_FORWARD_HOPS
                        || self.driver.is_present(&secondary).await.unwrap_or(false)
                    {
                        FormState::FieldCompletion
                    } else {
                        match self.driver.click_dispatch(&primary).await {
                            Ok(true) => {
                                fast_forward_hops += 1;
                                steps_attempted += 1;
                                pause(self.timing.step_pause).await;
                                FormState::FastForward
                            }
                            Ok(false) => FormState::FieldCompletion,
                            Err(e) => {
                                warn!("fast-forward probe failed: {e}");
                                fast_forward_hops += 1;
                                FormState::FastForward
                            }
                        }
                    }
                }

                FormState::FieldCompletion => {
                    self.fill_required_fields().await;
                    pause(self.timing.settle).await;
                    FormState::AwaitingCompletion
                }

                FormState::AwaitingCompletion => {
                    pause(self.timing.step_pause).await;
                    if self.driver.is_present(&completion).await.unwrap_or(false) {
                        FormState::Submitted
                    } else if cycles_left == 0 {
                        FormState::Stalled
                    } else {
                        match self.driver.click_dispatch(&secondary).await {
                            Ok(true) => {
                                cycles_left -= 1;
                                steps_attempted += 1;
                                debug!("form advanced, {cycles_left} cycles left");
                                FormState::FieldCompletion
                            }
                            // No continue control and no completion dialog:
                            // nothing actionable remains, treat as done.
                            Ok(false) => FormState::Submitted,
                            Err(e) => {
                                warn!("form advance failed: {e}");
                                cycles_left -= 1;
                                steps_attempted += 1;
                                FormState::AwaitingCompletion
                            }
                        }
                    }
                }

                FormState::Submitted => {
                    self.close_confirmation().await;
                    return FormResult {
                        terminal: Terminal::Submitted,
                        steps_attempted,
                    };
                }

                FormState::Stalled => {
                    self.discard_application().await;
                    return FormResult {
                        terminal: Terminal::Stalled,
                        steps_attempted,
                    };
                }
            };
        }
    }

    /// Fill every required control on the current screen with policy
    /// defaults. Per-field failures are logged and skipped.
    async fn fill_required_fields(&self) {
        let fields = match self.driver.enumerate_fields().await {
            Ok(fields) => fields,
            Err(e) => {
                warn!("field enumeration failed: {e}");
                return;
            }
        };

        for field in &fields {
            let Some(action) = plan_field(field, self.affirmatives) else {
                continue;
            };
            let applied = match &action {
                FieldAction::SetValue(value) => {
                    self.driver.set_field_value(field.index, value).await
                }
                FieldAction::SelectOption(option) => {
                    self.driver.select_option(field.index, *option).await
                }
                FieldAction::ClickRadio => self.driver.click_radio(field.index).await,
            };
            if let Err(e) = applied {
                warn!("could not fill field {} ({}): {e}", field.index, field.label);
            }
        }
        if !fields.is_empty() {
            debug!("filled {} fields", fields.len());
        }
    }

    async fn close_confirmation(&self) {
        pause(self.timing.step_pause).await;
        let _ = self
            .driver
            .click_dispatch(&Candidate::css(selectors::MODAL_DISMISS))
            .await;
    }

    /// Dismiss the dialog and confirm the discard prompt.
    async fn discard_application(&self) {
        pause(self.timing.settle).await;
        click_resilient(
            self.driver,
            &[Candidate::css(selectors::MODAL_DISMISS)],
            self.timing,
        )
        .await;
        pause(self.timing.settle).await;
        click_resilient(
            self.driver,
            &[Candidate::css(selectors::DISCARD_CONFIRM)],
            self.timing,
        )
        .await;
    }
}
