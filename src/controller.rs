//! Run controller
//!
//! The top-level loop: iterate result pages, iterate jobs on each page by
//! display index, classify/skip/apply, record one outcome per processed job,
//! advance the page. Terminates on the reported total being reached, the
//! external apply-limit banner, a dedup stall, or pagination running out.
//! Nothing from inside a single job's application propagates as a failure;
//! only the page itself becoming unreachable is an error here.

use crate::actions::{click_resilient, pause, Timing};
use crate::config::Config;
use crate::dedup::SeenJobs;
use crate::driver::{Candidate, PageDriver};
use crate::eligibility::{EligibilityFilter, Verdict};
use crate::error::Result;
use crate::form::{FormDriver, Terminal};
use crate::i18n::Messages;
use crate::pagination::{Advance, PageNavigator};
use crate::report::ReportWriter;
use crate::selectors;
use log::{info, warn};

/// Per-job result recorded in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Applied,
    Skipped,
    AlreadyApplied,
}

#[derive(Debug, Clone)]
pub struct ApplicationOutcome {
    pub job_id: String,
    pub title: String,
    pub link: String,
    pub status: OutcomeStatus,
}

/// A job row as enumerated from a result page. Title/company/link are read
/// from the details pane after selecting the card; absence means unknown.
#[derive(Debug, Clone)]
pub struct JobListing {
    pub job_id: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub link: Option<String>,
    pub index_on_page: usize,
}

/// Why the run ended. All of these are terminal successes of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Processed count reached the reported total.
    TotalReached,
    /// The site reported the application limit.
    ApplyLimitReached,
    /// A page transition produced no new jobs.
    Stalled,
    /// No enabled next-page control.
    NoMorePages,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u32,
    pub applied: u32,
    pub skipped: u32,
    pub already_applied: u32,
    pub pages_visited: u32,
    pub termination: Termination,
}

/// Reported total like "1,024 results" → 1024. Unparseable input yields 0 and
/// the run then terminates via stall or pagination instead.
pub fn parse_total(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .map(|token| token.replace(',', ""))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

pub struct RunController<'a> {
    driver: &'a dyn PageDriver,
    config: &'a Config,
    messages: &'a Messages,
    report: &'a ReportWriter,
    timing: Timing,
    filter: EligibilityFilter,
    navigator: PageNavigator,
    seen: SeenJobs,
}

impl<'a> RunController<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        config: &'a Config,
        messages: &'a Messages,
        report: &'a ReportWriter,
        timing: Timing,
    ) -> Result<Self> {
        let filter = EligibilityFilter::new(&config.avoid_companies, &config.avoid_job_titles)?;
        let navigator = PageNavigator::new(1, timing.clone());
        Ok(Self {
            driver,
            config,
            messages,
            report,
            timing,
            filter,
            navigator,
            seen: SeenJobs::new(),
        })
    }

    pub async fn run(&mut self) -> Result<RunSummary> {
        let total = self.read_total_jobs().await;
        info!("reported total results: {total}");

        self.advance_to_start_page().await;

        let mut processed: u32 = 0;
        let mut applied: u32 = 0;
        let mut skipped: u32 = 0;
        let mut already_applied: u32 = 0;
        let mut pages_visited: u32 = 1;

        let termination = 'run: loop {
            info!("{}", self.messages.waiting);
            pause(self.timing.step_pause).await;

            let ids = self.driver.job_ids_on_page().await.unwrap_or_default();
            if self.seen.merge_page(&ids) == 0 {
                warn!(
                    "no new jobs on page {}, ending run",
                    self.navigator.current_page()
                );
                break Termination::Stalled;
            }

            for index in 0..self.config.jobs_per_page as usize {
                if total > 0 && processed >= total {
                    info!("{}", self.messages.end_of_run);
                    break 'run Termination::TotalReached;
                }
                // The last page may render fewer cards than the page budget.
                if index >= ids.len() {
                    info!("only {} jobs on this page", ids.len());
                    break;
                }

                info!(
                    "{} [{} / {}]",
                    self.messages.job_progress,
                    processed + 1,
                    total
                );

                let listing = self.open_job(index, &ids).await;
                processed += 1;

                let apply_button = Candidate::css(selectors::EASY_APPLY_BUTTON);
                if !self.driver.is_present(&apply_button).await.unwrap_or(false) {
                    info!("{}", self.messages.already_applied);
                    already_applied += 1;
                    self.record(&listing, OutcomeStatus::AlreadyApplied);
                    continue;
                }

                match self
                    .filter
                    .decide(listing.company.as_deref(), listing.title.as_deref())
                {
                    Verdict::ExcludedCompany(name) => {
                        info!("{}: {name}", self.messages.skip_company);
                        skipped += 1;
                        self.record(&listing, OutcomeStatus::Skipped);
                        continue;
                    }
                    Verdict::ExcludedTitle(pattern) => {
                        info!("{}: {pattern}", self.messages.skip_title);
                        skipped += 1;
                        self.record(&listing, OutcomeStatus::Skipped);
                        continue;
                    }
                    Verdict::Eligible => {}
                }

                if self.apply_limit_reached().await {
                    info!("{}", self.messages.limit_reached);
                    break 'run Termination::ApplyLimitReached;
                }

                info!(
                    "{} {} ...",
                    self.messages.apply_to,
                    listing.title.as_deref().unwrap_or("(untitled)")
                );
                click_resilient(self.driver, &[apply_button], &self.timing).await;
                pause(self.timing.settle).await;

                // The safety-reminder interstitial appears for some postings.
                let _ = self
                    .driver
                    .click_dispatch(&Candidate::css(selectors::SAFETY_REMINDER_CONTINUE))
                    .await;

                let form =
                    FormDriver::new(self.driver, &self.timing, &self.messages.affirmatives);
                let result = form.run().await;
                match result.terminal {
                    Terminal::Submitted => {
                        applied += 1;
                        self.record(&listing, OutcomeStatus::Applied);
                    }
                    Terminal::Stalled => {
                        info!("{}", self.messages.job_skipped);
                        skipped += 1;
                        self.record(&listing, OutcomeStatus::Skipped);
                    }
                }
            }

            // A total hit exactly at the end of a page must not trigger
            // another page transition.
            if total > 0 && processed >= total {
                info!("{}", self.messages.end_of_run);
                break Termination::TotalReached;
            }

            self.scroll_results_list().await;
            match self.navigator.advance(self.driver).await? {
                Advance::Verified(_) | Advance::Unverified(_) => {
                    pages_visited += 1;
                }
                Advance::NoMorePages => {
                    info!("{}", self.messages.no_more_pages);
                    break Termination::NoMorePages;
                }
            }
        };

        Ok(RunSummary {
            processed,
            applied,
            skipped,
            already_applied,
            pages_visited,
            termination,
        })
    }

    /// Select the job card at `index` and read the details pane.
    async fn open_job(&self, index: usize, page_ids: &[String]) -> JobListing {
        self.scroll_results_list().await;

        let card = Candidate::css(selectors::job_card(index));
        click_resilient(self.driver, &[card], &self.timing).await;
        pause(self.timing.settle).await;

        let title_link = Candidate::css(selectors::JOB_TITLE_LINK);
        let title = self
            .driver
            .inner_text(&title_link)
            .await
            .ok()
            .flatten()
            .map(|t| t.trim().to_string());
        let link = self
            .driver
            .attribute(&title_link, "href")
            .await
            .ok()
            .flatten();
        let company = self
            .driver
            .inner_text(&Candidate::css(selectors::COMPANY_NAME))
            .await
            .ok()
            .flatten()
            .map(|c| c.trim().to_string());

        let job_id = page_ids.get(index).cloned().unwrap_or_else(|| {
            format!("page{}-slot{}", self.navigator.current_page(), index)
        });

        JobListing {
            job_id,
            title,
            company,
            link,
            index_on_page: index,
        }
    }

    fn record(&self, listing: &JobListing, status: OutcomeStatus) {
        self.report.append(ApplicationOutcome {
            job_id: listing.job_id.clone(),
            title: listing.title.clone().unwrap_or_default(),
            link: listing.link.clone().unwrap_or_default(),
            status,
        });
    }

    async fn read_total_jobs(&self) -> u32 {
        match self
            .driver
            .inner_text(&Candidate::css(selectors::TOTAL_RESULTS_SUBTITLE))
            .await
        {
            Ok(Some(text)) => parse_total(&text),
            _ => {
                warn!("could not read total job count, falling back to 0");
                0
            }
        }
    }

    async fn apply_limit_reached(&self) -> bool {
        match self
            .driver
            .inner_text(&Candidate::css(selectors::APPLY_LIMIT_BANNER))
            .await
        {
            Ok(Some(text)) => text.to_lowercase().contains("limit"),
            _ => false,
        }
    }

    async fn scroll_results_list(&self) {
        log::debug!("{}", self.messages.scrolling);
        let _ = self
            .driver
            .scroll_into_view(&Candidate::css(selectors::RESULTS_LIST))
            .await;
    }

    /// Walk pagination forward until the configured starting page. Failures
    /// degrade to starting from wherever we got.
    async fn advance_to_start_page(&mut self) {
        while self.navigator.current_page() < self.config.start_page {
            match self.navigator.advance(self.driver).await {
                Ok(Advance::Verified(n)) | Ok(Advance::Unverified(n)) => {
                    info!("moved to start page {n}");
                }
                Ok(Advance::NoMorePages) => {
                    warn!(
                        "ran out of pages at {} before start page {}",
                        self.navigator.current_page(),
                        self.config.start_page
                    );
                    break;
                }
                Err(e) => {
                    warn!("start-page navigation failed: {e}");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_separated_totals() {
        assert_eq!(parse_total("874 results"), 874);
        assert_eq!(parse_total("1,024 results"), 1024);
        assert_eq!(parse_total("5"), 5);
    }

    #[test]
    fn unparseable_total_is_zero() {
        assert_eq!(parse_total(""), 0);
        assert_eq!(parse_total("No results found"), 0);
    }
}
