//! Result page navigator
//!
//! Advances through paginated results and verifies that the page actually
//! changed. Discovery tries the indicator-adjacency lookup first, then the
//! looser sibling fallback. When verification times out the navigator clicks
//! once more in-page, waits a long fixed settle, and advances the cursor
//! anyway: forward progress over strict verification. The deduplication
//! tracker upstream catches the case where that optimism was wrong.

use crate::actions::{pause, wait_for_condition, Timing};
use crate::driver::{Candidate, PageDriver};
use crate::error::Result;
use crate::selectors;
use log::{debug, info, warn};

/// Outcome of one advance attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The active indicator confirmed the new page number.
    Verified(u32),
    /// Verification timed out; cursor advanced optimistically.
    Unverified(u32),
    /// No enabled next control exists. Terminal.
    NoMorePages,
}

#[derive(Debug)]
pub struct PageNavigator {
    current_page: u32,
    timing: Timing,
}

impl PageNavigator {
    pub fn new(start_page: u32, timing: Timing) -> Self {
        Self {
            current_page: start_page.max(1),
            timing,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Find the next-page control, click it, and verify the transition.
    pub async fn advance(&mut self, driver: &dyn PageDriver) -> Result<Advance> {
        let label = match self.find_next_control(driver).await {
            Some(label) => label,
            None => return Ok(Advance::NoMorePages),
        };
        debug!("next page control: {label}");

        let target = Candidate::css(selectors::pagination_button(&label));
        let _ = driver
            .scroll_into_view(&Candidate::css(selectors::PAGINATION))
            .await;
        pause(self.timing.settle).await;

        if driver.click(&target).await.is_err() {
            let _ = driver.click_dispatch(&target).await;
        }

        let expected = self.current_page + 1;
        let verified = wait_for_condition(
            || async {
                match driver.active_page_number().await {
                    Ok(Some(n)) if n == expected => Some(()),
                    _ => None,
                }
            },
            self.timing.page_verify,
            self.timing.poll_interval,
        )
        .await;

        if verified.is_some() {
            self.current_page = expected;
            info!("advanced to page {expected}");
            return Ok(Advance::Verified(expected));
        }

        // Degraded recovery: one more in-page click, a long settle, and an
        // optimistic cursor advance. The cursor may now disagree with the
        // displayed page; the stall detector upstream bounds the damage.
        warn!("page transition to {expected} not verified, advancing optimistically");
        let _ = driver.click_dispatch(&target).await;
        pause(self.timing.settle_long).await;
        self.current_page = expected;
        Ok(Advance::Unverified(expected))
    }

    /// Two independent strategies for the enabled next control.
    async fn find_next_control(&self, driver: &dyn PageDriver) -> Option<String> {
        if let Ok(Some(label)) = driver.next_control_from_indicator().await {
            return Some(label);
        }
        match driver.next_control_from_sibling().await {
            Ok(label) => label,
            Err(e) => {
                warn!("next control lookup failed: {e}");
                None
            }
        }
    }
}
