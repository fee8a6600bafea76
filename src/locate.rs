//! Element locator
//!
//! Resolves a logical UI target by trying an ordered list of candidate
//! strategies until one is present. Absence is a valid outcome: the target may
//! legitimately not exist for a given page or job variant, so exhaustion
//! returns `None` rather than an error. No retries beyond the per-candidate
//! wait, no backoff.

use crate::actions::{wait_for_condition, Timing};
use crate::driver::{Candidate, PageDriver};
use log::debug;

/// Try each candidate in order with a bounded wait; return the first that
/// resolves to a rendered element.
pub async fn locate(
    driver: &dyn PageDriver,
    candidates: &[Candidate],
    timing: &Timing,
) -> Option<Candidate> {
    for candidate in candidates {
        let found = wait_for_condition(
            || async {
                match driver.is_present(candidate).await {
                    Ok(true) => Some(()),
                    // Errors and absence both mean "keep waiting".
                    _ => None,
                }
            },
            timing.locator_wait,
            timing.poll_interval,
        )
        .await;

        if found.is_some() {
            debug!("located {}", candidate.describe());
            return Some(candidate.clone());
        }
    }
    None
}

/// Convenience for building a candidate list out of plain CSS selectors.
pub fn css_chain(selectors: &[&str]) -> Vec<Candidate> {
    selectors.iter().map(|s| Candidate::css(*s)).collect()
}
