//! Action primitives
//!
//! Thin, failure-tolerant wrappers over the page capability interface: clicks
//! that degrade instead of throwing, bounded cooperative waits, and the wait
//! budgets every component shares.

use crate::driver::{Candidate, PageDriver};
use crate::error::{BotError, Result};
use crate::locate::locate;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Wait budgets for all polling and settle delays.
///
/// Gathered here so integration tests can swap in millisecond values.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Bounded wait per locator candidate.
    pub locator_wait: Duration,
    /// Interval between condition probes.
    pub poll_interval: Duration,
    /// Settle delay before a click, after scrolling the target into view.
    pub settle: Duration,
    /// Pause between form/search steps.
    pub step_pause: Duration,
    /// Long settle after an unverified page advance.
    pub settle_long: Duration,
    /// Budget for verifying a page transition.
    pub page_verify: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            locator_wait: Duration::from_secs(5),
            poll_interval: Duration::from_millis(500),
            settle: Duration::from_secs(1),
            step_pause: Duration::from_secs(3),
            settle_long: Duration::from_secs(8),
            page_verify: Duration::from_secs(10),
        }
    }
}

impl Timing {
    /// Millisecond-scale budgets for tests.
    pub fn fast() -> Self {
        Self {
            locator_wait: Duration::from_millis(10),
            poll_interval: Duration::from_millis(1),
            settle: Duration::from_millis(1),
            step_pause: Duration::from_millis(1),
            settle_long: Duration::from_millis(2),
            page_verify: Duration::from_millis(10),
        }
    }
}

/// Cooperative polling loop. Probes until the closure yields a value or the
/// timeout expires; returns `None` on timeout. Never infinite.
pub async fn wait_for_condition<F, Fut, T>(
    mut probe: F,
    timeout: Duration,
    poll_interval: Duration,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = probe().await {
            return Some(value);
        }
        if Instant::now() >= deadline {
            return None;
        }
        sleep(poll_interval).await;
    }
}

/// Locate the target, scroll it to the viewport, settle, click.
///
/// If the native click fails or no candidate resolves, falls back to an
/// in-page click dispatch that bypasses visibility checks. Returns whether any
/// click was issued; never propagates an error to the caller.
pub async fn click_resilient(
    driver: &dyn PageDriver,
    candidates: &[Candidate],
    timing: &Timing,
) -> bool {
    if let Some(target) = locate(driver, candidates, timing).await {
        let _ = driver.scroll_into_view(&target).await;
        sleep(timing.settle).await;
        match driver.click(&target).await {
            Ok(()) => return true,
            Err(e) => {
                warn!(
                    "click on {} failed ({e}), dispatching in-page click",
                    target.describe()
                );
                return driver.click_dispatch(&target).await.unwrap_or(false);
            }
        }
    }

    // Nothing resolved within budget; a last low-fidelity attempt.
    for candidate in candidates {
        if driver.click_dispatch(candidate).await.unwrap_or(false) {
            debug!("dispatched click on unresolved {}", candidate.describe());
            return true;
        }
    }
    false
}

/// Type into a target that is required to exist. Absence is a caller error.
pub async fn type_into(
    driver: &dyn PageDriver,
    target: &Candidate,
    text: &str,
    timing: &Timing,
) -> Result<()> {
    let present = wait_for_condition(
        || async {
            match driver.is_present(target).await {
                Ok(true) => Some(()),
                _ => None,
            }
        },
        timing.locator_wait,
        timing.poll_interval,
    )
    .await;

    if present.is_none() {
        return Err(BotError::ElementNotFound(target.describe()));
    }
    driver.type_text(target, text).await
}

/// Fixed settle delay between steps.
pub async fn pause(duration: Duration) {
    sleep(duration).await;
}
