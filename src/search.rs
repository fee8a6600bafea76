//! Search and filter phase
//!
//! Runs once before the page loop: keywords, location, the easy-apply toggle,
//! the date-posted filter and the workplace-type filter. Every step here is
//! best-effort; a filter that cannot be applied is logged and the run
//! continues with whatever results are shown.

use crate::actions::{click_resilient, pause, type_into, Timing};
use crate::config::Config;
use crate::driver::{Candidate, PageDriver};
use crate::error::Result;
use crate::locate::{css_chain, locate};
use crate::selectors;
use log::{info, warn};

pub async fn filter_and_search(
    driver: &dyn PageDriver,
    config: &Config,
    timing: &Timing,
) -> Result<()> {
    filter_by_keywords(driver, config, timing).await?;
    pause(timing.settle).await;

    filter_by_location(driver, config, timing).await?;
    pause(timing.step_pause).await;

    if let Err(e) = easy_apply_filter(driver, timing).await {
        warn!("easy-apply filter failed, continuing without it: {e}");
    }
    pause(timing.settle).await;

    if let Err(e) = filter_by_time(driver, timing).await {
        warn!("date-posted filter failed, continuing without it: {e}");
    }
    pause(timing.step_pause).await;

    if !config.workplace_types.is_empty() {
        if let Err(e) = filter_by_workplace_type(driver, config, timing).await {
            warn!("workplace-type filter failed, continuing without it: {e}");
        }
        pause(timing.step_pause).await;
    }

    Ok(())
}

async fn filter_by_keywords(
    driver: &dyn PageDriver,
    config: &Config,
    timing: &Timing,
) -> Result<()> {
    click_resilient(
        driver,
        &[Candidate::css(selectors::SEARCH_NAV_ITEM)],
        timing,
    )
    .await;
    pause(timing.step_pause).await;

    let keyword_input = Candidate::css(selectors::KEYWORD_INPUT);
    type_into(driver, &keyword_input, &config.search_query(), timing).await
}

async fn filter_by_location(
    driver: &dyn PageDriver,
    config: &Config,
    timing: &Timing,
) -> Result<()> {
    let location_input = Candidate::css(selectors::LOCATION_INPUT);
    // The box arrives pre-filled with a suggested location.
    let _ = driver.clear_value(&location_input).await;
    type_into(driver, &location_input, &config.location, timing).await?;
    driver.press_enter(&location_input).await
}

/// Toggle the easy-apply filter. Absence of every candidate is fine, some
/// result layouts simply don't render it.
async fn easy_apply_filter(driver: &dyn PageDriver, timing: &Timing) -> Result<()> {
    let candidates = css_chain(&selectors::EASY_APPLY_FILTER_CANDIDATES);
    match locate(driver, &candidates, timing).await {
        Some(target) => {
            click_resilient(driver, &[target], timing).await;
            pause(timing.step_pause).await;
        }
        None => info!("easy-apply filter not found, continuing without it"),
    }
    Ok(())
}

/// Restrict results to the past 24 hours and verify the filter stuck.
async fn filter_by_time(driver: &dyn PageDriver, timing: &Timing) -> Result<()> {
    pause(timing.step_pause).await;

    // Open the dropdown: selector chain first, then a text-content fallback.
    let mut opened = click_resilient(
        driver,
        &css_chain(&selectors::DATE_FILTER_CANDIDATES),
        timing,
    )
    .await;
    if !opened {
        opened = driver
            .click_dispatch(&Candidate::text("button", "date posted"))
            .await
            .unwrap_or(false);
    }
    if !opened {
        warn!("date-posted dropdown did not open");
    }
    pause(timing.step_pause).await;

    // Pick "past 24 hours": text match first, attribute fallbacks after.
    let picked = driver
        .click_dispatch(&Candidate::text(".artdeco-button__text", "past 24 hours"))
        .await
        .unwrap_or(false)
        || driver
            .click_dispatch(&Candidate::text(".artdeco-button__text", "past day"))
            .await
            .unwrap_or(false);
    if !picked {
        click_resilient(driver, &css_chain(&selectors::PAST_DAY_CANDIDATES), timing).await;
    }
    pause(timing.step_pause).await;

    click_resilient(
        driver,
        &css_chain(&selectors::SHOW_RESULTS_CANDIDATES),
        timing,
    )
    .await;
    pause(timing.step_pause).await;

    // Verify via the filter pill or the URL parameter.
    let pill = driver
        .is_present(&Candidate::text(selectors::FILTER_PILL, "24"))
        .await
        .unwrap_or(false);
    let url_param = driver
        .current_url()
        .await
        .map(|url| url.contains(selectors::DATE_FILTER_URL_PARAM))
        .unwrap_or(false);
    if !pill && !url_param {
        warn!("date filter not confirmed, proceeding with available results");
    }
    Ok(())
}

async fn filter_by_workplace_type(
    driver: &dyn PageDriver,
    config: &Config,
    timing: &Timing,
) -> Result<()> {
    click_resilient(
        driver,
        &[Candidate::css(selectors::WORKPLACE_FILTER_TRIGGER)],
        timing,
    )
    .await;
    pause(timing.step_pause).await;

    for selector in &config.workplace_types {
        click_resilient(driver, &[Candidate::css(selector.clone())], timing).await;
    }
    pause(timing.step_pause).await;

    click_resilient(
        driver,
        &[Candidate::css(selectors::WORKPLACE_SHOW_RESULTS)],
        timing,
    )
    .await;
    Ok(())
}
