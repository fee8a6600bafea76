//! Selectors for the listings site.
//!
//! The remote page is third-party and undocumented; these are probed
//! selectors, most with fallbacks at the call sites. Kept in one place so the
//! inevitable breakage is a one-file fix.

/// Navigation entry that opens the jobs search surface.
pub const SEARCH_NAV_ITEM: &str = "#global-nav > div > nav > ul > li:nth-child(3)";

pub const KEYWORD_INPUT: &str = "[id^=\"jobs-search-box-keyword-id\"]";
pub const LOCATION_INPUT: &str = "[id^=\"jobs-search-box-location-id\"]";

/// Present only for signed-out visitors.
pub const GUEST_SIGN_IN_MARKER: &str =
    "[data-tracking-control-name=\"guest_homepage-basic_sign-in-button\"]";
pub const SESSION_KEY_INPUT: &str = "[name=\"session_key\"]";
pub const SESSION_PASSWORD_INPUT: &str = "[name=\"session_password\"]";

/// Easy-apply filter toggle, most-specific first.
pub const EASY_APPLY_FILTER_CANDIDATES: [&str; 4] = [
    "button[aria-label=\"Easy Apply filter\"]",
    "button[aria-label=\"Easy Apply filter.\"]",
    "[type=\"checkbox\"][name=\"f_LF\"]",
    ".search-reusables__filter-binary-toggle",
];

/// Trigger that opens the date-posted filter dropdown.
pub const DATE_FILTER_CANDIDATES: [&str; 6] = [
    "button[aria-label=\"Date posted filter\"]",
    "button[aria-label=\"Date posted filter.\"]",
    "[data-test-filters-time-filter-button]",
    "[aria-label*=\"Time filter\"]",
    "button.search-reusables__filter-pill",
    "button[aria-label*=\"date posted\"]",
];

/// "Past 24 hours" option inside the date-posted dropdown.
pub const PAST_DAY_CANDIDATES: [&str; 4] = [
    "[for=\"timePostedRange-r86400\"]",
    "input[value=\"r86400\"]",
    "[aria-label*=\"Past 24 hours\"]",
    "[type=\"radio\"][value=\"r86400\"]",
];

pub const SHOW_RESULTS_CANDIDATES: [&str; 4] = [
    "button.artdeco-button--primary",
    "button[data-test-filters-apply-button]",
    ".artdeco-modal__actionbar button:last-child",
    "button.search-reusables__secondary-filters-show-results-button",
];

pub const FILTER_PILL: &str = ".search-reusables__filter-pill";
pub const DATE_FILTER_URL_PARAM: &str = "f_TPR=r86400";

pub const WORKPLACE_FILTER_TRIGGER: &str = ".search-reusables__filter-list>li:nth-child(8)>div";
pub const WORKPLACE_SHOW_RESULTS: &str = ".search-reusables__filter-list>li:nth-child(8)>div>div>div>div>div>form>fieldset>div+hr+div>button+button";

pub const RESULTS_LIST: &str = "div.scaffold-layout__list > div > ul";
pub const JOB_CARD_CONTAINER: &str = ".job-card-container";
pub const TOTAL_RESULTS_SUBTITLE: &str = "[class*='jobs-search-results-list__subtitle']";

/// Card for the job at `index` on the current result page.
pub fn job_card(index: usize) -> String {
    format!("[class*='jobs-search-two-pane__job-card-container--viewport-tracking-{index}']>div")
}

pub const COMPANY_NAME: &str = ".job-details-jobs-unified-top-card__company-name>a";
pub const JOB_TITLE_LINK: &str = ".job-details-jobs-unified-top-card__job-title>h1>a";
pub const EASY_APPLY_BUTTON: &str = "[class*=jobs-apply-button]>button";
pub const APPLY_LIMIT_BANNER: &str = ".artdeco-inline-feedback__message";

/// Continue control of the "job search safety reminder" interstitial.
pub const SAFETY_REMINDER_CONTINUE: &str =
    "div[class=\"artdeco-modal__actionbar ember-view job-trust-pre-apply-safety-tips-modal__footer\"]>button+div>div>button";

/// Lone action button on the first application screen (submit or next).
pub const FORM_PRIMARY_ACTION: &str =
    "div[class=\"display-flex justify-flex-end ph5 pv4\"]>button";
/// Continue control on later screens (back + next pair).
pub const FORM_SECONDARY_ACTION: &str =
    "div[class=\"display-flex justify-flex-end ph5 pv4\"]>button + button";

/// Signature of the post-submit confirmation dialog.
pub const COMPLETION_MODAL: &str =
    "div[class*=\"artdeco-modal-overlay\"]>div>div+div>div>button>span";

pub const MODAL_DISMISS: &str =
    ".artdeco-modal__dismiss.artdeco-button.artdeco-button--circle.artdeco-button--muted.artdeco-button--2.artdeco-button--tertiary.ember-view";
pub const DISCARD_CONFIRM: &str = "[data-control-name=\"discard_application_confirm_btn\"]";

pub const PAGINATION: &str = ".artdeco-pagination";

/// Pagination control carrying the given accessible label.
pub fn pagination_button(aria_label: &str) -> String {
    format!("button[aria-label=\"{aria_label}\"]")
}
