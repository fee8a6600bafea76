//! Chrome session
//!
//! Owns the browser process and the single page the whole run drives.
//! Acquire at start, release at end; an ephemeral profile directory is
//! removed on drop. Implements the `PageDriver` capability interface on top
//! of chromiumoxide.

use crate::driver::{Candidate, FormField, PageDriver};
use crate::error::{BotError, Result};
use crate::selectors;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Explicit Chrome executable; system discovery when absent.
    pub chrome_path: Option<String>,
    /// Persistent profile directory. A unique temp dir, removed on drop, is
    /// used when absent.
    pub user_data_dir: Option<PathBuf>,
    /// Extra window-size argument, e.g. "--window-size=1920,1080".
    pub window_arg: Option<String>,
    pub no_sandbox: bool,
}

pub struct ChromeSession {
    browser: Browser,
    page: Page,
    temp_dir: Option<PathBuf>,
}

impl ChromeSession {
    pub async fn launch(options: LaunchOptions) -> Result<Self> {
        let (profile_dir, temp_dir) = match &options.user_data_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    BotError::LaunchFailed(format!("cannot create profile dir: {e}"))
                })?;
                (dir.clone(), None)
            }
            None => {
                // Unique per instance so parallel sessions never share state.
                let unique_id = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map_err(|e| BotError::LaunchFailed(e.to_string()))?
                    .as_nanos();
                let dir = std::env::temp_dir().join(format!("easyapply-{unique_id}"));
                std::fs::create_dir_all(&dir).map_err(|e| {
                    BotError::LaunchFailed(format!("cannot create temp profile dir: {e}"))
                })?;
                (dir.clone(), Some(dir))
            }
        };

        let mut config = if options.headless {
            BrowserConfig::builder()
        } else {
            BrowserConfig::builder().with_head()
        };
        config = config.user_data_dir(&profile_dir);
        if options.no_sandbox {
            config = config.arg("--no-sandbox");
        }
        if let Some(window_arg) = &options.window_arg {
            config = config.arg(window_arg.clone());
        }
        if let Some(path) = &options.chrome_path {
            config = config.chrome_executable(path.clone());
        }

        let (browser, mut handler) = Browser::launch(
            config
                .build()
                .map_err(|e| BotError::LaunchFailed(e.to_string()))?,
        )
        .await
        .map_err(|e| {
            BotError::LaunchFailed(format!(
                "{e}. Chrome not found? Install it or set browserPath in config.json"
            ))
        })?;

        // Drain browser events for the lifetime of the session.
        tokio::spawn(async move {
            while (handler.next().await).is_some() {
                // Handle browser events
            }
        });

        // A fresh profile opens with a new-tab page; reuse the first real
        // page and close the rest so the session drives exactly one.
        let pages = browser
            .pages()
            .await
            .map_err(|e| BotError::LaunchFailed(e.to_string()))?;
        let page = match pages.first() {
            Some(page) => page.clone(),
            None => browser
                .new_page("about:blank")
                .await
                .map_err(|e| BotError::LaunchFailed(e.to_string()))?,
        };
        for extra in pages.iter().skip(1) {
            let _ = extra
                .execute(
                    chromiumoxide::cdp::browser_protocol::target::CloseTargetParams::new(
                        extra.target_id().clone(),
                    ),
                )
                .await;
        }

        Ok(Self {
            browser,
            page,
            temp_dir,
        })
    }

    /// Close the browser. Profile cleanup happens on drop.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| BotError::Other(e.to_string()))?;
        Ok(())
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> Result<T> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BotError::Other(format!("script execution failed: {e}")))?;
        result
            .into_value()
            .map_err(|e| BotError::Other(format!("script result mismatch: {e}")))
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(temp_dir) = &self.temp_dir {
            if temp_dir.exists() {
                let _ = std::fs::remove_dir_all(temp_dir);
            }
        }
    }
}

fn js_quote(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// JS expression resolving a candidate to an element or null.
fn js_find(target: &Candidate) -> String {
    match target {
        Candidate::Css(selector) => {
            format!("document.querySelector({})", js_quote(selector))
        }
        Candidate::Text { scope, needle } => format!(
            "(Array.from(document.querySelectorAll({})).find(el => (el.textContent || '').trim().toLowerCase().includes({})) || null)",
            js_quote(scope),
            js_quote(&needle.to_lowercase())
        ),
    }
}

fn field_selector(index: usize) -> String {
    format!("[data-ea-field=\"{index}\"]")
}

#[async_trait]
impl PageDriver for ChromeSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        let normalized = if url.contains("://") || url.starts_with("about:") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        debug!("navigating to {normalized}");

        let params = NavigateParams::builder()
            .url(&normalized)
            .build()
            .map_err(|e| BotError::NavigationFailed(format!("invalid URL {normalized}: {e}")))?;
        let response = self
            .page
            .execute(params)
            .await
            .map_err(|e| BotError::NavigationFailed(format!("{normalized}: {e}")))?;
        if let Some(error_text) = &response.result.error_text {
            return Err(BotError::NavigationFailed(format!(
                "{normalized}: {error_text}"
            )));
        }

        match tokio::time::timeout(Duration::from_secs(30), self.page.wait_for_navigation()).await
        {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("load wait failed for {normalized}: {e}"),
            Err(_) => {
                return Err(BotError::NavigationFailed(format!(
                    "timed out loading {normalized}"
                )))
            }
        }

        // Small delay for page state to stabilize.
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        self.page
            .url()
            .await
            .map_err(|e| BotError::Other(e.to_string()))?
            .ok_or(BotError::NoPage)
    }

    async fn is_present(&self, target: &Candidate) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; return !!(el && el.getClientRects().length > 0); }})()",
            js_find(target)
        ))
        .await
    }

    async fn click(&self, target: &Candidate) -> Result<()> {
        match target {
            Candidate::Css(selector) => {
                let element = self
                    .page
                    .find_element(selector.as_str())
                    .await
                    .map_err(|_| BotError::ElementNotFound(selector.clone()))?;
                element
                    .click()
                    .await
                    .map_err(|e| BotError::Other(format!("click failed: {e}")))?;
                Ok(())
            }
            // Text targets have no element handle; dispatch inside the page.
            Candidate::Text { .. } => {
                if self.click_dispatch(target).await? {
                    Ok(())
                } else {
                    Err(BotError::ElementNotFound(target.describe()))
                }
            }
        }
    }

    async fn click_dispatch(&self, target: &Candidate) -> Result<bool> {
        self.eval(format!(
            "(() => {{ const el = {}; if (el) {{ el.click(); return true; }} return false; }})()",
            js_find(target)
        ))
        .await
    }

    async fn scroll_into_view(&self, target: &Candidate) -> Result<()> {
        self.eval::<bool>(format!(
            "(() => {{ const el = {}; if (el) {{ el.scrollIntoView({{ behavior: 'smooth', block: 'center' }}); return true; }} return false; }})()",
            js_find(target)
        ))
        .await?;
        Ok(())
    }

    async fn type_text(&self, target: &Candidate, text: &str) -> Result<()> {
        match target {
            Candidate::Css(selector) => {
                let element = self
                    .page
                    .find_element(selector.as_str())
                    .await
                    .map_err(|_| BotError::ElementNotFound(selector.clone()))?;
                element
                    .click()
                    .await
                    .map_err(|e| BotError::Other(format!("focus failed: {e}")))?;
                element
                    .type_str(text)
                    .await
                    .map_err(|e| BotError::Other(format!("typing failed: {e}")))?;
                Ok(())
            }
            Candidate::Text { .. } => Err(BotError::Other(
                "typing into text-matched targets is not supported".to_string(),
            )),
        }
    }

    async fn clear_value(&self, target: &Candidate) -> Result<()> {
        self.eval::<bool>(format!(
            "(() => {{ const el = {}; if (!el) return false; el.value = ''; el.dispatchEvent(new Event('input', {{ bubbles: true }})); return true; }})()",
            js_find(target)
        ))
        .await?;
        Ok(())
    }

    async fn press_enter(&self, target: &Candidate) -> Result<()> {
        match target {
            Candidate::Css(selector) => {
                let element = self
                    .page
                    .find_element(selector.as_str())
                    .await
                    .map_err(|_| BotError::ElementNotFound(selector.clone()))?;
                element
                    .press_key("Enter")
                    .await
                    .map_err(|e| BotError::Other(format!("key press failed: {e}")))?;
                Ok(())
            }
            Candidate::Text { .. } => Err(BotError::Other(
                "key presses on text-matched targets are not supported".to_string(),
            )),
        }
    }

    async fn inner_text(&self, target: &Candidate) -> Result<Option<String>> {
        self.eval(format!(
            "(() => {{ const el = {}; return el ? (el.innerText || el.textContent) : null; }})()",
            js_find(target)
        ))
        .await
    }

    async fn attribute(&self, target: &Candidate, name: &str) -> Result<Option<String>> {
        // `href` goes through the property to get the absolute URL.
        let accessor = if name == "href" {
            "el.href".to_string()
        } else {
            format!("el.getAttribute({})", js_quote(name))
        };
        self.eval(format!(
            "(() => {{ const el = {}; return el ? ({accessor} || null) : null; }})()",
            js_find(target)
        ))
        .await
    }

    async fn job_ids_on_page(&self) -> Result<Vec<String>> {
        self.eval(format!(
            "Array.from(document.querySelectorAll({})).map(c => c.getAttribute('data-job-id')).filter(id => id)",
            js_quote(selectors::JOB_CARD_CONTAINER)
        ))
        .await
    }

    async fn next_control_from_indicator(&self) -> Result<Option<String>> {
        self.eval(
            r#"(() => {
                const items = document.querySelectorAll('.artdeco-pagination__pages .artdeco-pagination__indicator');
                const active = Array.from(items).find(item => item.classList.contains('active'));
                if (active) {
                    const next = active.nextElementSibling;
                    if (next && next.tagName === 'LI') {
                        const btn = next.querySelector('button');
                        if (btn && !btn.disabled) return btn.getAttribute('aria-label');
                    }
                }
                return null;
            })()"#
                .to_string(),
        )
        .await
    }

    async fn next_control_from_sibling(&self) -> Result<Option<String>> {
        self.eval(
            r#"(() => {
                const active = document.querySelector('.artdeco-pagination__indicator--number.active');
                if (active && active.parentElement) {
                    const sibling = active.parentElement.nextElementSibling;
                    if (sibling) {
                        const btn = sibling.querySelector('button');
                        if (btn && !btn.disabled) return btn.getAttribute('aria-label');
                    }
                }
                return null;
            })()"#
                .to_string(),
        )
        .await
    }

    async fn active_page_number(&self) -> Result<Option<u32>> {
        self.eval(
            r#"(() => {
                const active = document.querySelector('.artdeco-pagination__indicator--active')
                    || document.querySelector('.artdeco-pagination__indicator--number.active');
                if (!active) return null;
                const n = parseInt(active.textContent.trim(), 10);
                return Number.isNaN(n) ? null : n;
            })()"#
                .to_string(),
        )
        .await
    }

    async fn enumerate_fields(&self) -> Result<Vec<FormField>> {
        // Tags each control with a data attribute so the fill calls below can
        // address it without re-running the scan.
        self.eval(
            r#"(() => {
                const fields = [];
                let idx = 0;
                const describe = (el) => {
                    const label = el.labels && el.labels[0] ? el.labels[0].textContent : '';
                    const placeholder = el.placeholder || '';
                    const aria = el.getAttribute('aria-label') || '';
                    return (label + ' ' + placeholder + ' ' + aria).toLowerCase().trim();
                };
                document.querySelectorAll('input[type="radio"]').forEach(el => {
                    el.setAttribute('data-ea-field', idx);
                    fields.push({ index: idx++, kind: 'radio', label: describe(el), options: [] });
                });
                document.querySelectorAll('select').forEach(el => {
                    el.setAttribute('data-ea-field', idx);
                    const options = Array.from(el.options).map(o => o.text);
                    fields.push({ index: idx++, kind: 'select', label: describe(el), options });
                });
                document.querySelectorAll('input[type="text"], input[type="number"]').forEach(el => {
                    el.setAttribute('data-ea-field', idx);
                    const kind = el.type === 'number' ? 'number' : 'text';
                    fields.push({ index: idx++, kind, label: describe(el), options: [] });
                });
                return fields;
            })()"#
                .to_string(),
        )
        .await
    }

    async fn set_field_value(&self, index: usize, value: &str) -> Result<()> {
        // Native value setter plus input/change events, otherwise the page's
        // own framework never sees the edit.
        let found: bool = self
            .eval(format!(
                r#"(() => {{
                    const el = document.querySelector({sel});
                    if (!el) return false;
                    const setter = Object.getOwnPropertyDescriptor(window.HTMLInputElement.prototype, 'value').set;
                    setter.call(el, {value});
                    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }})()"#,
                sel = js_quote(&field_selector(index)),
                value = js_quote(value)
            ))
            .await?;
        if found {
            Ok(())
        } else {
            Err(BotError::ElementNotFound(field_selector(index)))
        }
    }

    async fn select_option(&self, field: usize, option: usize) -> Result<()> {
        let found: bool = self
            .eval(format!(
                r#"(() => {{
                    const el = document.querySelector({sel});
                    if (!el || !el.options || !el.options[{option}]) return false;
                    el.value = el.options[{option}].value;
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }})()"#,
                sel = js_quote(&field_selector(field)),
            ))
            .await?;
        if found {
            Ok(())
        } else {
            Err(BotError::ElementNotFound(field_selector(field)))
        }
    }

    async fn click_radio(&self, index: usize) -> Result<()> {
        let found: bool = self
            .eval(format!(
                "(() => {{ const el = document.querySelector({}); if (el) {{ el.click(); return true; }} return false; }})()",
                js_quote(&field_selector(index))
            ))
            .await?;
        if found {
            Ok(())
        } else {
            Err(BotError::ElementNotFound(field_selector(index)))
        }
    }
}
