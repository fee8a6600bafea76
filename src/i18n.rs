//! Localized log messages.
//!
//! Key→string tables embedded at compile time and selected by the configured
//! locale. Presentational only, with one exception: `affirmatives` feeds the
//! form field policy (which radio/select option counts as "yes").

use crate::error::{BotError, Result};
use serde::Deserialize;

const EN: &str = include_str!("../i18n/en.json");
const FR: &str = include_str!("../i18n/fr.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    pub app_title: String,
    pub scrolling: String,
    pub job_progress: String,
    pub apply_to: String,
    pub already_applied: String,
    pub skip_company: String,
    pub skip_title: String,
    pub job_skipped: String,
    pub limit_reached: String,
    pub end_of_run: String,
    pub no_more_pages: String,
    pub waiting: String,
    /// Lowercased tokens that mark an option as affirmative.
    pub affirmatives: Vec<String>,
}

pub fn load(locale: &str) -> Result<Messages> {
    let raw = match locale {
        "en" => EN,
        "fr" => FR,
        other => return Err(BotError::UnknownLocale(other.to_string())),
    };
    serde_json::from_str(raw)
        .map_err(|e| BotError::Other(format!("broken embedded locale table {locale}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_deserialize() {
        for locale in ["en", "fr"] {
            let messages = load(locale).unwrap();
            assert!(!messages.affirmatives.is_empty(), "{locale} affirmatives");
        }
    }

    #[test]
    fn unknown_locale_is_an_error() {
        assert!(matches!(load("xx"), Err(BotError::UnknownLocale(_))));
    }

    #[test]
    fn french_affirmative_is_oui() {
        let messages = load("fr").unwrap();
        assert!(messages.affirmatives.contains(&"oui".to_string()));
    }
}
