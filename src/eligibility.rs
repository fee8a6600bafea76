//! Job eligibility filter
//!
//! Pre-application decision to skip a job based on company and title
//! exclusion rules. Company matching is a case-insensitive substring check;
//! title matching is whole-word, so "Java" rejects "Senior Java Engineer" but
//! not "Javascript Engineer". Absent company/title means "unknown", which
//! never rejects.

use crate::error::{BotError, Result};
use regex::Regex;

/// Outcome of the pre-application check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Eligible,
    /// Company name contained this excluded substring.
    ExcludedCompany(String),
    /// Title matched this excluded pattern as a whole word.
    ExcludedTitle(String),
}

#[derive(Debug)]
pub struct EligibilityFilter {
    companies: Vec<String>,
    title_pattern: Option<Regex>,
    raw_titles: Vec<String>,
}

impl EligibilityFilter {
    pub fn new(avoid_companies: &[String], avoid_titles: &[String]) -> Result<Self> {
        let companies = avoid_companies
            .iter()
            .map(|c| c.to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        let raw_titles: Vec<String> = avoid_titles
            .iter()
            .filter(|t| !t.is_empty())
            .cloned()
            .collect();

        let title_pattern = if raw_titles.is_empty() {
            None
        } else {
            let alternatives = raw_titles
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            // Word boundary on the left; on the right either end-of-input or a
            // non-alphanumeric character, so "Java" does not match inside
            // "Javascript" but does match "Java/Kotlin".
            let pattern = format!(r"(?i)\b(?:{alternatives})(?:[^A-Za-z0-9]|$)");
            Some(
                Regex::new(&pattern)
                    .map_err(|e| BotError::InvalidConfig(format!("bad title pattern: {e}")))?,
            )
        };

        Ok(Self {
            companies,
            title_pattern,
            raw_titles,
        })
    }

    /// Decide before any form interaction. `None` inputs are unknown, not
    /// failing.
    pub fn decide(&self, company: Option<&str>, title: Option<&str>) -> Verdict {
        if let Some(company) = company {
            let lowered = company.to_lowercase();
            for excluded in &self.companies {
                if lowered.contains(excluded) {
                    return Verdict::ExcludedCompany(excluded.clone());
                }
            }
        }

        if let (Some(title), Some(pattern)) = (title, &self.title_pattern) {
            if pattern.is_match(title) {
                let hit = self
                    .raw_titles
                    .iter()
                    .find(|t| {
                        title.to_lowercase().contains(&t.to_lowercase())
                    })
                    .cloned()
                    .unwrap_or_else(|| title.to_string());
                return Verdict::ExcludedTitle(hit);
            }
        }

        Verdict::Eligible
    }
}
