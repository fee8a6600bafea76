//! Seen-job tracking across result pages.
//!
//! The set only detects stalls (a "next page" that serves the same jobs
//! again); it never excludes a job from processing.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct SeenJobs {
    ids: HashSet<String>,
}

impl SeenJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the identifiers visible on the current page and return how many
    /// were new. Zero new identifiers means the page did not actually advance.
    pub fn merge_page(&mut self, ids: &[String]) -> usize {
        let mut new = 0;
        for id in ids {
            if self.ids.insert(id.clone()) {
                new += 1;
            }
        }
        new
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
