//! Test filter
//!
//! Decides whether a single test is kept, given its tag list and the run's
//! selectors. Pure CPU logic: the same tags and selectors always give the
//! same decision.
//!
//! # Precedence
//! 1. Exclusion (prefix or regex) vetoes the test and stops the tag scan.
//! 2. A missing mandatory tag drops the test.
//! 3. An inclusion match (prefix or regex) keeps the test.
//! 4. Otherwise the test is kept only when no inclusion selector exists.

use super::SelectorSet;
use crate::error::{AppError, AppResult};
use regex::Regex;

/// Selector set with its regex patterns compiled
///
/// Build once per run; [`TestFilter::keep`] can then be applied to every
/// candidate without recompiling patterns.
#[derive(Debug, Clone)]
pub struct TestFilter {
    include_groups: Vec<String>,
    must_include_groups: Vec<String>,
    exclude_groups: Vec<String>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl TestFilter {
    /// Compile a selector set into a filter
    ///
    /// # Errors
    /// Returns `AppError::InvalidRegex` for the first pattern that fails to
    /// compile. A bad pattern is a configuration error and aborts the run.
    pub fn new(selectors: &SelectorSet) -> AppResult<Self> {
        Ok(Self {
            include_groups: selectors.include_groups.clone(),
            must_include_groups: selectors.must_include_groups.clone(),
            exclude_groups: selectors.exclude_groups.clone(),
            include_regexes: compile_all(&selectors.include_regexes)?,
            exclude_regexes: compile_all(&selectors.exclude_regexes)?,
        })
    }

    /// Decide whether a test carrying `tags` is kept
    pub fn keep<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        let mut keep = self.include_groups.is_empty() && self.include_regexes.is_empty();

        if tags.is_empty() {
            // A test without tags can never carry a mandatory tag.
            return keep && self.must_include_groups.is_empty();
        }

        for tag in tags {
            let tag = tag.as_ref();

            if self.exclude_groups.iter().any(|g| tag.starts_with(g.as_str())) {
                return false;
            }

            if self.exclude_regexes.iter().any(|r| r.is_match(tag)) {
                return false;
            }

            if self.include_groups.iter().any(|g| tag.starts_with(g.as_str()))
                || self.include_regexes.iter().any(|r| r.is_match(tag))
            {
                keep = true;
            }
        }

        // Mandatory tags are checked after the scan, by exact membership.
        if self
            .must_include_groups
            .iter()
            .any(|required| !tags.iter().any(|t| t.as_ref() == required))
        {
            keep = false;
        }

        keep
    }
}

fn compile_all(patterns: &[String]) -> AppResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| AppError::InvalidRegex {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Decide whether a test carrying `tags` is kept under `selectors`
///
/// Convenience form that compiles the selectors on every call. Prefer
/// [`TestFilter`] when filtering more than one test.
pub fn filter_test<S: AsRef<str>>(selectors: &SelectorSet, tags: &[S]) -> AppResult<bool> {
    Ok(TestFilter::new(selectors)?.keep(tags))
}
