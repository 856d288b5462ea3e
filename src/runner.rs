//! Group-aware test runner
//!
//! [`GroupRunner`] sits in front of a host [`TestRunner`]: it publishes one
//! flag per active group, narrows the candidate list with the run's
//! selectors, and hands what is left to the host.

use crate::config::SelectionConfig;
use crate::error::{AppError, AppResult};
use crate::metadata::{DocblockExtractor, MetadataExtractor, tag_list};
use crate::selector::{SelectorSet, TestFilter};
use std::path::{Path, PathBuf};

/// Default metadata key holding tags
pub const DEFAULT_TAG_KEY: &str = "group";
/// Default prefix for published group flags
pub const DEFAULT_ENV_PREFIX: &str = "JEST_GROUP_";
/// Value every published group flag is set to
pub const FLAG_VALUE: &str = "1";

/// A test the host runner may execute
pub trait TestCandidate {
    /// Path of the test's source file
    fn path(&self) -> &Path;
}

impl TestCandidate for PathBuf {
    fn path(&self) -> &Path {
        self
    }
}

/// The host runner that executes the selected tests
pub trait TestRunner<T> {
    type Output;

    /// Run `tests`, in the order given
    fn run_tests(&mut self, tests: Vec<T>) -> AppResult<Self::Output>;
}

/// Host runner that executes nothing and returns the selection as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRunner;

impl<T> TestRunner<T> for ListRunner {
    type Output = Vec<T>;

    fn run_tests(&mut self, tests: Vec<T>) -> AppResult<Vec<T>> {
        Ok(tests)
    }
}

/// Destination for group flags
pub trait FlagSink {
    fn publish(&mut self, name: &str, value: &str);
}

/// Publishes group flags into the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSink;

impl FlagSink for EnvSink {
    fn publish(&mut self, name: &str, value: &str) {
        // SAFETY: flags are written once, before the host runner starts any
        // test, while selection is still single-threaded.
        unsafe { std::env::set_var(name, value) };
    }
}

/// Keeps published group flags in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    flags: Vec<(String, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags published so far, in publication order
    pub fn flags(&self) -> &[(String, String)] {
        &self.flags
    }
}

impl FlagSink for RecordingSink {
    fn publish(&mut self, name: &str, value: &str) {
        self.flags.push((name.to_string(), value.to_string()));
    }
}

/// Build the flag name for `group`
///
/// ASCII letters, digits and `_` are kept and upper-cased. Every other
/// character becomes one `_` per UTF-16 code unit, so characters outside the
/// Basic Multilingual Plane (most emoji) become `__`. Names therefore agree
/// with flags computed by JavaScript test bodies.
pub fn flag_name(prefix: &str, group: &str) -> String {
    let mut name = String::with_capacity(prefix.len() + group.len());
    name.push_str(prefix);
    for c in group.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c.to_ascii_uppercase());
        } else {
            name.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    name
}

/// Flags describing which groups a run selected
///
/// One name per included group that is not also excluded verbatim. Names are
/// unique and in the order their groups were first given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFlags {
    names: Vec<String>,
}

impl GroupFlags {
    /// Flag names, in selection order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the flag `name` is set
    pub fn is_set(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Compute the flags for a selector set
pub fn group_flags(selectors: &SelectorSet, prefix: &str) -> GroupFlags {
    let mut names: Vec<String> = Vec::new();

    for group in &selectors.include_groups {
        if selectors.exclude_groups.contains(group) {
            continue;
        }
        let name = flag_name(prefix, group);
        if !names.contains(&name) {
            names.push(name);
        }
    }

    GroupFlags { names }
}

/// Test runner front end that applies group and regex selection
pub struct GroupRunner<E = DocblockExtractor, S = EnvSink> {
    selectors: SelectorSet,
    filter: TestFilter,
    extractor: E,
    sink: S,
    tag_key: String,
    env_prefix: String,
    published: bool,
}

impl<E: MetadataExtractor, S: FlagSink> GroupRunner<E, S> {
    /// Create a runner for one run's selectors
    ///
    /// # Errors
    /// Returns `AppError::InvalidRegex` if a `--regex=` pattern does not compile.
    pub fn new(selectors: SelectorSet, extractor: E, sink: S) -> AppResult<Self> {
        let filter = TestFilter::new(&selectors)?;
        Ok(Self {
            selectors,
            filter,
            extractor,
            sink,
            tag_key: DEFAULT_TAG_KEY.to_string(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            published: false,
        })
    }

    /// Create a runner using the tag key and flag prefix from configuration
    pub fn from_config(
        selectors: SelectorSet,
        config: &SelectionConfig,
        extractor: E,
        sink: S,
    ) -> AppResult<Self> {
        Ok(Self::new(selectors, extractor, sink)?
            .with_tag_key(config.tag_key())
            .with_env_prefix(config.env_prefix()))
    }

    /// Set the metadata key holding tags
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }

    /// Set the prefix for published group flags
    pub fn with_env_prefix(mut self, env_prefix: impl Into<String>) -> Self {
        self.env_prefix = env_prefix.into();
        self
    }

    /// Selectors this runner applies
    pub fn selectors(&self) -> &SelectorSet {
        &self.selectors
    }

    /// Flag sink this runner publishes to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Flags for this run's selection
    pub fn flags(&self) -> GroupFlags {
        group_flags(&self.selectors, &self.env_prefix)
    }

    /// Publish group flags to the sink
    ///
    /// Flags are published once per runner; later calls do nothing.
    pub fn publish_flags(&mut self) {
        if self.published {
            return;
        }
        self.published = true;

        for name in self.flags().names() {
            tracing::debug!(flag = %name, "Publishing group flag");
            self.sink.publish(name, FLAG_VALUE);
        }
    }

    /// Tags of the test file at `path`
    ///
    /// # Errors
    /// Returns `AppError::TestFileRead` if the file cannot be read.
    pub fn tags_for(&self, path: &Path) -> AppResult<Vec<String>> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppError::TestFileRead {
            path: path.display().to_string(),
            source,
        })?;
        let metadata = self.extractor.extract(&contents);
        Ok(tag_list(&metadata, &self.tag_key))
    }

    /// Decide whether the test at `path` is kept
    pub fn filter_test<T: TestCandidate>(&self, test: &T) -> AppResult<bool> {
        let tags = self.tags_for(test.path())?;
        Ok(self.filter.keep(&tags))
    }

    /// Narrow `candidates` to the tests this run selects, keeping their order
    ///
    /// Without any selector every candidate is returned and no file is read.
    ///
    /// # Errors
    /// Returns `AppError::TestFileRead` for the first unreadable candidate.
    pub fn select<T: TestCandidate>(&self, candidates: Vec<T>) -> AppResult<Vec<T>> {
        let total = candidates.len();

        if self.selectors.is_empty() {
            tracing::debug!(total, "No selectors given, running all tests");
            return Ok(candidates);
        }

        let mut selected = Vec::with_capacity(total);
        for candidate in candidates {
            if self.filter_test(&candidate)? {
                selected.push(candidate);
            } else {
                tracing::trace!(path = %candidate.path().display(), "Test not selected");
            }
        }

        tracing::info!(selected = selected.len(), total, "Applied group selection");
        Ok(selected)
    }

    /// Publish flags, select tests, and run them on `host`
    pub fn run_tests<T, R>(&mut self, candidates: Vec<T>, host: &mut R) -> AppResult<R::Output>
    where
        T: TestCandidate,
        R: TestRunner<T>,
    {
        self.publish_flags();
        let selected = self.select(candidates)?;
        host.run_tests(selected)
    }
}
