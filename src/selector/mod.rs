//! Selector parsing for group-runner
//!
//! Turns `--group=` and `--regex=` command-line flags into a [`SelectorSet`].
//! Everything else on the command line belongs to the host runner and is ignored.

pub mod filter;

pub use filter::{TestFilter, filter_test};

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;

/// Flag selecting tests by tag prefix
pub const GROUP_FLAG: &str = "--group=";
/// Flag selecting tests by tag regular expression
pub const REGEX_FLAG: &str = "--regex=";

/// Structured form of every selector flag given for one run
///
/// Each category keeps the order in which flags appeared, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSet {
    /// Prefixes that mark a matching tag for inclusion (`--group=name`)
    pub include_groups: Vec<String>,
    /// Tags that must all be present verbatim (`--group=!name`)
    pub must_include_groups: Vec<String>,
    /// Prefixes that veto a matching tag (`--group=-name`)
    pub exclude_groups: Vec<String>,
    /// Patterns that mark a matching tag for inclusion (`--regex=pattern`)
    pub include_regexes: Vec<String>,
    /// Patterns that veto a matching tag (`--regex=-pattern`)
    pub exclude_regexes: Vec<String>,
}

impl SelectorSet {
    /// Parse selectors out of a full argument list
    ///
    /// # Classification
    /// - `--group=-x` → `exclude_groups`
    /// - `--group=!x` → `must_include_groups`
    /// - `--group=x` → `include_groups`
    /// - `--regex=-x` → `exclude_regexes`
    /// - `--regex=x` → `include_regexes` (`!` has no meaning for regexes)
    ///
    /// Only the first sigil is stripped, so `--group=--x` excludes `-x`.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selectors = Self::default();

        for arg in args {
            let arg = arg.as_ref();
            if let Some(token) = arg.strip_prefix(GROUP_FLAG) {
                if let Some(group) = token.strip_prefix('-') {
                    selectors.exclude_groups.push(group.to_string());
                } else if let Some(group) = token.strip_prefix('!') {
                    selectors.must_include_groups.push(group.to_string());
                } else {
                    selectors.include_groups.push(token.to_string());
                }
            } else if let Some(token) = arg.strip_prefix(REGEX_FLAG) {
                if let Some(pattern) = token.strip_prefix('-') {
                    selectors.exclude_regexes.push(pattern.to_string());
                } else {
                    selectors.include_regexes.push(token.to_string());
                }
            }
        }

        tracing::debug!(
            include_groups = selectors.include_groups.len(),
            must_include_groups = selectors.must_include_groups.len(),
            exclude_groups = selectors.exclude_groups.len(),
            include_regexes = selectors.include_regexes.len(),
            exclude_regexes = selectors.exclude_regexes.len(),
            "Parsed selectors"
        );

        selectors
    }

    /// Parse selectors out of an OS argument list, such as `std::env::args_os()`
    ///
    /// Arguments that are not valid UTF-8 are converted lossily. Selector flags
    /// are ASCII, so conversion never changes how an argument is classified.
    pub fn parse_os<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Self::parse(
            args.into_iter()
                .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
        )
    }

    /// True when no selector of any kind was given
    ///
    /// An empty set keeps every test, so callers can skip reading test files.
    pub fn is_empty(&self) -> bool {
        self.include_groups.is_empty()
            && self.must_include_groups.is_empty()
            && self.exclude_groups.is_empty()
            && self.include_regexes.is_empty()
            && self.exclude_regexes.is_empty()
    }

    /// True when any positive selector (group or regex) is configured
    ///
    /// A positive selector flips the default decision from keep to drop.
    pub fn has_inclusions(&self) -> bool {
        !self.include_groups.is_empty() || !self.include_regexes.is_empty()
    }
}

/// Parse selectors from an argument list
///
/// Free-function form of [`SelectorSet::parse`].
pub fn get_groups<I, S>(args: I) -> SelectorSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SelectorSet::parse(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_includes() {
        let groups = get_groups(["--group=include/me", "--group=include/me2"]);
        assert_eq!(groups.include_groups, strings(&["include/me", "include/me2"]));
        assert!(groups.exclude_groups.is_empty());
        assert!(groups.must_include_groups.is_empty());
    }

    #[test]
    fn test_resolves_excludes() {
        let groups = get_groups(["--group=-exclude/me", "--group=-exclude/me2"]);
        assert_eq!(groups.exclude_groups, strings(&["exclude/me", "exclude/me2"]));
        assert!(groups.include_groups.is_empty());
    }

    #[test]
    fn test_resolves_must_includes() {
        let groups = get_groups(["--group=!mustIncludes/me", "--group=!mustIncludes/me2"]);
        assert_eq!(
            groups.must_include_groups,
            strings(&["mustIncludes/me", "mustIncludes/me2"])
        );
        assert!(groups.include_groups.is_empty());
    }

    #[test]
    fn test_resolves_regexes() {
        let groups = get_groups(["--regex=smoke-\\d+", "--regex=-flaky.*"]);
        assert_eq!(groups.include_regexes, strings(&["smoke-\\d+"]));
        assert_eq!(groups.exclude_regexes, strings(&["flaky.*"]));
        assert!(groups.include_groups.is_empty());
    }

    #[test]
    fn test_regex_bang_is_not_a_sigil() {
        let groups = get_groups(["--regex=!x"]);
        assert_eq!(groups.include_regexes, strings(&["!x"]));
        assert!(groups.must_include_groups.is_empty());
    }

    #[test]
    fn test_empty_args_yield_empty_set() {
        let groups = get_groups(Vec::<String>::new());
        assert!(groups.is_empty());
        assert_eq!(groups, SelectorSet::default());
    }

    #[test]
    fn test_host_flags_are_ignored() {
        let groups = get_groups([
            "node",
            "jest",
            "--watch",
            "--group",
            "unit",
            "-group=x",
            "--groups=x",
            "--regexp=y",
        ]);
        assert!(groups.is_empty(), "got: {:?}", groups);
    }

    #[test]
    fn test_parse_os_matches_parse() {
        let args = ["jest", "--group=unit", "--group=-slow", "--regex=^api"];
        assert_eq!(SelectorSet::parse_os(args), get_groups(args));
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_os_tolerates_non_utf8_arguments() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let args = vec![
            OsString::from("--group=unit"),
            OsString::from_vec(b"bad\xff.js".to_vec()),
            OsString::from("--group=!ci"),
        ];
        let groups = SelectorSet::parse_os(args);
        assert_eq!(groups.include_groups, strings(&["unit"]));
        assert_eq!(groups.must_include_groups, strings(&["ci"]));
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let groups = get_groups(["--group=b", "--group=a", "--group=b"]);
        assert_eq!(groups.include_groups, strings(&["b", "a", "b"]));
    }

    #[test]
    fn test_only_first_sigil_is_stripped() {
        let groups = get_groups(["--group=--x", "--group=!-y", "--group=-!z"]);
        assert_eq!(groups.exclude_groups, strings(&["-x", "!z"]));
        assert_eq!(groups.must_include_groups, strings(&["-y"]));
    }

    #[test]
    fn test_bare_flag_yields_empty_include() {
        let groups = get_groups(["--group="]);
        assert_eq!(groups.include_groups, strings(&[""]));
        assert!(groups.has_inclusions());
    }

    #[test]
    fn test_mixed_categories_stay_separate() {
        let groups = get_groups([
            "--group=unit",
            "--group=-unit/slow",
            "--group=!ci",
            "--regex=^api-",
            "--regex=-legacy$",
        ]);
        assert_eq!(groups.include_groups, strings(&["unit"]));
        assert_eq!(groups.exclude_groups, strings(&["unit/slow"]));
        assert_eq!(groups.must_include_groups, strings(&["ci"]));
        assert_eq!(groups.include_regexes, strings(&["^api-"]));
        assert_eq!(groups.exclude_regexes, strings(&["legacy$"]));
        assert!(!groups.is_empty());
    }

    #[test]
    fn test_has_inclusions_ignores_negative_selectors() {
        let groups = get_groups(["--group=-a", "--group=!b", "--regex=-c"]);
        assert!(!groups.has_inclusions());
        assert!(!groups.is_empty());
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let groups = get_groups(["--group=a"]);
        let json = serde_json::to_value(&groups).expect("should serialize");
        assert_eq!(json["includeGroups"], serde_json::json!(["a"]));
        assert_eq!(json["mustIncludeGroups"], serde_json::json!([]));
    }
}
