//! Command-line interface for group-runner
//!
//! Provides argument parsing and subcommand handling for the group-runner binary.
//! Selector flags are declared here for help output and validation, but the
//! selector set itself is parsed from the raw argument list by
//! [`SelectorSet::parse_os`](crate::selector::SelectorSet::parse_os).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Group and regex based test selection
#[derive(Parser)]
#[command(name = "group-runner")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Select tests by docblock groups and tag patterns")]
#[command(
    long_about = "group-runner reads the @group pragmas of each test file and prints the \
    tests selected by --group= and --regex= flags. Included groups are also published as \
    JEST_GROUP_<NAME>=1 environment flags."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./group-runner.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format for the selected tests
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Select tests by group prefix: NAME includes, -NAME excludes, !NAME requires
    #[arg(long = "group", value_name = "SELECTOR", require_equals = true, allow_hyphen_values = true)]
    pub groups: Vec<String>,

    /// Select tests by tag pattern: PATTERN includes, -PATTERN excludes
    #[arg(long = "regex", value_name = "SELECTOR", require_equals = true, allow_hyphen_values = true)]
    pub regexes: Vec<String>,

    /// Candidate test files
    pub paths: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// How selected tests are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One path per line
    Text,
    /// `{"selected": [...], "total": N}`
    Json,
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# group-runner Configuration
# ==========================
#
# Every section and key is optional. Values shown are the defaults.

# ─────────────────────────────────────────────────────────────────────────────
# SELECTION
# ─────────────────────────────────────────────────────────────────────────────

[selection]
# Docblock pragma holding a test's tags:
#
#   /**
#    * @group unit/parser
#    */
tag_key = "group"

# Prefix of the flag published for every included group.
# --group=unit/fast publishes JEST_GROUP_UNIT_FAST=1
env_prefix = "JEST_GROUP_"

# Write group flags into the process environment
publish_env = true

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG overrides this value. Logs are written to stderr.
log_level = "info"
"#
}
