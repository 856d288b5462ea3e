//! group-runner binary
//!
//! Selects test files by their docblock groups and prints the selection.

use clap::Parser;
use group_runner::{
    cli::{self, Cli, Command, OutputFormat},
    config::Config,
    metadata::DocblockExtractor,
    runner::{EnvSink, FlagSink, GroupRunner, ListRunner, RecordingSink},
    selector::SelectorSet,
    telemetry,
};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = &cli.command {
        let template = cli::generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(path, template)?;
                eprintln!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    let config = Config::discover(cli.config.as_deref())?;
    telemetry::init(&config.observability.log_level);

    // Selectors come from the raw argument list, the same way a host runner sees them.
    let selectors = SelectorSet::parse_os(std::env::args_os());
    let total = cli.paths.len();

    let selected = if config.selection.publish_env() {
        select(selectors, &config, EnvSink, cli.paths)?
    } else {
        select(selectors, &config, RecordingSink::new(), cli.paths)?
    };

    match cli.format {
        OutputFormat::Text => {
            for path in &selected {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => {
            let body = serde_json::json!({
                "selected": selected,
                "total": total,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

fn select<S: FlagSink>(
    selectors: SelectorSet,
    config: &Config,
    sink: S,
    paths: Vec<PathBuf>,
) -> group_runner::error::AppResult<Vec<PathBuf>> {
    let mut runner =
        GroupRunner::from_config(selectors, &config.selection, DocblockExtractor::new(), sink)?;
    runner.run_tests(paths, &mut ListRunner)
}
