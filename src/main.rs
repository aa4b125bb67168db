mod cli;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands, HistoryCmd};
use quill_history::{HistoryStore, JsonFileStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Completions { shell }) => {
            cli::print_completions(shell);
            Ok(())
        }
        Some(Commands::ShowConfig) => {
            let config = quill_config::load(cli.config.as_deref())?;
            let text = toml::to_string_pretty(&config).context("encoding config")?;
            print!("{text}");
            Ok(())
        }
        Some(Commands::History { cmd }) => run_history(cmd),
        Some(Commands::Resolve { buffer, cursor }) => {
            run_resolve(&buffer, cursor, cli.config.as_deref())
        }
        None => {
            Cli::command().print_help().context("printing help")?;
            println!();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_history(cmd: HistoryCmd) -> anyhow::Result<()> {
    let mut store = JsonFileStore::new();
    match cmd {
        HistoryCmd::List { scope, limit } => {
            let entries = store.load(&scope);
            if entries.is_empty() {
                println!("No history for scope '{scope}'.");
                return Ok(());
            }
            let skip = limit
                .map(|n| entries.len().saturating_sub(n))
                .unwrap_or(0);
            for (i, entry) in entries.iter().enumerate().skip(skip) {
                println!("{:>4}  {entry}", i + 1);
            }
            Ok(())
        }
        HistoryCmd::Clear { scope } => {
            store
                .save(&scope, &[])
                .with_context(|| format!("clearing history for scope '{scope}'"))?;
            println!("Cleared history for scope '{scope}'.");
            Ok(())
        }
    }
}

/// Resolve a buffer exactly as the composer would and print the verdict.
/// Useful for debugging why a suggestion list did or did not open.
fn run_resolve(
    buffer: &str,
    cursor: Option<usize>,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let config = quill_config::load(config_path)?;

    let mut enabled = Vec::new();
    if config.triggers.memory {
        enabled.push(quill_composer::Trigger::Memory);
    }
    if config.triggers.files {
        enabled.push(quill_composer::Trigger::File);
    }
    if config.triggers.commands {
        enabled.push(quill_composer::Trigger::Command);
    }
    if config.triggers.skills {
        enabled.push(quill_composer::Trigger::Skill);
    }

    let cursor = cursor.unwrap_or(buffer.len());
    tracing::debug!(cursor, triggers = enabled.len(), "resolving buffer");
    match quill_composer::resolve(buffer, cursor, &enabled) {
        Some(resolved) => {
            println!("trigger: {:?} ({})", resolved.trigger, resolved.trigger.marker());
            println!("range:   [{}, {})", resolved.start, resolved.end);
            println!("query:   {:?}", resolved.query(buffer));
        }
        None => println!("no active trigger"),
    }
    Ok(())
}
