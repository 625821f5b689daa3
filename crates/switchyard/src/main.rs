// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard - rule-driven LLM model selection.
//!
//! This is the binary entry point: one-shot selection from the command line,
//! rule file checks, and the HTTP service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod rules;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchyard_config::SwitchyardConfig;
use switchyard_engine::Selector;

/// Switchyard - rule-driven LLM model selection.
#[derive(Parser, Debug)]
#[command(name = "switchyard", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick a model for a prompt and print the decision as JSON.
    Choose {
        prompt: String,
        /// Rule to apply; unknown task types use the `default` rule.
        #[arg(long)]
        task_type: Option<String>,
        /// Soft time budget in seconds (advisory).
        #[arg(long)]
        deadline_secs: Option<u64>,
        /// Cost ceiling in USD above which the fallback model is used.
        #[arg(long)]
        max_cost_usd: Option<f64>,
    },
    /// Inspect rule documents.
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
    /// Run the HTTP selection service.
    Serve,
}

#[derive(Subcommand, Debug)]
enum RulesCommand {
    /// Parse and validate a rule document.
    Check {
        /// Rule file to check; defaults to the configured `rules.path`.
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => switchyard_config::load_and_validate_path(path),
        None => switchyard_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            switchyard_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Commands::Choose {
            prompt,
            task_type,
            deadline_secs,
            max_cost_usd,
        } => run_choose(&config, &prompt, task_type, deadline_secs, max_cost_usd).await,
        Commands::Rules {
            command: RulesCommand::Check { path },
        } => {
            let path = path.unwrap_or_else(|| PathBuf::from(&config.rules.path));
            rules::run_check(&path).await
        }
        Commands::Serve => serve::run_serve(config).await,
    };

    if let Err(e) = result {
        eprintln!("switchyard: {e}");
        std::process::exit(1);
    }
}

async fn run_choose(
    config: &SwitchyardConfig,
    prompt: &str,
    task_type: Option<String>,
    deadline_secs: Option<u64>,
    max_cost_usd: Option<f64>,
) -> Result<(), switchyard_core::SwitchyardError> {
    let selector = Selector::from_config(config).await?;

    let mut options = selector.options();
    if let Some(task_type) = task_type {
        options = options.task_type(task_type);
    }
    if let Some(secs) = deadline_secs {
        options = options.deadline_secs(secs);
    }
    if let Some(usd) = max_cost_usd {
        options = options.max_cost_usd(usd);
    }

    let decision = selector.choose_with(prompt, options).await?;
    let json = serde_json::to_string_pretty(&decision)
        .map_err(|e| switchyard_core::SwitchyardError::Internal(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("switchyard={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn choose_arguments_parse() {
        let cli = Cli::try_parse_from([
            "switchyard",
            "choose",
            "summarize this",
            "--task-type",
            "summarize",
            "--max-cost-usd",
            "0.01",
        ])
        .unwrap();
        match cli.command {
            Commands::Choose {
                prompt,
                task_type,
                deadline_secs,
                max_cost_usd,
            } => {
                assert_eq!(prompt, "summarize this");
                assert_eq!(task_type.as_deref(), Some("summarize"));
                assert_eq!(deadline_secs, None);
                assert_eq!(max_cost_usd, Some(0.01));
            }
            other => panic!("expected choose, got {other:?}"),
        }
    }

    #[test]
    fn rules_check_accepts_path_and_global_config() {
        let cli = Cli::try_parse_from([
            "switchyard",
            "rules",
            "check",
            "--path",
            "rules.yaml",
            "--config",
            "switchyard.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("switchyard.toml")));
        assert!(matches!(
            cli.command,
            Commands::Rules {
                command: RulesCommand::Check { path: Some(_) }
            }
        ));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["switchyard"]).is_err());
    }
}
