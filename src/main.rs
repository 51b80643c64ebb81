mod cli;
mod commands;
mod config;
mod format;
mod output;
mod shell;
mod targets;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, ColorChoice};
use commands::{CommandLine, ExecutionMode};
use shell::Shell;
use targets::ResolveOptions;

const LOG_ENV: &str = "RUN_IN_SUBDIRS_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, default))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    // Validated before anything else so an empty command never spawns.
    let command = CommandLine::from_tokens(&cli.command)?;
    let config = config::load_default_config()?;

    let mode = ExecutionMode::select(cli.run_async, cli.sync, config.general.concurrent);
    let styles = output::styles(
        cli.color
            .or(config.general.color)
            .unwrap_or(ColorChoice::Auto),
    );
    let shell = match &cli.shell {
        Some(program) => Shell::new(config::expand_tilde(program)),
        None => Shell::new(config.shell()),
    };

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let targets = targets::resolve_targets(
        &cwd,
        ResolveOptions {
            skip_hidden: config.targets.skip_hidden,
        },
    )?;

    if targets.is_empty() {
        println!("{}", styles.warning("No subdirectories found."));
        return Ok(());
    }

    let outcomes = commands::run(mode, &targets, &command, &shell, styles)?;
    let failed = outcomes.iter().filter(|o| o.exit_code != 0).count();
    log::debug!("{} of {} directories exited non-zero", failed, outcomes.len());
    if let Some(slowest) = outcomes.iter().max_by_key(|o| o.duration) {
        log::debug!(
            "slowest: {} ({:.2}s)",
            slowest.name,
            slowest.duration.as_secs_f64()
        );
    }

    Ok(())
}
