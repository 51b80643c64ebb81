use clap::{Parser, ValueEnum};
use clap_complete::Shell as CompletionShell;

#[derive(Parser)]
#[command(
    name = "run-in-subdirs",
    version,
    about = "Run the same command in every subdirectory"
)]
pub struct Cli {
    /// Run in all subdirectories at once, buffering each one's output
    #[arg(short = 'a', long = "async", conflicts_with = "sync")]
    pub run_async: bool,

    /// Run one subdirectory at a time with live output (the default)
    #[arg(short, long)]
    pub sync: bool,

    /// When to style the output
    #[arg(long, value_enum)]
    pub color: Option<ColorChoice>,

    /// Shell used to interpret the command
    #[arg(long, value_name = "PROGRAM")]
    pub shell: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print a completion script for the given shell and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<CompletionShell>,

    /// The command to run
    #[arg(
        required_unless_present = "completions",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}
