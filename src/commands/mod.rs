/// The two execution strategies. Both take the resolved targets and the command
/// line, print formatted results, and hand back one `Outcome` per target so
/// callers can inspect exit codes without re-parsing the output.
mod concurrent;
mod sequential;

pub use concurrent::*;
pub use sequential::*;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use std::time::Duration;

use crate::format::Styles;
use crate::shell::Shell;
use crate::targets::Target;

/// The user's command: CLI tokens joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn from_tokens(tokens: &[String]) -> Result<Self> {
        let joined = tokens.join(" ");
        if joined.trim().is_empty() {
            bail!("Must provide a command to run");
        }
        Ok(Self(joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub name: String,
    pub exit_code: i32,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Concurrent,
}

impl ExecutionMode {
    /// Explicit flags win over the configured default.
    pub fn select(run_async: bool, sync: bool, concurrent_by_default: bool) -> Self {
        if run_async {
            ExecutionMode::Concurrent
        } else if sync || !concurrent_by_default {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Concurrent
        }
    }
}

/// Run `command` in every target on stdout using the chosen strategy.
pub fn run(
    mode: ExecutionMode,
    targets: &[Target],
    command: &CommandLine,
    shell: &Shell,
    styles: Styles,
) -> Result<Vec<Outcome>> {
    log::debug!(
        "running {:?} in {} directories ({:?}, shell {})",
        command.as_str(),
        targets.len(),
        mode,
        shell
    );

    match mode {
        ExecutionMode::Sequential => {
            run_sequential(targets, command, shell, styles, &mut std::io::stdout())
        }
        ExecutionMode::Concurrent => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let out = Mutex::new(std::io::stdout());
            runtime.block_on(run_concurrent(targets, command, shell, styles, &out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_joined_with_single_spaces() {
        let tokens = vec!["ls".to_string(), "-la".to_string(), "src".to_string()];
        let command = CommandLine::from_tokens(&tokens).unwrap();
        assert_eq!(command.as_str(), "ls -la src");
    }

    #[test]
    fn empty_command_errors() {
        let err = CommandLine::from_tokens(&[]).unwrap_err();
        assert!(err.to_string().contains("Must provide a command to run"));
    }

    #[test]
    fn whitespace_command_errors() {
        let tokens = vec!["".to_string(), "  ".to_string(), "\t".to_string()];
        assert!(CommandLine::from_tokens(&tokens).is_err());
    }

    #[test]
    fn mode_selection() {
        assert_eq!(ExecutionMode::select(false, false, false), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::select(true, false, false), ExecutionMode::Concurrent);
        assert_eq!(ExecutionMode::select(false, false, true), ExecutionMode::Concurrent);
        assert_eq!(ExecutionMode::select(false, true, true), ExecutionMode::Sequential);
    }
}
