use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::commands::CommandLine;

#[cfg(unix)]
const COMMAND_FLAG: &str = "-c";
#[cfg(windows)]
const COMMAND_FLAG: &str = "/C";

/// The system shell every command string is handed to.
#[derive(Debug, Clone)]
pub struct Shell {
    program: PathBuf,
}

impl Shell {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `<shell> -c <command>` with `dir` as the working directory. Stdio is
    /// left at its defaults; callers decide between inheriting and piping.
    pub fn command(&self, command: &CommandLine, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(COMMAND_FLAG).arg(command.as_str()).current_dir(dir);
        cmd
    }

    pub fn async_command(&self, command: &CommandLine, dir: &Path) -> tokio::process::Command {
        tokio::process::Command::from(self.command(command, dir))
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())
    }
}
