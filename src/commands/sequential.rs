use anyhow::{Context, Result};
use std::io::Write;
use std::process::Stdio;
use std::time::Instant;

use super::{CommandLine, Outcome};
use crate::format::{self, Styles};
use crate::shell::Shell;
use crate::targets::Target;

/// One directory at a time with the child attached to our stdio, so its
/// colors and progress bars behave as if it ran on its own. Only the header
/// and footer go through `out`.
pub fn run_sequential<W: Write>(
    targets: &[Target],
    command: &CommandLine,
    shell: &Shell,
    styles: Styles,
    out: &mut W,
) -> Result<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(targets.len());

    for target in targets {
        writeln!(out, "{}", format::header(&target.name)).context("failed to write output")?;
        // the child writes to the same terminal; our header must land first
        out.flush().context("failed to write output")?;

        let start = Instant::now();
        let status = shell
            .command(command, &target.path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| {
                format!(
                    "failed to run {} in {}",
                    shell,
                    target.path.display()
                )
            })?;
        let duration = start.elapsed();
        let exit_code = format::exit_code(status);
        log::debug!(
            "{}: exit {} after {:.2}s",
            target.name,
            exit_code,
            duration.as_secs_f64()
        );

        for line in format::footer(styles, exit_code, duration) {
            writeln!(out, "{}", line).context("failed to write output")?;
        }
        out.flush().context("failed to write output")?;

        outcomes.push(Outcome {
            name: target.name.clone(),
            exit_code,
            duration,
        });
    }

    Ok(outcomes)
}
