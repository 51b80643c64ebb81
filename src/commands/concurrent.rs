use anyhow::{Context, Result};
use futures::future::join_all;
use parking_lot::Mutex;
use std::io::Write;
use std::process::Stdio;
use std::time::Instant;

use super::{CommandLine, Outcome};
use crate::format::{self, Styles, SPAWN_FAILURE_CODE};
use crate::shell::Shell;
use crate::targets::Target;

/// Every directory at once. Each child's stdout and stderr are captured and
/// printed as a single block when that child exits, so blocks appear in
/// completion order and never interleave.
///
/// A child that cannot be spawned gets a block of its own describing the
/// failure (exit code 127) and does not affect its siblings.
pub async fn run_concurrent<W: Write>(
    targets: &[Target],
    command: &CommandLine,
    shell: &Shell,
    styles: Styles,
    out: &Mutex<W>,
) -> Result<Vec<Outcome>> {
    let tasks = targets
        .iter()
        .map(|target| run_target(target, command, shell, styles, out));

    join_all(tasks).await.into_iter().collect()
}

async fn run_target<W: Write>(
    target: &Target,
    command: &CommandLine,
    shell: &Shell,
    styles: Styles,
    out: &Mutex<W>,
) -> Result<Outcome> {
    let start = Instant::now();
    let spawned = shell
        .async_command(command, &target.path)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();

    let (block, exit_code, duration) = match spawned {
        Ok(child) => {
            let output = child
                .wait_with_output()
                .await
                .with_context(|| format!("failed to collect output in {}", target.path.display()))?;
            let duration = start.elapsed();
            let exit_code = format::exit_code(output.status);
            log::debug!(
                "{}: exit {} after {:.2}s ({} bytes stdout, {} bytes stderr)",
                target.name,
                exit_code,
                duration.as_secs_f64(),
                output.stdout.len(),
                output.stderr.len()
            );
            let block = format::render_block(
                styles,
                &target.name,
                &output.stdout,
                &output.stderr,
                exit_code,
                duration,
            );
            (block, exit_code, duration)
        }
        Err(e) => {
            log::debug!("{}: failed to spawn {}: {}", target.name, shell, e);
            let message = format!("failed to spawn {}: {}", shell, e);
            let duration = start.elapsed();
            let block = format::render_block(
                styles,
                &target.name,
                b"",
                message.as_bytes(),
                SPAWN_FAILURE_CODE,
                duration,
            );
            (block, SPAWN_FAILURE_CODE, duration)
        }
    };

    {
        let mut sink = out.lock();
        sink.write_all(block.as_bytes())
            .context("failed to write output")?;
        sink.flush().context("failed to write output")?;
    }

    Ok(Outcome {
        name: target.name.clone(),
        exit_code,
        duration,
    })
}
