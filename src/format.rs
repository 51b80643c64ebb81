//! Rendering of per-directory blocks.
//!
//! Everything here is pure: styling is decided by the caller through
//! [`Styles`], so the same functions produce plain text for pipes and tests
//! and ANSI-styled text for terminals.

use anstyle::{AnsiColor, Color, Style};
use std::time::Duration;

const BAR: &str = "│  ";

const SUCCESS: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Green)));
const FAILURE: Style = Style::new()
    .bold()
    .fg_color(Some(Color::Ansi(AnsiColor::Red)));
const STDERR_BAR: Style = Style::new().bg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Exit code reported for a child that could not be spawned at all.
///
/// This is also what `sh -c` returns when the command itself is not found, so
/// the footer alone does not tell the two apart. The block's stderr line does:
/// a spawn failure always reads `failed to spawn <shell>: ...`.
pub const SPAWN_FAILURE_CODE: i32 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    ansi: bool,
}

impl Styles {
    pub const PLAIN: Styles = Styles { ansi: false };
    pub const ANSI: Styles = Styles { ansi: true };

    fn paint(&self, style: Style, text: &str) -> String {
        if self.ansi {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))), text)
    }
}

pub fn header(name: &str) -> String {
    format!("┌─ 📂 {}", name)
}

/// Summary line followed by an empty separator line.
pub fn footer(styles: Styles, exit_code: i32, duration: Duration) -> [String; 2] {
    let (icon, style) = if exit_code == 0 {
        ("✅", SUCCESS)
    } else {
        ("❌", FAILURE)
    };
    let exit_text = styles.paint(style, &format!("Exit: {}", exit_code));
    [
        format!(
            "└─ {} Done in {:.2}s • {}",
            icon,
            duration.as_secs_f64(),
            exit_text
        ),
        String::new(),
    ]
}

pub fn format_line(styles: Styles, line: &str, is_err: bool) -> String {
    let prefix = if is_err {
        styles.paint(STDERR_BAR, BAR)
    } else {
        BAR.to_string()
    };
    format!("{}{}", prefix, line.trim_end())
}

/// Decode captured output into lines, breaking on `\r\n`, `\n` and a lone
/// `\r` so progress redraws become separate lines. A final terminator does
/// not yield an empty trailing line.
pub fn split_lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = Vec::new();
    let mut rest: &str = &text;

    while !rest.is_empty() {
        match rest.find(['\r', '\n']) {
            Some(i) => {
                lines.push(rest[..i].to_string());
                let terminator = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + terminator..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }

    lines
}

/// A complete block for one directory: header, stdout, stderr, footer.
pub fn render_block(
    styles: Styles,
    name: &str,
    stdout: &[u8],
    stderr: &[u8],
    exit_code: i32,
    duration: Duration,
) -> String {
    let mut lines = vec![header(name)];
    lines.extend(
        split_lines(stdout)
            .iter()
            .map(|line| format_line(styles, line, false)),
    );
    lines.extend(
        split_lines(stderr)
            .iter()
            .map(|line| format_line(styles, line, true)),
    );
    lines.extend(footer(styles, exit_code, duration));

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Exit code of a finished child. Signals map to their negated number.
pub fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_shows_directory() {
        assert_eq!(header("alpha"), "┌─ 📂 alpha");
    }

    #[test]
    fn footer_success_plain() {
        let [summary, blank] = footer(Styles::PLAIN, 0, Duration::from_millis(1234));
        assert_eq!(summary, "└─ ✅ Done in 1.23s • Exit: 0");
        assert_eq!(blank, "");
    }

    #[test]
    fn footer_failure_plain() {
        let [summary, _] = footer(Styles::PLAIN, 2, Duration::from_millis(50));
        assert_eq!(summary, "└─ ❌ Done in 0.05s • Exit: 2");
    }

    #[test]
    fn footer_styles_exit_text() {
        let [ok, _] = footer(Styles::ANSI, 0, Duration::ZERO);
        assert!(ok.contains(&format!("{}Exit: 0", SUCCESS.render())));

        let [failed, _] = footer(Styles::ANSI, 1, Duration::ZERO);
        assert!(failed.contains(&format!("{}Exit: 1", FAILURE.render())));
        assert!(failed.ends_with(&FAILURE.render_reset().to_string()));
    }

    #[test]
    fn format_line_strips_trailing_whitespace() {
        assert_eq!(format_line(Styles::PLAIN, "hello  \r", false), "│  hello");
    }

    #[test]
    fn stderr_marker_is_highlighted() {
        let out = format_line(Styles::ANSI, "oops", false);
        assert_eq!(out, "│  oops");

        let err = format_line(Styles::ANSI, "oops", true);
        assert_eq!(
            err,
            format!("{}│  {}oops", STDERR_BAR.render(), STDERR_BAR.render_reset())
        );

        assert_eq!(format_line(Styles::PLAIN, "oops", true), "│  oops");
    }

    #[test]
    fn split_lines_drops_single_trailing_newline() {
        assert_eq!(split_lines(b"a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines(b"a\n\n"), vec!["a", ""]);
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn split_lines_breaks_on_carriage_returns() {
        assert_eq!(split_lines(b"10%\r20%\r30%\n"), vec!["10%", "20%", "30%"]);
        assert_eq!(split_lines(b"a\r\nb\r\n"), vec!["a", "b"]);
        assert_eq!(split_lines(b"a\r"), vec!["a"]);
        assert_eq!(split_lines(b"a\r\rb"), vec!["a", "", "b"]);
        assert_eq!(split_lines(b"no terminator"), vec!["no terminator"]);
    }

    #[test]
    fn progress_output_gets_one_marker_per_redraw() {
        let block = render_block(
            Styles::PLAIN,
            "a",
            b"10%\r20%\r30%\n",
            b"",
            0,
            Duration::ZERO,
        );
        assert_eq!(block.matches("│  ").count(), 3);
        assert!(!block.contains('\r'));
    }

    #[test]
    fn split_lines_is_lossy() {
        assert_eq!(split_lines(b"ok \xff\n"), vec!["ok \u{fffd}"]);
    }

    #[test]
    fn block_plain() {
        let block = render_block(
            Styles::PLAIN,
            "beta",
            b"one\ntwo\n",
            b"warn\n",
            3,
            Duration::from_millis(2500),
        );
        insta::assert_snapshot!(block.trim_end(), @r"
        ┌─ 📂 beta
        │  one
        │  two
        │  warn
        └─ ❌ Done in 2.50s • Exit: 3
        ");
    }

    #[test]
    fn block_ends_with_blank_line() {
        let block = render_block(Styles::PLAIN, "a", b"", b"", 0, Duration::ZERO);
        assert_eq!(block, "┌─ 📂 a\n└─ ✅ Done in 0.00s • Exit: 0\n\n");
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_from_status() {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(exit_code(std::process::ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(std::process::ExitStatus::from_raw(2 << 8)), 2);
        assert_eq!(exit_code(std::process::ExitStatus::from_raw(9)), -9);
    }
}
