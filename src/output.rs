use std::io::IsTerminal;

use crate::cli::ColorChoice;
use crate::format::Styles;

/// Decide whether stdout gets ANSI styling.
pub fn styles(choice: ColorChoice) -> Styles {
    resolve(
        choice,
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
    )
}

fn resolve(choice: ColorChoice, is_terminal: bool, no_color: bool) -> Styles {
    match choice {
        ColorChoice::Always => Styles::ANSI,
        ColorChoice::Never => Styles::PLAIN,
        ColorChoice::Auto if is_terminal && !no_color => Styles::ANSI,
        ColorChoice::Auto => Styles::PLAIN,
    }
}
