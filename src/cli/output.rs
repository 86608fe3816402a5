use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::context;

// Status lines go to stderr so stdout carries only the produced artifact.

/// Print a success message.
pub fn success(msg: &str) {
    if !context::is_quiet() {
        eprintln!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if !context::is_quiet() {
        eprintln!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message. Never suppressed.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if !context::is_quiet() {
        eprintln!("\n{}", msg.bold());
    }
}

/// Print an indented informational line.
pub fn info(msg: &str) {
    if !context::is_quiet() {
        eprintln!("    {msg}");
    }
}

/// Print a detail line, only with `--verbose`.
pub fn detail(msg: &str) {
    if context::is_verbose() && !context::is_quiet() {
        eprintln!("    {}", msg.dimmed());
    }
}

/// Print an artifact verbatim on stdout, followed by a newline if it has none.
pub fn artifact(text: &str) {
    if text.ends_with('\n') {
        print!("{text}");
    } else {
        println!("{text}");
    }
}

/// Start a spinner while a provider call is outstanding.
pub fn spinner(msg: &str) -> ProgressBar {
    if context::is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Stop a spinner and remove it from the terminal.
pub fn finish_spinner(pb: ProgressBar) {
    pb.finish_and_clear();
}
