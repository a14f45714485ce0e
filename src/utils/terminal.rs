//! Terminal output utilities

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Print a success message
pub fn print_success(message: &str) {
    println!("{}: {}", style("success").green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{}: {}", style("info").blue().bold(), message);
}

/// Print a section banner
pub fn print_heading(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", style(title).bold());
    println!("{}", "=".repeat(60));
}

/// Create a progress bar with a known length
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Format duration in human-readable format (e.g., "2m 34s" or "1.25s")
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let mins = total_secs / 60;
    if mins > 0 {
        format!("{}m {}s", mins, total_secs % 60)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Last `max` lines of `text`
pub fn tail_lines(text: &str, max: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max);
    lines[start..].to_vec()
}
