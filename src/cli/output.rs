//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print one episode line of a listing.
    pub fn episode(id: &str, title: &str, level: &str, marker: Option<&str>) {
        println!(
            "  {} {} {} {}",
            style(format!("#{:<5}", id)).dim(),
            style(title).bold(),
            style(format!("[{}]", level)).cyan(),
            marker.map(|m| style(m).green().to_string()).unwrap_or_default()
        );
    }

    /// Print a search result.
    pub fn search_result(id: &str, title: &str, level: &str, score: u32) {
        println!(
            "  {} {} {} (score: {})",
            style(format!("#{:<5}", id)).dim(),
            style(title).bold(),
            style(format!("[{}]", level)).cyan(),
            score
        );
    }

    /// Print a line of dialogue.
    pub fn dialogue(speaker: &str, text: &str) {
        println!("  {} {}", style(format!("{}:", speaker)).yellow().bold(), text);
    }

    /// Print a vocabulary entry.
    pub fn vocab(word: &str, kind: &str, definition: &str) {
        println!(
            "  {} {} - {}",
            style(word).bold(),
            style(format!("({})", kind)).dim(),
            definition
        );
    }

    /// Print a textual progress bar.
    pub fn progress(label: &str, percentage: u8) {
        let filled = (percentage.min(100) as usize) / 5;
        println!(
            "  {} [{}{}] {}%",
            label,
            style("#".repeat(filled)).green(),
            "-".repeat(20 - filled),
            percentage
        );
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
