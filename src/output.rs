//! Terminal output for the CLI.
//!
//! The engines never print; they log through `tracing` and return reports.
//! Everything a user sees on stdout is shaped here.

use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeMap;

const BAR_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

pub struct OutputFormatter;

impl OutputFormatter {
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::success("Sorted by type.");
    /// ```
    pub fn success(message: &str) {
        Self::marked("✓".green(), message);
    }

    /// Goes to stderr, unlike every other message.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        Self::marked("⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{} {}", "[DRY RUN]".yellow().bold(), message.yellow());
    }

    /// One line of a dry-run listing: `name` and the folder it would land in.
    pub fn planned_move(name: &str, is_folder: bool, folder: &str) {
        let name = if is_folder {
            format!("{}/", name).bold()
        } else {
            name.normal()
        };
        println!(" - {}", name);
        println!("   → Would move to {}/", folder.cyan());
    }

    /// A bar for `total` moves, hidden when there is nothing to move.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        if total == 0 {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        ProgressBar::new(total).with_style(style)
    }

    /// Items moved per destination folder, followed by a total row.
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let counts = BTreeMap::from([
    ///     ("June 2023/Documents".to_string(), 15),
    ///     ("June 2023/Images".to_string(), 8),
    /// ]);
    /// OutputFormatter::summary_table(&counts);
    /// ```
    pub fn summary_table(folder_counts: &BTreeMap<String, usize>) {
        let width = folder_counts
            .keys()
            .map(String::len)
            .chain(["Folder".len()])
            .max()
            .unwrap_or_default();
        let rule = "-".repeat(width + 10);

        Self::header("SUMMARY");
        println!("{:<width$} | {}", "Folder".bold(), "Items".bold());
        println!("{}", rule);
        for (folder, &count) in folder_counts {
            println!("{:<width$} | {}", folder, Self::count(count));
        }
        println!("{}", rule);

        let total = folder_counts.values().sum();
        println!("{:<width$} | {}", "Total".bold(), Self::count(total).bold());
    }

    /// Pretty JSON on stdout, for `--json`.
    pub fn json<T: Serialize>(value: &T) -> Result<(), String> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Could not serialize report: {}", e))?;
        println!("{}", text);
        Ok(())
    }

    fn marked(mark: ColoredString, message: &str) {
        println!("{} {}", mark, message);
    }

    fn count(count: usize) -> ColoredString {
        let noun = if count == 1 { "item" } else { "items" };
        format!("{} {}", count, noun).green()
    }
}
