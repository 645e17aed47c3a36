//! Terminal progress rendering using indicatif.
//!
//! The scan worker never talks to the terminal directly; it posts
//! [`ScanEvent`]s into a channel and this module renders whatever the
//! main thread drains. Printing goes through the progress bar's
//! suspend mechanism so duplicate and error lines don't tear the bar.

use indicatif::{ProgressBar, ProgressStyle};

use crate::session::{ScanEvent, SessionCounts, SessionStatus};

/// Renders the scan event stream as a terminal progress display.
pub struct ProgressRenderer {
    bar: Option<ProgressBar>,
    quiet: bool,
    color: bool,
}

impl ProgressRenderer {
    /// Create a renderer.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn; events are consumed
    ///   silently.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: None,
            quiet,
            color: true,
        }
    }

    /// Enable or disable bar coloring (`--no-color` / `NO_COLOR`).
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn scan_style(&self) -> ProgressStyle {
        let template = if self.color {
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}"
        } else {
            "[{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█>-")
    }

    /// Print a line without tearing the active bar.
    fn println(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{}", line),
        }
    }

    /// Render one event.
    pub fn handle(&mut self, event: &ScanEvent) {
        if self.quiet {
            return;
        }

        match event {
            ScanEvent::DiscoveryComplete { total_discovered } => {
                let bar = ProgressBar::new(*total_discovered as u64);
                bar.set_style(self.scan_style());
                bar.set_message("Scanning");
                self.bar = Some(bar);
            }
            ScanEvent::Progress {
                message, scanned, ..
            } => {
                if let Some(bar) = &self.bar {
                    bar.set_position(*scanned as u64);
                    bar.set_message(message.clone());
                }
            }
            ScanEvent::DuplicateFound {
                duplicate_path,
                original_path,
            } => {
                self.println(&format!(
                    "Duplicate: {} (original: {})",
                    duplicate_path.display(),
                    original_path.display()
                ));
            }
            ScanEvent::Error { message, severity } => {
                self.println(&format!("{}: {}", severity, message));
            }
            ScanEvent::Finished { status, counts } => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_with_message(status.to_string());
                }
                self.print_summary(*status, counts);
            }
        }
    }

    /// Print the final counts, whatever the terminal state was.
    fn print_summary(&self, status: SessionStatus, counts: &SessionCounts) {
        println!(
            "Scan {}: {}/{} files scanned, {} duplicates found, {} moved to trash{}",
            status,
            counts.scanned,
            counts.total_discovered,
            counts.duplicates,
            counts.quarantined,
            if counts.quarantine_failures > 0 {
                format!(", {} moves failed", counts.quarantine_failures)
            } else {
                String::new()
            }
        );
    }
}
