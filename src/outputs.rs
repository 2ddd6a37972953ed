//! Console output for scan events.
//!
//! Every write is best-effort: a closed or broken stream is ignored so that
//! output failures never stop a worker.

use crate::core::{DiscoveredEntry, Output, ScanReport};
use colored::Colorize;
use hickory_resolver::proto::rr::RecordType;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

const BANNER: &str = r#"
           _     _                _
 ___ _   _| |__ | |__  _ __ _   _| |_ ___
/ __| | | | '_ \| '_ \| '__| | | | __/ _ \
\__ \ |_| | |_) | |_) | |  | |_| | ||  __/
|___/\__,_|_.__/|_.__/|_|   \__,_|\__\___|
"#;

/// Prints the startup banner and scan parameters to stdout.
pub fn print_banner(domain: &str, wordlist: &Path, threads: usize, record_type: RecordType) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{}", BANNER.bright_cyan());
    let _ = writeln!(out, "{} {}", "Domain:    ".bright_blue(), domain.bright_green());
    let _ = writeln!(
        out,
        "{} {}",
        "Wordlist:  ".bright_blue(),
        wordlist.display().to_string().bright_green()
    );
    let _ = writeln!(out, "{} {}", "Threads:   ".bright_blue(), threads.to_string().bright_green());
    let _ = writeln!(
        out,
        "{} {}",
        "Record:    ".bright_blue(),
        record_type.to_string().bright_green()
    );
    let _ = writeln!(out, "{}", "=".repeat(48).bright_yellow());
}

/// Writes colored lines to stdout and stderr.
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    interrupt_shown: AtomicBool,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for ConsoleOutput {
    fn name(&self) -> &str {
        "console"
    }

    fn discovered(&self, entry: &DiscoveredEntry) {
        let line = format!("[+] {entry}");
        let _ = writeln!(std::io::stdout().lock(), "{}", line.bold().blue());
    }

    fn timed_out(&self, name: &str) {
        let line = format!("[!] Timeout querying {name}");
        let _ = writeln!(std::io::stderr().lock(), "{}", line.red());
    }

    fn interrupted(&self) {
        if self.interrupt_shown.swap(true, Ordering::SeqCst) {
            return;
        }
        let line = "[!] Interrupted, waiting for in-flight queries...";
        let _ = writeln!(std::io::stdout().lock(), "\n{}", line.yellow());
    }

    fn finished(&self, report: &ScanReport) {
        let line = format_summary(report);
        let _ = writeln!(std::io::stdout().lock(), "{}", line.green());
    }
}

/// The final summary line: elapsed seconds with two decimals and the
/// discovered count.
pub fn format_summary(report: &ScanReport) -> String {
    format!(
        "[*] Finished in {:.2}s: {} found",
        report.elapsed.as_secs_f64(),
        report.found()
    )
}
