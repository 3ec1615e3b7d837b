//! Terminal output

use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use skylaunch_core::{Severity, StatusEntry, StatusSink};
use std::io::Write;

const BANNER: &str = r"
 ____  _          _                           _
/ ___|| | ___   _| |    __ _ _   _ _ __   ___| |__
\___ \| |/ / | | | |   / _` | | | | '_ \ / __| '_ \
 ___) |   <| |_| | |__| (_| | |_| | | | | (__| | | |
|____/|_|\_\\__, |_____\__,_|\__,_|_| |_|\___|_| |_|
            |___/
";

pub fn print_banner() {
    println!("{}", BANNER.cyan());
}

pub fn clear_screen() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
}

/// Plain text of one status line
pub fn format_entry(entry: &StatusEntry) -> String {
    format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message)
}

/// Redraws the whole status log on every update
#[derive(Debug, Default)]
pub struct TerminalSink;

impl StatusSink for TerminalSink {
    fn render(&mut self, entries: &[StatusEntry]) {
        if let Err(e) = clear_screen() {
            tracing::debug!("Failed to clear screen: {}", e);
        }
        print_banner();

        for entry in entries {
            let line = format_entry(entry);
            match entry.severity {
                Severity::Warning => println!("{}", line.red()),
                Severity::Normal => println!("{}", line.green()),
            }
        }
        let _ = std::io::stdout().flush();
    }
}
