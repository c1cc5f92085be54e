//! Output formatting utilities for the CLI
//!
//! Tables for worker status and queue items, plus colored one-line status
//! messages.

use tabled::{
    settings::{Style, Width},
    Table, Tabled,
};

use fg_client::{Decision, QueueItem};
use fg_core::time::elapsed_secs;
use fg_core::ServiceStatus;

/// Snapshot of the queue worker as the supervisor sees it
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub status: ServiceStatus,
    pub process_id: Option<u32>,
    pub last_update_time: Option<u64>,
    pub max_run_time: String,
    pub pid_file: String,
}

/// Format the queue worker state as a single-row table
pub fn format_worker_report(report: &WorkerReport) -> String {
    #[derive(Tabled)]
    struct WorkerRow {
        #[tabled(rename = "STATUS")]
        status: String,
        #[tabled(rename = "PID")]
        pid: String,
        #[tabled(rename = "STARTED")]
        started: String,
        #[tabled(rename = "MAX RUN TIME")]
        max_run_time: String,
        #[tabled(rename = "PID FILE")]
        pid_file: String,
    }

    let row = WorkerRow {
        status: report.status.to_string(),
        pid: report
            .process_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string()),
        started: report
            .last_update_time
            .map(|t| format!("{} ago", format_duration(elapsed_secs(t))))
            .unwrap_or_else(|| "-".to_string()),
        max_run_time: report.max_run_time.clone(),
        pid_file: report.pid_file.clone(),
    };

    Table::new([row])
        .with(Style::rounded())
        .with(Width::wrap(100))
        .to_string()
}

/// Format pending queue items as an ASCII table
pub fn format_queue_items(items: &[QueueItem]) -> String {
    if items.is_empty() {
        return "Queue is empty".to_string();
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "TYPE")]
        kind: String,
        #[tabled(rename = "AGE")]
        age: String,
        #[tabled(rename = "PAYLOAD")]
        payload: String,
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|item| ItemRow {
            id: truncate(&item.id, 16),
            kind: item.kind.clone(),
            age: item
                .created_at
                .map(|t| format_duration(elapsed_secs(t)))
                .unwrap_or_else(|| "-".to_string()),
            payload: truncate(&item.payload.to_string(), 48),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a fraud decision for one order
pub fn format_decision(decision: &Decision) -> String {
    let mut output = format!(
        "Order {}: {}",
        decision.order_id,
        decision.decision.to_uppercase()
    );
    if let Some(score) = decision.score {
        output.push_str(&format!(" (score {:.1})", score));
    }
    for reason in &decision.reasons {
        output.push_str(&format!("\n  - {}", reason));
    }
    output
}

/// Format duration in human-readable form
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Truncate a string with ellipsis if too long
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message to stderr in red
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message to stderr in yellow
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
