use crate::console::{ConsoleBody, DashboardState, ResetNotice, Screen};
use crate::records::Record;
use crate::routes::ConsoleView;

/// Render a screen as plain text for the terminal shell.
pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Public => "Note Buddy\nYour conversations, organized. Type 'open /login' to sign in.".to_string(),
        Screen::Login(form) => {
            let mut out = String::from("Sign in\nUse: login <email> <password>");
            if let Some(err) = &form.error {
                out.push_str(&format!("\n[!] {}", err));
            }
            out
        }
        Screen::Blank => String::new(),
        Screen::Console { context, view, body } => {
            let mut out = String::new();
            out.push_str(&nav_bar(*view));
            out.push_str(&format!("\nSigned in as {} ({})\n", context.identity.short_name(), context.identity.email));
            out.push_str(&format!("\n{}\n", view.title()));
            out.push_str(&render_body(body));
            out
        }
    }
}

fn nav_bar(active: ConsoleView) -> String {
    ConsoleView::ALL
        .iter()
        .map(|v| if *v == active { format!("[{}]", v.title()) } else { v.title().to_string() })
        .collect::<Vec<_>>()
        .join("  ")
}

fn render_body(body: &ConsoleBody) -> String {
    match body {
        ConsoleBody::Dashboard(DashboardState::Ready(collection)) => {
            if collection.is_empty() {
                "No conversation records yet.".to_string()
            } else {
                render_records(&collection.records)
            }
        }
        ConsoleBody::Dashboard(DashboardState::Failed(msg)) => format!("[!] {}", msg),
        ConsoleBody::Profile(p) => {
            let mut out = format!("Email: {}\nSecurity: type 'reset-password' to receive a password reset link.", p.identity.email);
            match &p.notice {
                Some(ResetNotice::Sent(msg)) => out.push_str(&format!("\n[ok] {}", msg)),
                Some(ResetNotice::Failed(msg)) => out.push_str(&format!("\n[!] {}", msg)),
                None => {}
            }
            out
        }
        ConsoleBody::Settings => "Settings module is coming soon...".to_string(),
    }
}

/// Records as an ASCII table, one row per record in the order received.
pub fn render_records(records: &[Record]) -> String {
    let cols: Vec<String> = ["Record", "Date", "Time", "Content"].iter().map(|s| s.to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| vec![r.label(), r.date.clone(), r.time.clone(), r.content.clone()])
        .collect();

    let max_col_width: usize = 60; // cap to keep output readable
    let mut widths: Vec<usize> = cols.iter().map(|s| display_len(s).min(max_col_width)).collect();
    for r in &rows {
        for (i, cell) in r.iter().enumerate().take(cols.len()) {
            let w = display_len(cell);
            if w > widths[i] { widths[i] = w.min(max_col_width); }
        }
    }

    let sep = build_separator(&widths);
    let mut lines = vec![sep.clone(), build_row(&cols, &widths), sep.clone()];
    for r in &rows {
        lines.push(build_row(r, &widths));
    }
    lines.push(sep);
    lines.join("\n")
}

pub fn render_notice(notice: &ResetNotice) -> String {
    match notice {
        ResetNotice::Sent(msg) => format!("[ok] {}", msg),
        ResetNotice::Failed(msg) => format!("[!] {}", msg),
    }
}

fn display_len(s: &str) -> usize { s.chars().count() }

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        s.push(' ');
        s.push_str(&text);
        s.push_str(&" ".repeat(w.saturating_sub(display_len(&text))));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    let take = max - 1;
    s.chars().take(take).collect::<String>() + "…"
}
