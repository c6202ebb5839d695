use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::outputformatter::{render_notice, render_screen};
use crate::console::{ConsoleBody, ConsoleShell, DashboardState, Screen};

pub const HELP: &str = "Commands:
  open <path>                 navigate (/, /login, /console, /console/dashboard, /console/profile, /console/settings)
  login <email> <password>    sign in and open the records listing
  logout                      sign out and return to the public page
  reset-password              send a password reset link (profile screen only)
  status                      show session and screen info
  help                        show this help
  quit | exit                 leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Login { email: String, password: String },
    Logout,
    ResetPassword,
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(head) = parts.first() else { return Command::Empty; };
    match head.to_lowercase().as_str() {
        "open" | "go" => match parts.get(1) {
            Some(path) if parts.len() == 2 => Command::Open(path.to_string()),
            _ => Command::Invalid("usage: open <path>".into()),
        },
        "login" => {
            if parts.len() != 3 { return Command::Invalid("usage: login <email> <password>".into()); }
            Command::Login { email: parts[1].to_string(), password: parts[2].to_string() }
        }
        "logout" | "signout" => Command::Logout,
        "reset-password" | "reset" => Command::ResetPassword,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '{}'; type 'help'", other)),
    }
}

fn status_line(shell: &ConsoleShell) -> String {
    let who = match shell.store().peek() {
        None => "session: not resolved yet".to_string(),
        Some(s) => match s.identity() {
            Some(i) => format!("session: signed in as {}", i.email),
            None => "session: signed out".to_string(),
        },
    };
    let at = shell.current().route().map(|r| r.path().to_string()).unwrap_or_else(|| "-".into());
    let mut out = format!("{}\nscreen: {}\nguard: {:?}", who, at, shell.guard().state());
    if let Screen::Console { body: ConsoleBody::Dashboard(DashboardState::Ready(c)), .. } = shell.current() {
        out.push_str(&format!("\nrecords: {} ({:?})", c.len(), c.provenance));
    }
    out
}

/// Run one command against the shell. Returns `false` when the shell should exit.
pub async fn dispatch(shell: &mut ConsoleShell, cmd: Command) -> bool {
    match cmd {
        Command::Empty => {}
        Command::Quit => return false,
        Command::Help => println!("{}", HELP),
        Command::Invalid(msg) => eprintln!("{}", msg),
        Command::Status => println!("{}", status_line(shell)),
        Command::Open(path) => println!("{}", render_screen(&shell.navigate(&path).await)),
        Command::Login { email, password } => println!("{}", render_screen(&shell.login(&email, &password).await)),
        Command::Logout => println!("{}", render_screen(&shell.sign_out().await)),
        Command::ResetPassword => match shell.request_password_reset().await {
            Some(notice) => println!("{}", render_notice(&notice)),
            None => eprintln!("reset-password is available on /console/profile"),
        },
    }
    true
}

pub fn run_repl(rt: tokio::runtime::Runtime, mut shell: ConsoleShell, start: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("notebuddy console. Type 'help' for commands.");
    println!("{}", render_screen(&rt.block_on(shell.navigate(start))));
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let cmd = parse_command(&line);
        if !matches!(cmd, Command::Empty | Command::Login { .. }) {
            // Keep passwords out of the history buffer.
            let _ = rl.add_history_entry(line.as_str());
        }
        if !rt.block_on(dispatch(&mut shell, cmd)) {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("open /console"), Command::Open("/console".into()));
        assert_eq!(
            parse_command("  LOGIN ada@example.com s3cret "),
            Command::Login { email: "ada@example.com".into(), password: "s3cret".into() }
        );
        assert_eq!(parse_command("logout"), Command::Logout);
        assert_eq!(parse_command("reset-password"), Command::ResetPassword);
        assert_eq!(parse_command("exit"), Command::Quit);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(matches!(parse_command("open"), Command::Invalid(_)));
        assert!(matches!(parse_command("login only-email"), Command::Invalid(_)));
        assert!(matches!(parse_command("frobnicate"), Command::Invalid(_)));
    }
}
