//!
//! notebuddy console binary
//! ------------------------
//! Headless terminal front end for the Note Buddy console. Starts an
//! interactive shell by default; `--open <path>` renders a single screen and
//! exits.

use std::env;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use notebuddy::cli::{render_screen, run_repl};
use notebuddy::config::ConsoleConfig;
use notebuddy::console::ConsoleShell;
use notebuddy::identity::{provider_from_config, SessionStore};
use notebuddy::records::RecordFetcher;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program}                                   # start the interactive shell\n  {program} --open <path> [--email <e> --password <p>]   # render one screen and exit\n\nFlags:\n  --open <path>        Console path to render (e.g. /console/dashboard)\n  --email <e>          Sign in with this email before rendering\n  --password <p>       Password for --email\n  -h, --help           Show this help\n\nEnvironment:\n  NOTEBUDDY_API_URL        records API base (default http://localhost:8000)\n  NOTEBUDDY_AUTH_URL       hosted auth service; unset uses a local demo account\n  NOTEBUDDY_AUTH_KEY       api key sent to the auth service\n  NOTEBUDDY_PUBLIC_ORIGIN  origin used in password reset links\n  NOTEBUDDY_DEMO_EMAIL / NOTEBUDDY_DEMO_PASSWORD  local demo account\n  RUST_LOG                 log filter (default info)"
    );
}

struct Args {
    open: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let mut out = Args { open: None, email: None, password: None };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "--open" | "--email" | "--password" => {
                let flag = args[i].clone();
                let Some(v) = args.get(i + 1) else { anyhow::bail!("{} requires a value", flag); };
                match flag.as_str() {
                    "--open" => out.open = Some(v.clone()),
                    "--email" => out.email = Some(v.clone()),
                    _ => out.password = Some(v.clone()),
                }
                i += 2;
            }
            other => anyhow::bail!("unknown argument '{}'", other),
        }
    }
    if out.email.is_some() != out.password.is_some() {
        anyhow::bail!("--email and --password must be given together");
    }
    Ok(Some(out))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let argv: Vec<String> = env::args().collect();
    let program = argv.first().cloned().unwrap_or_else(|| "notebuddy".to_string());
    let args = match parse_args(&argv) {
        Ok(Some(a)) => a,
        Ok(None) => {
            print_usage(&program);
            return Ok(());
        }
        Err(e) => {
            eprintln!("{}", e);
            print_usage(&program);
            std::process::exit(2);
        }
    };

    let cfg = ConsoleConfig::global();
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "notebuddy",
        "notebuddy starting: RUST_LOG='{}', api='{}', auth='{}'",
        rust_log,
        cfg.api_base_url,
        cfg.auth_url.as_ref().map(|u| u.to_string()).unwrap_or_else(|| "local".to_string())
    );

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let store = Arc::new(SessionStore::new(provider_from_config(cfg)));
    let mut shell = ConsoleShell::new(store, RecordFetcher::from_config(cfg), cfg);

    let Args { open, email, password } = args;
    let credentials = email.zip(password);
    match open {
        Some(path) => {
            let screen = rt.block_on(async {
                if let Some((email, password)) = &credentials {
                    shell.login(email, password).await;
                }
                shell.navigate(&path).await
            });
            println!("{}", render_screen(&screen));
            Ok(())
        }
        None => {
            let start = if let Some((email, password)) = &credentials {
                rt.block_on(shell.login(email, password));
                "/console"
            } else {
                "/"
            };
            run_repl(rt, shell, start)
        }
    }
}
