//! dashboard-runner: headless runner for the portfolio dashboard.
//!
//! Usage:
//!   dashboard-runner seed   --db fintech.db --accounts 5000 --seed 42
//!   dashboard-runner render --db fintech.db --format text --risk High --region West
//!   dashboard-runner ipc    --db fintech.db
//!
//! `--config FILE` loads a JSON DashboardConfig; `--db` overrides its db_path.

use anyhow::{bail, Result};
use std::env;
use std::io::{self, BufRead, Write};
use wealth_core::{
    config::DashboardConfig,
    dashboard::{Dashboard, Presenter},
    format::Formatter,
    present::{JsonPresenter, TextPresenter},
    record::Dimension,
    store::AccountStore,
    synthetic::{self, SyntheticConfig},
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetFilter {
        dimension: Dimension,
        values: Vec<String>,
    },
    ClearFilters,
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        bail!("usage: dashboard-runner <seed|render|ipc> [options]");
    };

    match command {
        "seed" => run_seed(&args),
        "render" => run_render(&args),
        "ipc" => run_ipc(&args),
        other => bail!("unknown command '{other}' (expected seed, render or ipc)"),
    }
}

fn load_config(args: &[String]) -> Result<DashboardConfig> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(db) = flag_value(args, "--db") {
        config.db_path = db.to_string();
    }
    Ok(config)
}

/// Open the dashboard; an unavailable store is fatal and not retried.
fn open_dashboard(config: DashboardConfig) -> Result<Dashboard> {
    let db = config.db_path.clone();
    Dashboard::open(config).map_err(|e| {
        log::error!("Cannot start without the record store: {e}");
        anyhow::anyhow!("record store {db} unavailable: {e}")
    })
}

fn run_seed(args: &[String]) -> Result<()> {
    let db = flag_value(args, "--db").unwrap_or("fintech.db");
    let synth = SyntheticConfig {
        accounts: parse_arg(args, "--accounts", 5_000usize),
        seed: parse_arg(args, "--seed", 42u64),
        ..SyntheticConfig::default()
    };

    let mut store = AccountStore::create(db)?;
    store.migrate()?;
    let inserted = store.insert_accounts(&synthetic::generate(&synth))?;
    store.close()?;

    println!("Seeded {inserted} accounts into {db} (seed {})", synth.seed);
    Ok(())
}

fn run_render(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let fmt = Formatter::new(&config);
    let dashboard = open_dashboard(config)?;

    // No filter flags: start like a fresh session, everything selected.
    let mut selection = dashboard.default_selection();
    for (dim, flag) in [
        (Dimension::RiskTolerance, "--risk"),
        (Dimension::Region, "--region"),
        (Dimension::AccountType, "--account-type"),
    ] {
        let values = flag_values(args, flag);
        if !values.is_empty() {
            selection.select(dim, values);
        }
    }

    let stdout = io::stdout();
    let mut presenter: Box<dyn Presenter> = match flag_value(args, "--format").unwrap_or("text") {
        "json" => Box::new(JsonPresenter::new(stdout.lock())),
        "text" => {
            println!("Fintech Portfolio Dashboard");
            println!("  connected to: {}", dashboard.config.db_path);
            println!("  rendered at:  {}", chrono::Utc::now().to_rfc3339());
            println!();
            Box::new(TextPresenter::new(stdout.lock(), fmt))
        }
        other => bail!("unknown format '{other}' (expected text or json)"),
    };
    dashboard.render_to(&selection, presenter.as_mut())?;
    drop(presenter);

    dashboard.close()?;
    Ok(())
}

fn run_ipc(args: &[String]) -> Result<()> {
    let dashboard = open_dashboard(load_config(args)?)?;
    let mut selection = dashboard.default_selection();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unknown IPC command: {}", buffer.trim());
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::SetFilter { dimension, values } => selection.select(dimension, values),
            IpcCommand::ClearFilters => selection.clear(),
        }

        let mut presenter = JsonPresenter::new(stdout.lock());
        if let Err(e) = dashboard.render_to(&selection, &mut presenter) {
            drop(presenter);
            write_error(&mut stdout, &e.to_string())?;
        }
    }

    dashboard.close()?;
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Every value of a repeatable flag, e.g. `--risk Low --risk High`.
fn flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    flag_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

