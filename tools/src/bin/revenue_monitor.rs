//! revenue-monitor: compares today's premium and commission totals
//! with yesterday's and raises an alert past the threshold.
//!
//! Usage:
//!   revenue-monitor                    # settings from the environment / .env
//!   revenue-monitor --date 2026-10-14  # evaluate a past day
//!   revenue-monitor --json             # also print the decision as JSON

use anyhow::{Context, Result};
use chrono::NaiveDate;
use imara_core::{
    config::MonitorConfig,
    dispatcher::{MailRoute, SmtpMailer},
    monitor::RevenueMonitor,
    settings::MonitorSettings,
    store::InsureStore,
    summarizer::OpenAiClient,
};
use std::{
    env,
    io::{self, Write},
    process::ExitCode,
};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error in revenue monitoring: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let today = match args.windows(2).find(|w| w[0] == "--date") {
        Some(w) => NaiveDate::parse_from_str(&w[1], "%Y-%m-%d")
            .with_context(|| format!("--date expects YYYY-MM-DD, got '{}'", w[1]))?,
        None => chrono::Local::now().date_naive(),
    };

    let settings = MonitorSettings::from_env()?;
    let store = InsureStore::open_read_only(&settings.store.database)
        .with_context(|| format!("opening store at {}", settings.store.database))?;

    let route = match &settings.mail {
        Some(mail) => Some(MailRoute {
            transport: SmtpMailer::new(mail)?,
            sender: mail.user.clone(),
        }),
        None => None,
    };
    let generator = OpenAiClient::new(settings.text_service.clone())?;
    let monitor = RevenueMonitor::new(
        &MonitorConfig::default(),
        generator,
        route,
        &settings.recipient,
    );

    let mut stdout = io::stdout().lock();
    let outcome = monitor.run(&store, today, &mut stdout)?;

    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&outcome.decision)?)?;
    }
    Ok(())
}
