//! data-generator: appends one day of synthetic clients, policies and
//! sales to the Imara store.
//!
//! Usage:
//!   data-generator                 # settings from the environment / .env
//!   data-generator --seed 7        # override GENERATOR_SEED
//!   data-generator --date 2026-10-14

use anyhow::{Context, Result};
use chrono::NaiveDate;
use imara_core::{
    config::GeneratorConfig,
    generator::DailyGenerator,
    rng::RngBank,
    settings::GeneratorSettings,
    store::{InsureStore, StoreAccess},
};
use std::env;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let settings = GeneratorSettings::from_env()?;
    let seed = parse_arg(&args, "--seed", settings.seed);
    let today = match arg_value(&args, "--date") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("--date expects YYYY-MM-DD, got '{raw}'"))?,
        None => chrono::Local::now().date_naive(),
    };

    let mut store = InsureStore::open(&settings.store.database)
        .with_context(|| format!("opening store at {}", settings.store.database))?;
    store.migrate()?;

    let config = GeneratorConfig::default();
    let generator = DailyGenerator::new(&config, settings.plan);
    let summary = generator.run(&mut store, &RngBank::new(seed), today)?;

    println!("Imara data generator — {today}");
    println!("  db:        {}", settings.store.database);
    println!("  seed:      {seed}");
    println!("  agents:    {}", summary.agents_available);
    println!("  clients:   {} {}", summary.written.clients, describe(&summary.client_ids));
    println!("  policies:  {} {}", summary.written.policies, describe(&summary.policy_ids));
    println!("  sales:     {} {}", summary.written.sales, describe(&summary.sale_ids));

    let report = store.integrity_report()?;
    if report.is_clean() {
        log::info!("Integrity check passed");
    } else {
        log::warn!(
            "Integrity check found problems: {} orphan policies, {} orphan sales, {} motor field violations",
            report.orphan_policies,
            report.orphan_sales,
            report.motor_field_violations
        );
    }

    Ok(())
}

fn describe(range: &Option<std::ops::RangeInclusive<i64>>) -> String {
    match range {
        Some(r) => format!("(ids {}..={})", r.start(), r.end()),
        None => String::new(),
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
