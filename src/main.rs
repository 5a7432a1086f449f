//! proc-sched entry point: config loading, price preparation, scheduling and export.

use std::process;

use chrono_tz::Tz;
use tracing::info;
use tracing_subscriber::EnvFilter;

use proc_sched::cli::{self, CliOptions};
use proc_sched::config::RunConfig;
use proc_sched::error::{ConfigError, Result};
use proc_sched::io::export::{self, RunReport};
use proc_sched::io::import::read_price_csvs;
use proc_sched::prices::{
    DailyPriceSeries, PriceObservation, PriceSummary, moving_average, prepare_daily_series,
};
use proc_sched::sched::{sched_proc, sweep};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Loads config: --config takes priority, then --preset, then baseline.
fn load_config(opts: &CliOptions) -> std::result::Result<RunConfig, ConfigError> {
    let mut cfg = if let Some(ref path) = opts.config {
        RunConfig::from_toml_file(path)?
    } else if let Some(ref name) = opts.preset {
        RunConfig::from_preset(name)?
    } else {
        RunConfig::baseline()
    };
    opts.apply_to(&mut cfg);
    Ok(cfg)
}

/// Reads price files, or generates a synthetic year when none are configured.
fn load_observations(cfg: &RunConfig, tz: Tz) -> Result<Vec<PriceObservation>> {
    if cfg.data.prices.is_empty() {
        info!(year = cfg.synthetic.year, seed = cfg.synthetic.seed, "generating synthetic prices");
        Ok(cfg.synthetic.hourly(tz))
    } else {
        Ok(read_price_csvs(&cfg.data.prices, tz)?)
    }
}

/// Daily series restricted by `data.year`, then `data.last_days`.
fn daily_series(
    cfg: &RunConfig,
    observations: &[PriceObservation],
    tz: Tz,
) -> Result<DailyPriceSeries> {
    let mut series = prepare_daily_series(observations, tz)?;

    if let Some(year) = cfg.data.year {
        series = series.for_year(year).ok_or_else(|| {
            ConfigError::new("data.year", format!("no price data for {year}"))
        })?;
    }
    if let Some(n) = cfg.data.last_days {
        series = series
            .last_days(n)
            .ok_or_else(|| ConfigError::new("data.last_days", "must be > 0"))?;
    }
    Ok(series)
}

fn run(cfg: &RunConfig) -> Result<()> {
    let tz = cfg.timezone()?;
    let observations = load_observations(cfg, tz)?;

    if let Some(ref path) = cfg.output.moving_average_csv {
        let points = moving_average(&observations, &cfg.moving_average)?;
        export::export_moving_average_csv(&points, path)?;
        eprintln!("Moving average written to {}", path.display());
    }

    let series = daily_series(cfg, &observations, tz)?;
    info!(
        days = series.len(),
        first = %series.first_day(),
        last = %series.last_day(),
        "daily series ready"
    );

    let summary = PriceSummary::from_series(&series);
    println!("{summary}\n");

    let primary = sched_proc(&series, &cfg.procurement)?;
    println!(
        "--- Purchases (N_proc = {}, limit {:.2}) ---",
        primary.n_parts, primary.limit
    );
    for p in &primary.purchases {
        println!(
            "#{:<2} {}  price={:>8.2}  ref={:>8.2}  {:.1} MWh  cost={:>12.2}{}",
            p.partition,
            p.day,
            p.price,
            p.reference_price,
            p.volume_mwh,
            p.cost,
            if p.forced { "  (forced)" } else { "" }
        );
    }
    println!(
        "Total: {:.2} ({:.2} /MWh)\n",
        primary.total_cost,
        primary.average_price()
    );

    let result = sweep(
        &series,
        &cfg.sweep.candidates,
        cfg.procurement.mwhs,
        cfg.procurement.limit,
    )?;
    println!("{result}");

    let out = &cfg.output;
    if let Some(ref path) = out.purchases_csv {
        export::export_purchases_csv(&primary, path)?;
        eprintln!("Purchases written to {}", path.display());
    }
    if let Some(ref path) = out.sweep_csv {
        export::export_sweep_csv(&result, path)?;
        eprintln!("Sweep written to {}", path.display());
    }
    if let Some(ref path) = out.report_json {
        let report = RunReport {
            first_day: series.first_day(),
            last_day: series.last_day(),
            summary: &summary,
            run: &primary,
            sweep: &result,
        };
        export::export_report_json(&report, path)?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if opts.help {
        cli::print_usage();
        process::exit(0);
    }

    init_tracing(opts.verbose);

    let cfg = match load_config(&opts) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    if let Err(e) = run(&cfg) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
