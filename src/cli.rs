//! Command-line argument parsing for the `proc-sched` binary.

use std::env;
use std::path::PathBuf;

use crate::config::RunConfig;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub prices: Vec<PathBuf>,
    pub year: Option<i32>,
    pub last_days: Option<usize>,
    pub n_parts: Option<usize>,
    pub mwhs: Option<f64>,
    pub limit: Option<f64>,
    pub candidates: Option<Vec<usize>>,
    pub purchases_out: Option<PathBuf>,
    pub sweep_out: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
    pub ma_window: Option<u32>,
    pub ma_out: Option<PathBuf>,
    pub verbose: bool,
    pub help: bool,
}

impl CliOptions {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, cfg: &mut RunConfig) {
        if !self.prices.is_empty() {
            cfg.data.prices.clone_from(&self.prices);
        }
        if let Some(year) = self.year {
            cfg.data.year = Some(year);
            if cfg.data.prices.is_empty() {
                cfg.synthetic.year = year;
            }
        }
        if let Some(n) = self.last_days {
            cfg.data.last_days = Some(n);
        }
        if let Some(n) = self.n_parts {
            cfg.procurement.n_parts = n;
        }
        if let Some(mwhs) = self.mwhs {
            cfg.procurement.mwhs = mwhs;
        }
        if let Some(limit) = self.limit {
            cfg.procurement.limit = limit;
        }
        if let Some(ref c) = self.candidates {
            cfg.sweep.candidates.clone_from(c);
        }
        if self.purchases_out.is_some() {
            cfg.output.purchases_csv.clone_from(&self.purchases_out);
        }
        if self.sweep_out.is_some() {
            cfg.output.sweep_csv.clone_from(&self.sweep_out);
        }
        if self.report_json.is_some() {
            cfg.output.report_json.clone_from(&self.report_json);
        }
        if let Some(hours) = self.ma_window {
            cfg.moving_average.window_hours = hours;
        }
        if self.ma_out.is_some() {
            cfg.output.moving_average_csv.clone_from(&self.ma_out);
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses arguments excluding the program name.
pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--prices" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --prices (expected a CSV file path)")?;
                opts.prices.push(PathBuf::from(path));
            }
            "--year" => {
                i += 1;
                opts.year = Some(parse_value(args, i, "--year", "a year")?);
            }
            "--last-days" => {
                i += 1;
                opts.last_days = Some(parse_value(args, i, "--last-days", "a number of days")?);
            }
            "--n-parts" => {
                i += 1;
                opts.n_parts = Some(parse_value(args, i, "--n-parts", "a positive integer")?);
            }
            "--mwhs" => {
                i += 1;
                opts.mwhs = Some(parse_value(args, i, "--mwhs", "a number")?);
            }
            "--limit" => {
                i += 1;
                opts.limit = Some(parse_value(args, i, "--limit", "a number")?);
            }
            "--candidates" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --candidates (expected e.g. 1,2,4)")?;
                let parsed = raw
                    .split(',')
                    .map(|s| s.trim().parse::<usize>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| format!("--candidates value \"{raw}\" is not a list of integers"))?;
                opts.candidates = Some(parsed);
            }
            "--purchases-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --purchases-out (expected a file path)")?;
                opts.purchases_out = Some(PathBuf::from(path));
            }
            "--sweep-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --sweep-out (expected a file path)")?;
                opts.sweep_out = Some(PathBuf::from(path));
            }
            "--report-json" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --report-json (expected a file path)")?;
                opts.report_json = Some(PathBuf::from(path));
            }
            "--ma-window" => {
                i += 1;
                opts.ma_window = Some(parse_value(args, i, "--ma-window", "a number of hours")?);
            }
            "--ma-out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --ma-out (expected a file path)")?;
                opts.ma_out = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => opts.verbose = true,
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    index: usize,
    flag: &str,
    expected: &str,
) -> Result<T, String> {
    let raw = args.next_or_err(index, &format!("missing value for {flag} (expected {expected})"))?;
    raw.parse()
        .map_err(|_| format!("{flag} value \"{raw}\" is not {expected}"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("proc-sched: day-ahead energy procurement scheduler");
    eprintln!();
    eprintln!("Usage: proc-sched [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load run configuration from TOML");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        RunConfig::PRESETS.join(", ")
    );
    eprintln!("  --prices <path>          Price CSV (time,price); repeat for several years");
    eprintln!("  --year <yyyy>            Restrict to one calendar year");
    eprintln!("  --last-days <n>          Keep only the last n calendar days");
    eprintln!("  --n-parts <n>            Purchases in the primary run (default 4)");
    eprintln!("  --mwhs <mwh>             Total volume to procure (default 1000)");
    eprintln!("  --limit <price>          Trigger above running minimum (default 10)");
    eprintln!("  --candidates <list>      Sweep partition counts (default 1,2,3,4,6,12,24)");
    eprintln!("  --purchases-out <path>   Write primary-run purchases as CSV");
    eprintln!("  --sweep-out <path>       Write sweep costs as CSV");
    eprintln!("  --report-json <path>     Write summary, run and sweep as JSON");
    eprintln!("  --ma-window <hours>      Rolling-mean window (default 24, centred)");
    eprintln!("  --ma-out <path>          Write observations with rolling mean as CSV");
    eprintln!("  --verbose                Log per-partition decisions");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("Without --prices, a synthetic price year is generated.");
}
