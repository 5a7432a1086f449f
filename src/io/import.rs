//! CSV import of raw price observations.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::error::DataError;
use crate::prices::PriceObservation;

/// Naive layouts interpreted in the caller's timezone.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

/// Price cells that mean "no value published".
const MISSING_PRICES: &[&str] = &["", "N/A", "n/a", "n/e", "-"];

/// Reads `time,price` observations from a CSV file.
///
/// # Errors
///
/// Returns `DataError::Io` if the file cannot be opened, or any error
/// from [`read_prices`].
pub fn read_price_csv(path: &Path, tz: Tz) -> Result<Vec<PriceObservation>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let obs = read_prices(file, tz)?;
    debug!(path = %path.display(), rows = obs.len(), "loaded price file");
    Ok(obs)
}

/// Reads several files, sorts by timestamp and drops repeated timestamps.
///
/// The first occurrence of a timestamp wins, so earlier paths take
/// precedence over later ones.
pub fn read_price_csvs(paths: &[PathBuf], tz: Tz) -> Result<Vec<PriceObservation>, DataError> {
    let mut all = Vec::new();
    for path in paths {
        all.extend(read_price_csv(path, tz)?);
    }
    all.sort_by_key(|o| o.timestamp);
    let before = all.len();
    all.dedup_by_key(|o| o.timestamp);
    if all.len() < before {
        debug!(dropped = before - all.len(), "dropped duplicate timestamps");
    }
    Ok(all)
}

/// Parses price observations from CSV with a header row.
///
/// The time column is the one headed `time` (else the first); the price
/// column is the first whose header contains `price` (else the second).
/// Lines starting with `#` are ignored and rows with an unpublished price
/// are skipped, as are naive local times that fall inside a DST gap.
///
/// # Errors
///
/// Returns a line-numbered `DataError` for unparsable timestamps or
/// prices, or for rows missing either column.
pub fn read_prices(reader: impl Read, tz: Tz) -> Result<Vec<PriceObservation>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let time_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("time"))
        .unwrap_or(0);
    let price_col = headers
        .iter()
        .position(|h| h.to_ascii_lowercase().contains("price"))
        .unwrap_or(1);

    let mut out = Vec::new();
    let mut skipped = 0usize;
    let mut nonexistent = 0usize;
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw_time = record.get(time_col).ok_or_else(|| DataError::MissingColumn {
            line,
            column: "time".to_string(),
        })?;
        let raw_price = record.get(price_col).ok_or_else(|| DataError::MissingColumn {
            line,
            column: "price".to_string(),
        })?;

        if MISSING_PRICES.contains(&raw_price) {
            skipped += 1;
            continue;
        }
        let price: f64 = raw_price.parse().map_err(|_| DataError::InvalidPrice {
            line,
            value: raw_price.to_string(),
        })?;
        let timestamp = match resolve_timestamp(raw_time, tz) {
            Stamp::At(ts) => ts,
            Stamp::Nonexistent => {
                nonexistent += 1;
                continue;
            }
            Stamp::Invalid => {
                return Err(DataError::InvalidTimestamp {
                    line,
                    value: raw_time.to_string(),
                });
            }
        };
        out.push(PriceObservation::new(timestamp, price));
    }

    if skipped > 0 {
        warn!(skipped, "skipped rows without a published price");
    }
    if nonexistent > 0 {
        warn!(nonexistent, "skipped local times inside a DST gap");
    }
    Ok(out)
}

/// Outcome of reading one timestamp cell.
enum Stamp {
    At(DateTime<Utc>),
    /// Naive local time skipped by a spring-forward transition in `tz`.
    Nonexistent,
    Invalid,
}

/// Parses a timestamp, taking the start of an ENTSO-E `"start - end"` interval.
///
/// Offset-qualified forms keep their offset; naive forms are read as local
/// time in `tz` (the earlier instant on an ambiguous DST hour).
///
/// Returns `None` for unparsable text and for local times that do not exist in `tz`.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    match resolve_timestamp(raw, tz) {
        Stamp::At(ts) => Some(ts),
        Stamp::Nonexistent | Stamp::Invalid => None,
    }
}

fn resolve_timestamp(raw: &str, tz: Tz) -> Stamp {
    let start = raw.split(" - ").next().unwrap_or(raw).trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(start) {
        return Stamp::At(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S%:z") {
        return Stamp::At(ts.with_timezone(&Utc));
    }
    let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(start, fmt).ok())
    else {
        return Stamp::Invalid;
    };
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(ts) | LocalResult::Ambiguous(ts, _) => Stamp::At(ts.with_timezone(&Utc)),
        LocalResult::None => Stamp::Nonexistent,
    }
}
