//! CSV and JSON export of scheduling and analysis results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::prices::{PriceSummary, SmoothedPrice};
use crate::sched::{SchedulerRun, SweepResult};

/// Column header for purchase export.
const PURCHASES_HEADER: &str =
    "partition,index,day,price,reference_price,volume_mwh,cost,forced";

/// Column header for sweep export.
const SWEEP_HEADER: &str = "n_parts,total_cost,avg_price_per_mwh,forced_purchases";

/// Column header for moving-average export.
const MOVING_AVERAGE_HEADER: &str = "time,price,ma";

/// Everything a report renderer needs from one invocation.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub first_day: chrono::NaiveDate,
    pub last_day: chrono::NaiveDate,
    pub summary: &'a PriceSummary,
    pub run: &'a SchedulerRun,
    pub sweep: &'a SweepResult,
}

/// Writes one row per purchase, in partition order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_purchases_csv(run: &SchedulerRun, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PURCHASES_HEADER.split(','))?;

    for p in &run.purchases {
        wtr.write_record(&[
            p.partition.to_string(),
            p.index.to_string(),
            p.day.to_string(),
            format!("{:.4}", p.price),
            format!("{:.4}", p.reference_price),
            format!("{:.4}", p.volume_mwh),
            format!("{:.4}", p.cost),
            p.forced.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one row per sweep candidate, in candidate order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_sweep_csv(sweep: &SweepResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SWEEP_HEADER.split(','))?;

    for e in sweep.entries() {
        wtr.write_record(&[
            e.n_parts.to_string(),
            format!("{:.4}", e.run.total_cost),
            format!("{:.4}", e.run.average_price()),
            e.run.forced_count().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one row per observation with its rolling mean, timestamps in RFC 3339 UTC.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_moving_average_csv(points: &[SmoothedPrice], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(MOVING_AVERAGE_HEADER.split(','))?;

    for p in points {
        wtr.write_record(&[
            p.timestamp.to_rfc3339(),
            format!("{:.4}", p.price),
            format!("{:.4}", p.mean),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns a `serde_json::Error` if serialization or writing fails.
pub fn write_report_json(report: &RunReport<'_>, writer: impl Write) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, report)
}

pub fn export_purchases_csv(run: &SchedulerRun, path: &Path) -> io::Result<()> {
    write_purchases_csv(run, io::BufWriter::new(File::create(path)?))
}

pub fn export_sweep_csv(sweep: &SweepResult, path: &Path) -> io::Result<()> {
    write_sweep_csv(sweep, io::BufWriter::new(File::create(path)?))
}

pub fn export_moving_average_csv(points: &[SmoothedPrice], path: &Path) -> io::Result<()> {
    write_moving_average_csv(points, io::BufWriter::new(File::create(path)?))
}

/// # Errors
///
/// Returns an `Error::Io` if the file cannot be created, or
/// `Error::Json` if serialization fails.
pub fn export_report_json(report: &RunReport<'_>, path: &Path) -> crate::error::Result<()> {
    let mut buf = io::BufWriter::new(File::create(path)?);
    write_report_json(report, &mut buf)?;
    buf.flush()?;
    Ok(())
}
