//! Cost comparison across purchase frequencies.

use std::fmt;

use serde::Serialize;
use tracing::info;

use super::params::ProcurementParams;
use super::scheduler::{SchedulerRun, sched_proc};
use crate::error::ConfigError;
use crate::prices::DailyPriceSeries;

/// Partition counts compared by default: yearly through fortnightly.
pub const DEFAULT_CANDIDATES: [usize; 7] = [1, 2, 3, 4, 6, 12, 24];

/// One evaluated candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepEntry {
    pub n_parts: usize,
    pub run: SchedulerRun,
}

/// Scheduler runs keyed by `n_parts`, in the order the candidates were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepResult {
    pub mwhs: f64,
    pub limit: f64,
    entries: Vec<SweepEntry>,
}

impl SweepResult {
    pub fn entries(&self) -> &[SweepEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(n_parts, total_cost)` pairs in candidate order.
    pub fn costs(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|e| (e.n_parts, e.run.total_cost))
    }

    pub fn get(&self, n_parts: usize) -> Option<&SchedulerRun> {
        self.entries
            .iter()
            .find(|e| e.n_parts == n_parts)
            .map(|e| &e.run)
    }

    /// Entry with the lowest total cost; ties go to the earlier candidate.
    pub fn cheapest(&self) -> Option<&SweepEntry> {
        self.entries.iter().reduce(|best, e| {
            if e.run.total_cost < best.run.total_cost {
                e
            } else {
                best
            }
        })
    }
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- Cost vs Procurement Frequency ({:.0} MWh, limit {:.2}) ---",
            self.mwhs, self.limit
        )?;
        writeln!(
            f,
            "{:>7}  {:>14}  {:>10}  {:>6}",
            "N_proc", "total cost", "avg /MWh", "forced"
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "{:>7}  {:>14.2}  {:>10.2}  {:>6}",
                e.n_parts,
                e.run.total_cost,
                e.run.average_price(),
                e.run.forced_count()
            )?;
        }
        match self.cheapest() {
            Some(best) => write!(
                f,
                "Cheapest: N_proc = {} at {:.2}",
                best.n_parts, best.run.total_cost
            ),
            None => write!(f, "Cheapest: n/a"),
        }
    }
}

/// Runs [`sched_proc`] once per candidate partition count.
///
/// `mwhs` and `limit` are held fixed. The first failing candidate aborts
/// the sweep; use [`feasible_candidates`] to drop counts the series cannot
/// support beforehand.
///
/// # Errors
///
/// Returns a `ConfigError` if `candidates` is empty or has duplicates, or
/// if any candidate fails to schedule.
pub fn sweep(
    price: &DailyPriceSeries,
    candidates: &[usize],
    mwhs: f64,
    limit: f64,
) -> Result<SweepResult, ConfigError> {
    if candidates.is_empty() {
        return Err(ConfigError::new("sweep.candidates", "must not be empty"));
    }
    for (i, n) in candidates.iter().enumerate() {
        if candidates[..i].contains(n) {
            return Err(ConfigError::new(
                "sweep.candidates",
                format!("duplicate candidate {n}"),
            ));
        }
    }

    let mut entries = Vec::with_capacity(candidates.len());
    for &n_parts in candidates {
        let run = sched_proc(price, &ProcurementParams::new(mwhs, n_parts, limit))?;
        entries.push(SweepEntry { n_parts, run });
    }

    let result = SweepResult {
        mwhs,
        limit,
        entries,
    };
    if let Some(best) = result.cheapest() {
        info!(
            candidates = result.len(),
            cheapest = best.n_parts,
            cost = best.run.total_cost,
            "sweep complete"
        );
    }
    Ok(result)
}

/// Candidates that a series of `series_len` days can support, order kept.
pub fn feasible_candidates(series_len: usize, candidates: &[usize]) -> Vec<usize> {
    candidates
        .iter()
        .copied()
        .filter(|&n| n > 0 && n <= series_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(prices: &[f64]) -> DailyPriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        DailyPriceSeries::from_pairs(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (start + chrono::Duration::days(i as i64), p)),
        )
        .unwrap()
    }

    fn sample() -> DailyPriceSeries {
        series(&[10.0, 8.0, 15.0, 9.0, 20.0, 7.0, 6.0, 30.0])
    }

    #[test]
    fn keeps_candidate_order() {
        let result = sweep(&sample(), &[4, 1, 2], 1000.0, 5.0).unwrap();
        let order: Vec<usize> = result.costs().map(|(n, _)| n).collect();
        assert_eq!(order, vec![4, 1, 2]);
    }

    #[test]
    fn aborts_on_infeasible_candidate() {
        let e = sweep(&sample(), &[1, 2, 24], 1000.0, 5.0).unwrap_err();
        assert_eq!(e.field, "n_parts");
    }

    #[test]
    fn empty_candidates_rejected() {
        let e = sweep(&sample(), &[], 1000.0, 5.0).unwrap_err();
        assert_eq!(e.field, "sweep.candidates");
    }

    #[test]
    fn duplicate_candidates_rejected() {
        let e = sweep(&sample(), &[2, 4, 2], 1000.0, 5.0).unwrap_err();
        assert!(e.message.contains("duplicate"));
    }

    #[test]
    fn feasible_candidates_filters_by_length() {
        assert_eq!(
            feasible_candidates(8, &DEFAULT_CANDIDATES),
            vec![1, 2, 3, 4, 6]
        );
        assert_eq!(feasible_candidates(8, &[0, 8, 9]), vec![8]);
    }

    #[test]
    fn cheapest_picks_lowest_cost() {
        let result = sweep(&sample(), &[1, 2, 4], 1000.0, 5.0).unwrap();
        let best = result.cheapest().unwrap();
        assert!(result.costs().all(|(_, c)| best.run.total_cost <= c));
    }

    #[test]
    fn display_lists_every_candidate() {
        let result = sweep(&sample(), &[1, 2], 1000.0, 5.0).unwrap();
        let text = format!("{result}");
        assert!(text.contains("Cheapest"));
        assert_eq!(text.lines().count(), 2 + 2 + 1);
    }
}
