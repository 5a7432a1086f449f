//! Partition-local procurement scheduling.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use super::params::ProcurementParams;
use super::partition::partition_bounds;
use crate::error::ConfigError;
use crate::prices::DailyPriceSeries;

/// Outcome of scanning one partition for its purchase day.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionScan {
    /// Purchase position relative to the start of the partition.
    pub offset: usize,
    /// Running minimum at the moment the scan stopped.
    pub reference: f64,
    /// `true` if a price rose above `reference + limit`; `false` for a
    /// forced purchase on the last day.
    pub triggered: bool,
    /// Reference value after each examined day, up to and including the purchase day.
    pub reference_trace: Vec<f64>,
}

/// Scans `prices` for the first day above the running minimum plus `limit`.
///
/// The reference starts at the first price and only ever decreases. If no
/// day triggers, the last day is chosen. Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use proc_sched::sched::scheduler::scan_partition;
///
/// let scan = scan_partition(&[10.0, 8.0, 15.0, 9.0, 20.0], 5.0).unwrap();
/// assert_eq!(scan.offset, 2);
/// assert_eq!(scan.reference, 8.0);
/// assert!(scan.triggered);
/// ```
pub fn scan_partition(prices: &[f64], limit: f64) -> Option<PartitionScan> {
    let (&first, rest) = prices.split_first()?;
    let mut reference = first;
    let mut reference_trace = vec![reference];

    for (i, &price) in rest.iter().enumerate() {
        if price < reference {
            reference = price;
        }
        reference_trace.push(reference);
        if price > reference + limit {
            return Some(PartitionScan {
                offset: i + 1,
                reference,
                triggered: true,
                reference_trace,
            });
        }
    }

    Some(PartitionScan {
        offset: prices.len() - 1,
        reference,
        triggered: false,
        reference_trace,
    })
}

/// One purchase decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    /// Partition number, starting at 0.
    pub partition: usize,
    /// Index into the daily series.
    pub index: usize,
    pub day: NaiveDate,
    /// Price paid (currency/MWh).
    pub price: f64,
    /// Running minimum when the purchase was made.
    pub reference_price: f64,
    pub volume_mwh: f64,
    /// `volume_mwh * price`.
    pub cost: f64,
    /// Whether the purchase fell on the last day without a trigger.
    pub forced: bool,
}

/// Result of one scheduler invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerRun {
    pub n_parts: usize,
    pub mwhs: f64,
    pub limit: f64,
    /// One purchase per partition, in partition order.
    pub purchases: Vec<Purchase>,
    pub total_cost: f64,
}

impl SchedulerRun {
    pub fn purchase_indices(&self) -> Vec<usize> {
        self.purchases.iter().map(|p| p.index).collect()
    }

    /// Volume-weighted average price paid.
    pub fn average_price(&self) -> f64 {
        self.total_cost / self.mwhs
    }

    pub fn forced_count(&self) -> usize {
        self.purchases.iter().filter(|p| p.forced).count()
    }
}

/// Schedules `params.n_parts` purchases across `price`.
///
/// The series is split into contiguous partitions (see
/// [`partition_bounds`]); each partition buys `mwhs / n_parts` on the day
/// chosen by [`scan_partition`].
///
/// # Errors
///
/// Returns a `ConfigError` if the parameters are invalid or the series has
/// fewer days than `n_parts`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use proc_sched::prices::DailyPriceSeries;
/// use proc_sched::sched::{ProcurementParams, sched_proc};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let series = DailyPriceSeries::from_pairs(
///     [10.0, 9.0, 8.0, 7.0, 6.0]
///         .into_iter()
///         .enumerate()
///         .map(|(i, p)| (start + chrono::Duration::days(i as i64), p)),
/// )
/// .unwrap();
///
/// let run = sched_proc(&series, &ProcurementParams::new(1000.0, 1, 5.0)).unwrap();
/// assert_eq!(run.purchase_indices(), vec![4]);
/// assert_eq!(run.total_cost, 6000.0);
/// ```
pub fn sched_proc(
    price: &DailyPriceSeries,
    params: &ProcurementParams,
) -> Result<SchedulerRun, ConfigError> {
    params.validate()?;
    let bounds = partition_bounds(price.len(), params.n_parts)?;
    let volume = params.volume_per_part();
    let prices = price.prices();
    let days = price.days();

    let mut purchases = Vec::with_capacity(params.n_parts);
    for (partition, range) in bounds.into_iter().enumerate() {
        let scan = scan_partition(&prices[range.clone()], params.limit).ok_or_else(|| {
            ConfigError::new("n_parts", format!("partition {partition} is empty"))
        })?;
        let index = range.start + scan.offset;
        let unit_price = prices[index];

        debug!(
            partition,
            start = range.start,
            end = range.end,
            index,
            price = unit_price,
            reference = scan.reference,
            forced = !scan.triggered,
            "purchase scheduled"
        );

        purchases.push(Purchase {
            partition,
            index,
            day: days[index],
            price: unit_price,
            reference_price: scan.reference,
            volume_mwh: volume,
            cost: volume * unit_price,
            forced: !scan.triggered,
        });
    }

    let total_cost = purchases.iter().map(|p| p.cost).sum();
    let run = SchedulerRun {
        n_parts: params.n_parts,
        mwhs: params.mwhs,
        limit: params.limit,
        purchases,
        total_cost,
    };
    info!(
        n_parts = run.n_parts,
        total_cost = run.total_cost,
        forced = run.forced_count(),
        "procurement run complete"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn scan_empty_is_none() {
        assert!(scan_partition(&[], 5.0).is_none());
    }

    #[test]
    fn scan_single_day_is_forced() {
        let scan = scan_partition(&[42.0], 5.0).unwrap();
        assert_eq!(scan.offset, 0);
        assert!(!scan.triggered);
    }

    #[test]
    fn scan_decreasing_is_forced_on_last_day() {
        let scan = scan_partition(&[10.0, 9.0, 8.0, 7.0, 6.0], 5.0).unwrap();
        assert_eq!(scan.offset, 4);
        assert_eq!(scan.reference, 6.0);
        assert!(!scan.triggered);
        assert_eq!(scan.reference_trace, vec![10.0, 9.0, 8.0, 7.0, 6.0]);
    }

    #[test]
    fn scan_equal_to_threshold_does_not_trigger() {
        // 15 is exactly 10 + 5, not above it.
        let scan = scan_partition(&[10.0, 15.0, 12.0], 5.0).unwrap();
        assert_eq!(scan.offset, 2);
        assert!(!scan.triggered);
    }

    #[test]
    fn scan_stops_at_first_trigger() {
        let scan = scan_partition(&[10.0, 30.0, 5.0, 50.0], 5.0).unwrap();
        assert_eq!(scan.offset, 1);
        assert_eq!(scan.reference_trace.len(), 2);
    }

    #[test]
    fn zero_limit_buys_on_first_rise() {
        let scan = scan_partition(&[10.0, 9.0, 9.5], 0.0).unwrap();
        assert_eq!(scan.offset, 2);
        assert!(scan.triggered);
    }

    #[test]
    fn spike_example_buys_at_index_two() {
        let run = sched_proc(
            &series(&[10.0, 8.0, 15.0, 9.0, 20.0]),
            &ProcurementParams::new(1000.0, 1, 5.0),
        )
        .unwrap();
        assert_eq!(run.purchase_indices(), vec![2]);
        assert_eq!(run.total_cost, 15_000.0);
        assert_eq!(run.purchases[0].reference_price, 8.0);
    }

    #[test]
    fn one_purchase_per_partition() {
        let prices: Vec<f64> = (0..30).map(|i| 50.0 + f64::from(i % 7) * 4.0).collect();
        let run = sched_proc(&series(&prices), &ProcurementParams::new(900.0, 3, 10.0)).unwrap();
        assert_eq!(run.purchases.len(), 3);
        let volume: f64 = run.purchases.iter().map(|p| p.volume_mwh).sum();
        assert!((volume - 900.0).abs() < 1e-9);
        for (k, p) in run.purchases.iter().enumerate() {
            assert_eq!(p.partition, k);
            assert!((k * 10..(k + 1) * 10).contains(&p.index));
        }
    }

    #[test]
    fn remainder_partition_forced_on_its_own_last_day() {
        // len 5, n_parts 2 -> [0..3, 3..5]; both decreasing.
        let run = sched_proc(
            &series(&[9.0, 8.0, 7.0, 6.0, 5.0]),
            &ProcurementParams::new(100.0, 2, 1.0),
        )
        .unwrap();
        assert_eq!(run.purchase_indices(), vec![2, 4]);
        assert_eq!(run.forced_count(), 2);
        assert_eq!(run.total_cost, 50.0 * 7.0 + 50.0 * 5.0);
    }

    #[test]
    fn too_short_series_is_config_error() {
        let e = sched_proc(&series(&[1.0, 2.0]), &ProcurementParams::new(1000.0, 3, 10.0))
            .unwrap_err();
        assert_eq!(e.field, "n_parts");
    }

    #[test]
    fn zero_parts_is_config_error() {
        let e = sched_proc(&series(&[1.0, 2.0]), &ProcurementParams::new(1000.0, 0, 10.0))
            .unwrap_err();
        assert_eq!(e.field, "n_parts");
    }

    #[test]
    fn average_price_is_cost_per_mwh() {
        let run = sched_proc(&series(&[20.0, 40.0]), &ProcurementParams::new(10.0, 2, 10.0))
            .unwrap();
        assert_eq!(run.average_price(), 30.0);
    }
}
