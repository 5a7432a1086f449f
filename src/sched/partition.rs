use std::ops::Range;

use crate::error::ConfigError;

/// Splits `len` indices into `n_parts` contiguous, non-empty ranges.
///
/// Sizes differ by at most one; when `len` is not divisible by
/// `n_parts` the first `len % n_parts` ranges get the extra index.
///
/// # Errors
///
/// Returns a `ConfigError` on `n_parts` if it is zero or exceeds `len`.
///
/// # Examples
///
/// ```
/// use proc_sched::sched::partition::partition_bounds;
///
/// let parts = partition_bounds(10, 3).unwrap();
/// assert_eq!(parts, vec![0..4, 4..7, 7..10]);
/// ```
pub fn partition_bounds(len: usize, n_parts: usize) -> Result<Vec<Range<usize>>, ConfigError> {
    if n_parts == 0 {
        return Err(ConfigError::new("n_parts", "must be > 0"));
    }
    if len < n_parts {
        return Err(ConfigError::new(
            "n_parts",
            format!("series has {len} days, too few for {n_parts} partitions"),
        ));
    }

    let base = len / n_parts;
    let extra = len % n_parts;
    let start_of = |k: usize| k * base + k.min(extra);

    Ok((0..n_parts).map(|k| start_of(k)..start_of(k + 1)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_split() {
        assert_eq!(partition_bounds(8, 4).unwrap(), vec![0..2, 2..4, 4..6, 6..8]);
    }

    #[test]
    fn remainder_goes_to_first_partitions() {
        let parts = partition_bounds(11, 4).unwrap();
        let sizes: Vec<usize> = parts.iter().map(|r| r.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3, 2]);
    }

    #[test]
    fn single_partition_covers_everything() {
        assert_eq!(partition_bounds(5, 1).unwrap(), vec![0..5]);
    }

    #[test]
    fn one_day_per_partition() {
        assert_eq!(partition_bounds(3, 3).unwrap(), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn too_few_days_rejected() {
        let e = partition_bounds(3, 4).unwrap_err();
        assert_eq!(e.field, "n_parts");
        assert!(e.message.contains("too few"));
    }

    #[test]
    fn zero_parts_rejected() {
        assert!(partition_bounds(3, 0).is_err());
    }

    #[test]
    fn ranges_are_contiguous_and_cover_len() {
        for len in 1..40 {
            for n in 1..=len {
                let parts = partition_bounds(len, n).unwrap();
                assert_eq!(parts.first().map(|r| r.start), Some(0));
                assert_eq!(parts.last().map(|r| r.end), Some(len));
                assert!(parts.windows(2).all(|w| w[0].end == w[1].start));
                assert!(parts.iter().all(|r| !r.is_empty()));
            }
        }
    }
}
