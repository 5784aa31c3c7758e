//! Ordered parallel map over independent tasks

use crate::config::FailurePolicy;
use crate::error::{Error, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

/// Run `task` for every key on a pool of `workers` threads
///
/// Tasks share no mutable state. Results are returned sorted by key, no
/// matter in which order the workers finish. `workers = None` uses the
/// available parallelism.
pub fn parallel_map<K, R, F>(keys: &[K], workers: Option<usize>, task: F) -> Result<Vec<(K, R)>>
where
    K: Ord + Copy + Send + Sync,
    R: Send,
    F: Fn(K) -> R + Send + Sync,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.unwrap_or(0))
        .build()?;

    let mut results: Vec<(K, R)> =
        pool.install(|| keys.par_iter().map(|&key| (key, task(key))).collect());
    results.sort_by_key(|(key, _)| *key);
    Ok(results)
}

/// A year that failed under [`FailurePolicy::Lenient`]
#[derive(Debug)]
pub struct YearFailure {
    pub year: i32,
    pub error: Error,
}

/// Split per-year results according to the failure policy
///
/// Under [`FailurePolicy::Strict`] the error of the earliest failing year is
/// returned. Under [`FailurePolicy::Lenient`] failures are logged and
/// returned next to the successful values.
pub fn apply_policy<R>(
    results: Vec<(i32, Result<R>)>,
    policy: FailurePolicy,
) -> Result<(Vec<R>, Vec<YearFailure>)> {
    let mut values = Vec::with_capacity(results.len());
    let mut failed = Vec::new();

    for (year, result) in results {
        match result {
            Ok(value) => values.push(value),
            Err(error) => match policy {
                FailurePolicy::Strict => return Err(error),
                FailurePolicy::Lenient => {
                    tracing::warn!(year, stage = %error.stage(), "skipping year: {}", error);
                    failed.push(YearFailure { year, error });
                }
            },
        }
    }

    Ok((values, failed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    #[test]
    fn test_results_sorted_regardless_of_completion_order() {
        let years: Vec<i32> = (1920..=1927).collect();
        let finished = Mutex::new(Vec::new());

        // Later years sleep less, so they tend to finish first
        let results = parallel_map(&years, Some(4), |year| {
            std::thread::sleep(Duration::from_millis((1928 - year) as u64 * 5));
            finished.lock().unwrap().push(year);
            year * 2
        })
        .unwrap();

        let keys: Vec<i32> = results.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, years);
        assert!(results.iter().all(|(k, v)| *v == k * 2));
        assert_eq!(finished.lock().unwrap().len(), years.len());
    }

    #[test]
    fn test_single_worker() {
        let keys = [3, 1, 2];
        let results = parallel_map(&keys, Some(1), |k| k + 10).unwrap();
        assert_eq!(results, vec![(1, 11), (2, 12), (3, 13)]);
    }

    #[test]
    fn test_strict_policy_returns_first_failure() {
        let results: Vec<(i32, Result<i32>)> = vec![
            (1920, Ok(1)),
            (1921, Err(Error::EmptyPartition { year: 1921 })),
            (1922, Err(Error::EmptyPartition { year: 1922 })),
        ];
        let err = apply_policy(results, FailurePolicy::Strict).unwrap_err();
        assert!(matches!(err, Error::EmptyPartition { year: 1921 }));
    }

    #[test]
    fn test_lenient_policy_skips_failures() {
        let results: Vec<(i32, Result<i32>)> = vec![
            (1920, Ok(1)),
            (1921, Err(Error::EmptyPartition { year: 1921 })),
            (1922, Ok(3)),
        ];
        let (values, failed) = apply_policy(results, FailurePolicy::Lenient).unwrap();
        assert_eq!(values, vec![1, 3]);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].year, 1921);
    }
}
