//! Conditional parallel iteration for per-holding work.
//!
//! Uses rayon when the `parallel` feature is enabled and the configuration
//! asks for it. Output order always matches input order.

use crate::types::AnalysisConfig;

/// Maps a function over items, conditionally using parallel iteration.
///
/// Uses parallel iteration when:
/// - The `parallel` feature is enabled
/// - `config.parallel` is true
/// - The collection size reaches `config.parallel_threshold`
///
/// # Example
///
/// ```ignore
/// let breakdown = maybe_parallel_map(portfolio.holdings(), &config, |h| analyze(h));
/// ```
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &AnalysisConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maybe_parallel_map() {
        let config = AnalysisConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results: Vec<i32> = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_order_preserved_above_threshold() {
        let config = AnalysisConfig::default().with_threshold(4);
        let items: Vec<u64> = (0..200).collect();
        let results = maybe_parallel_map(&items, &config, |x| x * x);
        assert_eq!(results, items.iter().map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_fallible_map_collects() {
        let config = AnalysisConfig::default();
        let items = vec![1.0_f64, 4.0, -1.0];
        let results: Vec<Result<f64, String>> = maybe_parallel_map(&items, &config, |x| {
            if *x >= 0.0 {
                Ok(x.sqrt())
            } else {
                Err(format!("negative input {x}"))
            }
        });
        assert_eq!(results[1], Ok(2.0));
        assert!(results.into_iter().collect::<Result<Vec<_>, _>>().is_err());
    }
}
