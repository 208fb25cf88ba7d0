//! Pairwise correlation and covariance across return series.

use serde::{Deserialize, Serialize};
use tessera_core::TimeSeries;
use tessera_math::statistics::{correlation, covariance};

/// Symmetric correlation and covariance matrices over labelled series.
///
/// Each pair is computed over the dates both series have. An entry is `None`
/// when the pair shares fewer than two dates, and a correlation is also `None`
/// when either side has zero variance over the overlap. Undefined entries are
/// never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Row and column labels.
    pub labels: Vec<String>,
    /// Pearson correlations. Diagonal is 1.0 for series with two or more points.
    pub correlations: Vec<Vec<Option<f64>>>,
    /// Sample covariances.
    pub covariances: Vec<Vec<Option<f64>>>,
    /// Overlapping observations per pair.
    pub observations: Vec<Vec<usize>>,
}

impl CorrelationMatrix {
    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the matrix has no series.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of `label`.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Correlation between two labelled series.
    #[must_use]
    pub fn correlation(&self, a: &str, b: &str) -> Option<f64> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        self.correlations[i][j]
    }

    /// Covariance between two labelled series.
    #[must_use]
    pub fn covariance(&self, a: &str, b: &str) -> Option<f64> {
        let (i, j) = (self.index_of(a)?, self.index_of(b)?);
        self.covariances[i][j]
    }

    /// Returns true if both matrices equal their transposes exactly.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| {
            (0..n).all(|j| {
                self.correlations[i][j].map(f64::to_bits) == self.correlations[j][i].map(f64::to_bits)
                    && self.covariances[i][j].map(f64::to_bits)
                        == self.covariances[j][i].map(f64::to_bits)
            })
        })
    }
}

/// Builds the matrices for `series`, in the given order.
///
/// Each unordered pair is computed once and mirrored, so the result is
/// symmetric by construction.
#[must_use]
pub fn correlation_matrix(series: &[(String, TimeSeries)]) -> CorrelationMatrix {
    let n = series.len();
    let mut correlations = vec![vec![None; n]; n];
    let mut covariances = vec![vec![None; n]; n];
    let mut observations = vec![vec![0; n]; n];

    for i in 0..n {
        let own = series[i].1.values();
        observations[i][i] = own.len();
        if own.len() >= 2 {
            correlations[i][i] = Some(1.0);
            covariances[i][i] = covariance(own, own).ok();
        }

        for j in (i + 1)..n {
            let (xs, ys) = overlap(&series[i].1, &series[j].1);
            observations[i][j] = xs.len();
            observations[j][i] = xs.len();
            if xs.len() < 2 {
                continue;
            }
            let cov = covariance(&xs, &ys).ok();
            let corr = correlation(&xs, &ys).ok().flatten();
            covariances[i][j] = cov;
            covariances[j][i] = cov;
            correlations[i][j] = corr;
            correlations[j][i] = corr;
        }
    }

    CorrelationMatrix {
        labels: series.iter().map(|(label, _)| label.clone()).collect(),
        correlations,
        covariances,
        observations,
    }
}

/// Values of both series on their common dates.
fn overlap(a: &TimeSeries, b: &TimeSeries) -> (Vec<f64>, Vec<f64>) {
    if a.is_aligned_with(b) {
        return (a.values().to_vec(), b.values().to_vec());
    }

    // Both date indexes are strictly increasing: merge them.
    let (ad, av) = (a.dates(), a.values());
    let (bd, bv) = (b.dates(), b.values());
    let (mut i, mut j) = (0, 0);
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    while i < ad.len() && j < bd.len() {
        match ad[i].cmp(&bd[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                xs.push(av[i]);
                ys.push(bv[j]);
                i += 1;
                j += 1;
            }
        }
    }
    (xs, ys)
}
