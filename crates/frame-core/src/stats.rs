//! Descriptive statistics and rank correlation over numeric columns.
//!
//! Conventions follow the usual dataframe defaults: sample standard
//! deviation (n - 1), linearly interpolated quantiles, missing values skipped,
//! average ranks for ties.

use serde::{Deserialize, Serialize};

/// Count, moments and five-number summary of a series.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Describe {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Describe {
    pub const STAT_NAMES: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in [`Self::STAT_NAMES`] order.
    pub fn values(&self) -> [Option<f64>; 8] {
        [
            Some(self.count as f64),
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.q50,
            self.q75,
            self.max,
        ]
    }

    /// Apply `f` to every statistic except `count`.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            count: self.count,
            mean: self.mean.map(&f),
            std: self.std.map(&f),
            min: self.min.map(&f),
            q25: self.q25.map(&f),
            q50: self.q50.map(&f),
            q75: self.q75.map(&f),
            max: self.max.map(&f),
        }
    }
}

/// Describe the finite values of `values`.
pub fn describe(values: &[f64]) -> Describe {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n == 0 {
        return Describe::default();
    }
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });
    Describe {
        count: n,
        mean: Some(mean),
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolation quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64))
}

/// Mean of the present values.
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    (!present.is_empty()).then(|| present.iter().sum::<f64>() / present.len() as f64)
}

/// Maximum of the present values.
pub fn max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

/// 1-based ranks, ties sharing the average of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg;
        }
        i = j + 1;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx).powi(2);
        syy += (b - my).powi(2);
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some(sxy / (sxx * syy).sqrt())
}

/// Spearman rank correlation over the rows where both values are present.
/// `None` with fewer than two such rows or when either side is constant.
pub fn spearman(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();
    if xs.len() < 2 {
        return None;
    }
    pearson(&average_ranks(&xs), &average_ranks(&ys))
}

/// Pairwise correlation table; `values[i][j]` pairs `columns[i]` with `columns[j]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

pub fn spearman_matrix(series: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let values = series
        .iter()
        .map(|(_, a)| series.iter().map(|(_, b)| spearman(a, b)).collect())
        .collect();
    CorrelationMatrix { columns: series.iter().map(|(name, _)| name.clone()).collect(), values }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_matches_dataframe_conventions() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(d.count, 4);
        assert!(close(d.mean, 2.5));
        assert!(close(d.std, 1.2909944487358056));
        assert!(close(d.min, 1.0));
        assert!(close(d.q25, 1.75));
        assert!(close(d.q50, 2.5));
        assert!(close(d.q75, 3.25));
        assert!(close(d.max, 4.0));
    }

    #[test]
    fn describe_edge_sizes() {
        assert_eq!(describe(&[]), Describe::default());
        let one = describe(&[7.0, f64::NAN]);
        assert_eq!(one.count, 1);
        assert_eq!(one.std, None);
        assert!(close(one.q75, 7.0));
    }

    #[test]
    fn ranks_average_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 10.0, 30.0]), vec![1.5, 3.0, 1.5, 4.0]);
        assert!(average_ranks(&[]).is_empty());
    }

    #[test]
    fn spearman_is_monotone_and_skips_missing() {
        let x = [Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)];
        let up = [Some(10.0), Some(40.0), Some(90.0), Some(0.0), Some(250.0)];
        let down = [Some(5.0), Some(4.0), Some(3.0), Some(2.0), Some(1.0)];
        assert!(close(spearman(&x, &up), 1.0));
        assert!(close(spearman(&x, &down), -1.0));
        assert_eq!(spearman(&x, &[Some(1.0); 5]), None);
        assert_eq!(spearman(&[Some(1.0)], &[Some(2.0)]), None);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let series = vec![
            ("views".to_string(), vec![Some(100.0), Some(300.0), Some(200.0)]),
            ("likes".to_string(), vec![Some(1.0), Some(9.0), Some(4.0)]),
            ("comments".to_string(), vec![Some(3.0), Some(1.0), Some(2.0)]),
        ];
        let m = spearman_matrix(&series);
        assert_eq!(m.columns, ["views", "likes", "comments"]);
        for i in 0..3 {
            assert!(close(m.values[i][i], 1.0));
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        assert!(close(m.values[0][1], 1.0));
        assert!(close(m.values[0][2], -1.0));
    }

    #[test]
    fn mean_and_max_skip_missing() {
        let v = [Some(1.0), None, Some(4.0)];
        assert!(close(mean(&v), 2.5));
        assert!(close(max(&v), 4.0));
        assert_eq!(mean(&[None]), None);
        assert_eq!(max(&[]), None);
    }
}
