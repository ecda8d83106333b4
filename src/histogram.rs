use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum HistogramError {
    #[error("histogram needs at least one bin")]
    ZeroBins,
}

/// Equal-width histogram.
///
/// Bins are half-open `[lo, hi)` except the last, which also includes its
/// right edge, so every finite input lands in exactly one bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Bin the finite entries of `values` into `bins` buckets spanning
    /// `[min, max]`.  A degenerate range (all values equal) is widened to
    /// `[v - 0.5, v + 0.5]`; no finite values at all gives `[0, 1]`.
    pub fn compute(values: &[f64], bins: usize) -> Result<Self, HistogramError> {
        if bins == 0 {
            return Err(HistogramError::ZeroBins);
        }

        let (mut lo, mut hi) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo > hi {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = span_width(lo, hi, bins);
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
        edges.push(hi);

        let mut counts = vec![0u64; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            let mut idx = if width > 0.0 {
                ((v / width - lo / width) as usize).min(bins - 1)
            } else {
                0
            };
            // float rounding can put a value one bin off its edges
            if idx > 0 && v < edges[idx] {
                idx -= 1;
            } else if idx + 1 < bins && v >= edges[idx + 1] {
                idx += 1;
            }
            counts[idx] += 1;
        }

        Ok(Histogram { edges, counts })
    }

    /// `bins + 1` monotonically increasing edges.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn bin_width(&self) -> f64 {
        span_width(self.edges[0], self.edges[self.edges.len() - 1], self.bins())
    }
}

/// `(hi - lo) / bins` without overflowing when the span exceeds `f64::MAX`.
fn span_width(lo: f64, hi: f64, bins: usize) -> f64 {
    hi / bins as f64 - lo / bins as f64
}
