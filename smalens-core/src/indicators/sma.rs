//! Trailing Simple Moving Average (SMA) with window truncation.
//!
//! Row `i` averages the closes of rows `max(0, i + 1 - period)..=i`, so the
//! first `period - 1` rows use a shorter window instead of being undefined.

use serde::{Deserialize, Serialize};

/// How a null close inside a window affects that window's mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    /// Average the non-null closes; null only if the window has none.
    #[default]
    Skip,
    /// Any null in the window makes the mean null.
    Propagate,
}

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    null_policy: NullPolicy,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            null_policy: NullPolicy::default(),
            name: format!("sma_{period}"),
        }
    }

    pub fn with_null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// One output per input, in the same order.
    pub fn compute(&self, closes: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut result = Vec::with_capacity(closes.len());
        let mut sum = 0.0;
        let mut present = 0usize;
        let mut nulls = 0usize;
        // Latest present close and how many present closes in a row equal it.
        let mut run_value = 0.0;
        let mut run_len = 0usize;

        for (i, entering) in closes.iter().enumerate() {
            match entering {
                Some(v) => {
                    sum += v;
                    present += 1;
                    if run_len > 0 && *v == run_value {
                        run_len += 1;
                    } else {
                        run_value = *v;
                        run_len = 1;
                    }
                }
                None => nulls += 1,
            }

            if i >= self.period {
                match closes[i - self.period] {
                    Some(v) => {
                        sum -= v;
                        present -= 1;
                    }
                    None => nulls -= 1,
                }
            }

            // Resum the live window once a full period has passed to keep
            // add/remove drift from accumulating over long series.
            if i >= self.period && i % self.period == 0 {
                sum = closes[(i + 1 - self.period)..=i].iter().flatten().sum();
            }

            let value = match self.null_policy {
                NullPolicy::Propagate if nulls > 0 => None,
                _ if present == 0 => None,
                // Every present close in the window is the same value.
                _ if run_len >= present => Some(run_value),
                _ => Some(sum / present as f64),
            };
            result.push(value);
        }

        result
    }
}
