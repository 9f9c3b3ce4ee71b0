//! Dirichlet hyperparameters and the periodic alpha rescaling rule.

/// Per-topic concentration `alpha` plus the scalar word-smoothing `beta`.
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperparameters {
    pub alpha: Vec<f64>,
    pub beta: f64,
    /// Base scale the rescaled `alpha` is stretched back out to
    /// (`alphamean` in the external configuration).
    pub alpha_mean: f64,
}

impl Hyperparameters {
    pub fn new(num_topics: usize, alpha_mean: f64, beta: f64) -> Self {
        Hyperparameters {
            alpha: vec![alpha_mean; num_topics],
            beta,
            alpha_mean,
        }
    }

    /// Softly adapt `alpha` toward the observed per-topic mass in `column_sums`,
    /// clamping the per-topic rescale factor to `[0.5, 2.0]` so no topic's
    /// prior collapses to zero or blows up.
    pub fn rescale(&mut self, column_sums: &[i64]) {
        let total: f64 = column_sums.iter().map(|&n| n as f64).sum();
        let mean = total / column_sums.len() as f64;
        if mean == 0.0 {
            return;
        }
        for (a, &n) in self.alpha.iter_mut().zip(column_sums.iter()) {
            let factor = (n as f64 / mean).clamp(0.5, 2.0);
            *a = factor * self.alpha_mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario E: forced N = [1, 1000, 1, 1] clamps to alpha_mean * [0.5, 2.0, 0.5, 0.5].
    #[test]
    fn rescale_clamps_to_bounds() {
        let mut hyper = Hyperparameters::new(4, 0.001, 0.1);
        hyper.rescale(&[1, 1000, 1, 1]);
        let expected: Vec<f64> = [0.5, 2.0, 0.5, 0.5].iter().map(|f| f * 0.001).collect();
        for (got, want) in hyper.alpha.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn rescale_is_noop_on_all_zero_counts() {
        let mut hyper = Hyperparameters::new(3, 0.001, 0.1);
        let before = hyper.alpha.clone();
        hyper.rescale(&[0, 0, 0]);
        assert_eq!(hyper.alpha, before);
    }
}
