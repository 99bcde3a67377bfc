use crate::model::OutcomeSlice;

/// Expected value of perfect information at each WTP:
/// `mean_i max_s NMB(i, s) - max_s mean_i NMB(i, s)`.
///
/// Never negative up to rounding; NaN for an empty slice.
#[must_use]
pub fn evpi(slice: &OutcomeSlice, wtp_grid: &[f64]) -> Vec<f64> {
    let n = slice.n_iterations();
    if slice.is_empty() {
        return vec![f64::NAN; wtp_grid.len()];
    }

    let mut nmb = Vec::with_capacity(slice.n_strategies());
    wtp_grid
        .iter()
        .map(|&wtp| {
            let mut perfect = 0.0;
            for i in 0..n {
                slice.nmb_row(i, wtp, &mut nmb);
                perfect += nmb.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            }
            let perfect = perfect / n as f64;
            let current = (0..slice.n_strategies())
                .map(|s| slice.mean_nmb(s, wtp))
                .fold(f64::NEG_INFINITY, f64::max);
            (perfect - current).max(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    #[test]
    fn test_evpi_values() {
        let slice = OutcomeSlice::new(
            vec!["A".into(), "B".into()],
            vec![
                vec![Outcome::new(0.0, 1.0), Outcome::new(0.0, 2.0)],
                vec![Outcome::new(0.0, 2.0), Outcome::new(0.0, 1.0)],
            ],
        )
        .unwrap();

        let values = evpi(&slice, &[0.0, 100.0]);
        // No uncertainty about NMB at WTP 0
        assert_eq!(values[0], 0.0);
        // Perfect info: 200 each iteration; current best mean: 150
        assert!((values[1] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_evpi_zero_without_decision_uncertainty() {
        let slice = OutcomeSlice::new(
            vec!["A".into(), "B".into()],
            vec![
                vec![Outcome::new(0.0, 1.0), Outcome::new(0.0, 2.0)],
                vec![Outcome::new(0.0, 1.5), Outcome::new(0.0, 3.0)],
            ],
        )
        .unwrap();
        assert_eq!(evpi(&slice, &[10.0]), vec![0.0]);
    }
}
