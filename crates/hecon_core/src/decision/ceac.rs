use super::DecisionCurve;
use crate::config::TieBreak;
use crate::model::OutcomeSlice;

/// Cost-effectiveness acceptability curve.
///
/// At each WTP, the fraction of iterations in which a strategy's NMB is at
/// least the iteration maximum. Exact ties are credited per `tie_break`; with
/// either rule the probabilities at one WTP sum to 1. NaN for an empty slice.
#[must_use]
pub fn ceac(slice: &OutcomeSlice, wtp_grid: &[f64], tie_break: TieBreak) -> DecisionCurve {
    let n = slice.n_iterations();
    let mut curve = DecisionCurve::filled(wtp_grid, slice.strategies(), f64::NAN);
    if slice.is_empty() {
        return curve;
    }

    let mut nmb = Vec::with_capacity(slice.n_strategies());
    let mut credit = vec![0.0; slice.n_strategies()];
    for (w, &wtp) in wtp_grid.iter().enumerate() {
        credit.fill(0.0);
        for i in 0..n {
            slice.nmb_row(i, wtp, &mut nmb);
            let best = nmb.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            match tie_break {
                TieBreak::First => {
                    if let Some(s) = nmb.iter().position(|&v| v >= best) {
                        credit[s] += 1.0;
                    }
                }
                TieBreak::Split => {
                    let winners = nmb.iter().filter(|&&v| v >= best).count();
                    let share = 1.0 / winners as f64;
                    for (c, &v) in credit.iter_mut().zip(&nmb) {
                        if v >= best {
                            *c += share;
                        }
                    }
                }
            }
        }
        for (s, &c) in credit.iter().enumerate() {
            curve.set(w, s, c / n as f64);
        }
    }

    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    fn tied_slice() -> OutcomeSlice {
        // At WTP 0 iteration 0 is a three-way tie on cost
        OutcomeSlice::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![
                    Outcome::new(100.0, 1.0),
                    Outcome::new(100.0, 2.0),
                    Outcome::new(100.0, 3.0),
                ],
                vec![
                    Outcome::new(50.0, 1.0),
                    Outcome::new(100.0, 2.0),
                    Outcome::new(300.0, 1.5),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_split_credits_ties_equally() {
        let curve = ceac(&tied_slice(), &[0.0, 1000.0], TieBreak::Split);

        let third = 1.0 / 3.0;
        assert!((curve.get(0, 0) - (third + 1.0) / 2.0).abs() < 1e-12);
        assert!((curve.get(0, 1) - third / 2.0).abs() < 1e-12);
        assert!((curve.get(0, 2) - third / 2.0).abs() < 1e-12);

        // WTP 1000: C wins iteration 0, B wins iteration 1
        assert_eq!(curve.at_wtp(1), &[0.0, 0.5, 0.5]);
    }

    #[test]
    fn test_first_credits_earliest_strategy() {
        let curve = ceac(&tied_slice(), &[0.0], TieBreak::First);
        assert_eq!(curve.at_wtp(0), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let slice = tied_slice();
        for rule in [TieBreak::Split, TieBreak::First] {
            let curve = ceac(&slice, &[0.0, 10.0, 1000.0], rule);
            for w in 0..3 {
                let total: f64 = curve.at_wtp(w).iter().sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_slice_is_nan() {
        let slice = OutcomeSlice::new(vec!["A".into()], vec![]).unwrap();
        let curve = ceac(&slice, &[0.0], TieBreak::Split);
        assert!(curve.get(0, 0).is_nan());
    }
}
