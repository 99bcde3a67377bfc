use serde::{Deserialize, Serialize};

use super::DecisionCurve;
use crate::model::OutcomeSlice;

/// The strategy whose worst expected regret across the WTP grid is smallest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimaxRegret {
    pub strategy: usize,
    /// That strategy's maximum expected regret over the grid
    pub max_regret: f64,
}

/// Mean over iterations of `max_s NMB(i, s) - NMB(i, strategy)`, per WTP
#[must_use]
pub fn expected_regret(slice: &OutcomeSlice, wtp_grid: &[f64]) -> DecisionCurve {
    let n = slice.n_iterations();
    let mut curve = DecisionCurve::filled(wtp_grid, slice.strategies(), f64::NAN);
    if slice.is_empty() {
        return curve;
    }

    let mut nmb = Vec::with_capacity(slice.n_strategies());
    let mut totals = vec![0.0; slice.n_strategies()];
    for (w, &wtp) in wtp_grid.iter().enumerate() {
        totals.fill(0.0);
        for i in 0..n {
            slice.nmb_row(i, wtp, &mut nmb);
            let best = nmb.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for (total, &v) in totals.iter_mut().zip(&nmb) {
                *total += best - v;
            }
        }
        for (s, &total) in totals.iter().enumerate() {
            curve.set(w, s, total / n as f64);
        }
    }

    curve
}

/// Minimax-regret rule over a regret curve.
///
/// Earlier strategies win exact ties. `None` when no strategy has a finite
/// maximum regret.
#[must_use]
pub fn minimax_regret(regret: &DecisionCurve) -> Option<MinimaxRegret> {
    let n_wtp = regret.wtp_grid().len();
    let mut best: Option<MinimaxRegret> = None;

    for strategy in 0..regret.strategies().len() {
        let max_regret = (0..n_wtp)
            .map(|w| regret.get(w, strategy))
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_regret.is_finite() {
            continue;
        }
        match best {
            Some(b) if max_regret >= b.max_regret => {}
            _ => {
                best = Some(MinimaxRegret {
                    strategy,
                    max_regret,
                })
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    fn slice() -> OutcomeSlice {
        OutcomeSlice::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![
                vec![
                    Outcome::new(0.0, 1.0),
                    Outcome::new(100.0, 1.2),
                    Outcome::new(400.0, 1.5),
                ],
                vec![
                    Outcome::new(0.0, 1.0),
                    Outcome::new(100.0, 1.1),
                    Outcome::new(400.0, 1.3),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_expected_regret() {
        let curve = expected_regret(&slice(), &[0.0, 1000.0]);

        // WTP 0: A always best; B regrets 100, C regrets 400
        assert_eq!(curve.at_wtp(0), &[0.0, 100.0, 400.0]);

        // WTP 1000, it0 NMB: 1000, 1100, 1100 -> regrets 100, 0, 0
        //           it1 NMB: 1000, 1000, 900  -> regrets 0, 0, 100
        let at = curve.at_wtp(1);
        assert!((at[0] - 50.0).abs() < 1e-9);
        assert!(at[1].abs() < 1e-9);
        assert!((at[2] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_regret_is_non_negative() {
        let curve = expected_regret(&slice(), &[0.0, 250.0, 500.0, 2000.0]);
        assert!(curve.iter().all(|(_, _, r)| r >= 0.0));
    }

    #[test]
    fn test_minimax_picks_smallest_worst_case() {
        let curve = expected_regret(&slice(), &[0.0, 1000.0]);
        let minimax = minimax_regret(&curve).unwrap();
        // Worst cases: A 50, B 100, C 400
        assert_eq!(minimax.strategy, 0);
        assert!((minimax.max_regret - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimax_tie_goes_to_first() {
        let curve = DecisionCurve::from_data(
            vec![0.0, 1.0],
            vec!["A".into(), "B".into()],
            vec![5.0, 3.0, 1.0, 5.0],
        )
        .unwrap();
        assert_eq!(minimax_regret(&curve).unwrap().strategy, 0);
    }

    #[test]
    fn test_minimax_none_without_data() {
        let empty = OutcomeSlice::new(vec!["A".into()], vec![]).unwrap();
        assert!(minimax_regret(&expected_regret(&empty, &[0.0])).is_none());
    }
}
