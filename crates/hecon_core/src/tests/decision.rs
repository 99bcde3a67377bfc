//! Property tests for the decision aggregates over random outcome tables

use proptest::prelude::*;

use crate::config::TieBreak;
use crate::decision::{ceac, ceaf, evpi, expected_regret, minimax_regret, pareto_frontier};
use crate::model::OutcomeSlice;
use crate::outcome::Outcome;

fn slice_strategy() -> impl Strategy<Value = OutcomeSlice> {
    (1usize..5).prop_flat_map(|k| {
        prop::collection::vec(
            prop::collection::vec((0.0..10_000.0f64, 0.0..5.0f64), k),
            1..40,
        )
        .prop_map(move |draws| {
            let names = (0..k).map(|s| format!("S{s}")).collect();
            let draws = draws
                .into_iter()
                .map(|row| row.into_iter().map(|(c, q)| Outcome::new(c, q)).collect())
                .collect();
            OutcomeSlice::new(names, draws).unwrap()
        })
    })
}

fn wtp_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(0u32..200_000, 1..6)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

proptest! {
    #[test]
    fn ceaf_sums_to_one(slice in slice_strategy(), wtp in wtp_strategy()) {
        let result = ceaf(&slice, &wtp);
        for w in 0..wtp.len() {
            let total: f64 = result.prob_optimal.at_wtp(w).iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ceac_split_sums_to_one(slice in slice_strategy(), wtp in wtp_strategy()) {
        let curve = ceac(&slice, &wtp, TieBreak::Split);
        for w in 0..wtp.len() {
            let total: f64 = curve.at_wtp(w).iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ceac_first_matches_ceaf(slice in slice_strategy(), wtp in wtp_strategy()) {
        let curve = ceac(&slice, &wtp, TieBreak::First);
        let frontier = ceaf(&slice, &wtp);
        prop_assert_eq!(&curve, &frontier.prob_optimal);
    }

    #[test]
    fn regret_and_evpi_non_negative(slice in slice_strategy(), wtp in wtp_strategy()) {
        let regret = expected_regret(&slice, &wtp);
        prop_assert!(regret.iter().all(|(_, _, r)| r >= 0.0));
        prop_assert!(minimax_regret(&regret).is_some());
        prop_assert!(evpi(&slice, &wtp).iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn frontier_is_monotone(
        points in prop::collection::vec((0.0..10_000.0f64, 0.0..5.0f64), 0..20)
    ) {
        let frontier = pareto_frontier(&points);
        for pair in frontier.windows(2) {
            let (a, b) = (points[pair[0]], points[pair[1]]);
            prop_assert!(b.0 >= a.0);
            prop_assert!(b.1 > a.1);
        }

        // Nothing off the frontier dominates a frontier point
        for &f in &frontier {
            let (cost, qaly) = points[f];
            let dominated = points.iter().any(|&(c, q)| {
                (c <= cost && q > qaly) || (c < cost && q >= qaly)
            });
            prop_assert!(!dominated);
        }
    }
}
