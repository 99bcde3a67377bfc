use rand::Rng;

use super::DecisionCurve;
use crate::model::OutcomeSlice;

/// Distributionally-robust net monetary benefit.
///
/// For each of `resamples` bootstrap resamples (with replacement, same size as
/// the slice) take every strategy's minimum NMB over the resampled iterations,
/// then average those minima. One set of resampled indices is shared by every
/// WTP point and strategy within a resample, so the estimates are comparable.
///
/// For an empty slice, returns NaN without consuming randomness.
pub fn dr_nmb<R: Rng + ?Sized>(
    slice: &OutcomeSlice,
    wtp_grid: &[f64],
    resamples: usize,
    rng: &mut R,
) -> DecisionCurve {
    let n = slice.n_iterations();
    let width = slice.n_strategies();
    let mut curve = DecisionCurve::filled(wtp_grid, slice.strategies(), f64::NAN);
    if slice.is_empty() || resamples == 0 {
        return curve;
    }

    let mut totals = vec![0.0; wtp_grid.len() * width];
    let mut indices = vec![0usize; n];
    let mut minima = vec![f64::INFINITY; width];
    let mut nmb = Vec::with_capacity(width);

    for _ in 0..resamples {
        for index in indices.iter_mut() {
            *index = rng.random_range(0..n);
        }
        for (w, &wtp) in wtp_grid.iter().enumerate() {
            minima.fill(f64::INFINITY);
            for &i in &indices {
                slice.nmb_row(i, wtp, &mut nmb);
                for (m, &v) in minima.iter_mut().zip(&nmb) {
                    *m = m.min(v);
                }
            }
            for (s, &m) in minima.iter().enumerate() {
                totals[w * width + s] += m;
            }
        }
    }

    for w in 0..wtp_grid.len() {
        for s in 0..width {
            curve.set(w, s, totals[w * width + s] / resamples as f64);
        }
    }
    curve
}
