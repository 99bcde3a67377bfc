//! Tests for sampled marginals and correlation structure
//!
//! These tests verify that:
//! - Independent draws follow the requested marginal (KS statistic)
//! - Correlated draws reproduce the target correlation matrix at n = 5000,
//!   including randomly generated positive-definite blocks
//! - Independent mode leaves parameters uncorrelated
//! - Every marginal keeps its moments under the copula

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::model::{CorrelationBlock, DistributionFamily, ParameterSpec};
use crate::sampling::{SamplingMode, sample_parameters};

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn std_dev(xs: &[f64]) -> f64 {
    let m = mean(xs);
    (xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64).sqrt()
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let (mx, my) = (mean(xs), mean(ys));
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx).powi(2);
        syy += (y - my).powi(2);
    }
    sxy / (sxx * syy).sqrt()
}

/// Two-sided Kolmogorov-Smirnov statistic against a continuous CDF
fn ks_statistic(sample: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            (((i + 1) as f64 / n) - f).max(f - i as f64 / n)
        })
        .fold(0.0, f64::max)
}

/// Two parameters, 2000 independent iterations
#[test]
fn test_two_parameter_scenario() {
    let specs = vec![
        ParameterSpec::new("param1", DistributionFamily::Normal, 0.5, 0.1),
        ParameterSpec::new("param2", DistributionFamily::Beta, 0.6, 0.05),
    ];
    let mut rng = StdRng::seed_from_u64(2024);

    let out = sample_parameters(&specs, &[], 2000, SamplingMode::Independent, &mut rng).unwrap();
    let samples = out.samples;

    assert_eq!(samples.n_iterations(), 2000);
    assert_eq!(samples.n_parameters(), 2);

    // Critical value for alpha = 0.01
    let param1 = samples.column("param1").unwrap();
    let reference = Normal::new(0.5, 0.1).unwrap();
    let d = ks_statistic(param1, |x| reference.cdf(x));
    let critical = 1.63 / (2000f64).sqrt();
    assert!(d < critical, "KS statistic {d} exceeds {critical}");

    let param2 = samples.column("param2").unwrap();
    assert!((mean(param2) - 0.6).abs() < 0.01);
    assert!((std_dev(param2) - 0.05).abs() < 0.005);
}

#[test]
fn test_correlated_sampling_reproduces_matrix() {
    let specs = vec![
        ParameterSpec::new("c_drug", DistributionFamily::Normal, 10.0, 2.0),
        ParameterSpec::new("p_response", DistributionFamily::Beta, 0.6, 0.05),
        ParameterSpec::new("hr_relapse", DistributionFamily::LogNormal, 0.0, 0.1),
        ParameterSpec::new("u_remission", DistributionFamily::Normal, 0.8, 0.05),
    ];
    let target = vec![
        vec![1.0, 0.6, -0.3],
        vec![0.6, 1.0, 0.2],
        vec![-0.3, 0.2, 1.0],
    ];
    let blocks = vec![CorrelationBlock::new(
        "efficacy",
        vec!["c_drug".into(), "p_response".into(), "hr_relapse".into()],
        target.clone(),
    )];
    let mut rng = StdRng::seed_from_u64(7);

    let out =
        sample_parameters(&specs, &blocks, 5000, SamplingMode::Correlated, &mut rng).unwrap();
    assert!(out.warnings.is_empty());

    let names = ["c_drug", "p_response", "hr_relapse"];
    for i in 0..3 {
        for j in (i + 1)..3 {
            let r = pearson(
                out.samples.column(names[i]).unwrap(),
                out.samples.column(names[j]).unwrap(),
            );
            assert!(
                (r - target[i][j]).abs() < 0.05,
                "corr({}, {}) = {r}, target {}",
                names[i],
                names[j],
                target[i][j]
            );
        }
    }

    // Parameter outside the block stays independent
    let r = pearson(
        out.samples.column("c_drug").unwrap(),
        out.samples.column("u_remission").unwrap(),
    );
    assert!(r.abs() < 0.05);
}

#[test]
fn test_copula_preserves_marginals() {
    let specs = vec![
        ParameterSpec::new("c_session", DistributionFamily::Gamma, 450.0, 60.0),
        ParameterSpec::new("p_remission", DistributionFamily::Beta, 0.4, 0.08),
    ];
    let blocks = vec![CorrelationBlock::pair("costs", "c_session", "p_remission", -0.5)];
    let mut rng = StdRng::seed_from_u64(99);

    let out =
        sample_parameters(&specs, &blocks, 5000, SamplingMode::Correlated, &mut rng).unwrap();

    let gamma = out.samples.column("c_session").unwrap();
    assert!(gamma.iter().all(|&x| x > 0.0));
    assert!((mean(gamma) - 450.0).abs() < 5.0);
    assert!((std_dev(gamma) - 60.0).abs() < 4.0);

    let beta = out.samples.column("p_remission").unwrap();
    assert!(beta.iter().all(|&x| x > 0.0 && x < 1.0));
    assert!((mean(beta) - 0.4).abs() < 0.01);
    assert!((std_dev(beta) - 0.08).abs() < 0.005);

    assert!(pearson(gamma, beta) < -0.4);
}

#[test]
fn test_independent_mode_is_uncorrelated() {
    let specs = vec![
        ParameterSpec::new("a", DistributionFamily::Normal, 0.0, 1.0),
        ParameterSpec::new("b", DistributionFamily::Normal, 0.0, 1.0),
    ];
    let blocks = vec![CorrelationBlock::pair("ab", "a", "b", 0.9)];
    let mut rng = StdRng::seed_from_u64(5);

    let out =
        sample_parameters(&specs, &blocks, 5000, SamplingMode::Independent, &mut rng).unwrap();
    let r = pearson(out.samples.column("a").unwrap(), out.samples.column("b").unwrap());
    assert!(r.abs() < 0.05);
}

/// Positive-definite correlation matrix from `A A^T + I/2`, rescaled to a unit
/// diagonal. `entries` holds `A` row-major.
fn correlation_from(entries: &[f64], dim: usize) -> Vec<Vec<f64>> {
    let cov: Vec<Vec<f64>> = (0..dim)
        .map(|i| {
            (0..dim)
                .map(|j| {
                    let dot: f64 = (0..dim)
                        .map(|k| entries[i * dim + k] * entries[j * dim + k])
                        .sum();
                    if i == j { dot + 0.5 } else { dot }
                })
                .collect()
        })
        .collect();
    (0..dim)
        .map(|i| {
            (0..dim)
                .map(|j| {
                    if i == j {
                        1.0
                    } else {
                        cov[i][j] / (cov[i][i] * cov[j][j]).sqrt()
                    }
                })
                .collect()
        })
        .collect()
}

fn block_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..=3).prop_flat_map(|dim| {
        prop::collection::vec(-1.0..1.0f64, dim * dim)
            .prop_map(move |entries| correlation_from(&entries, dim))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn correlated_sampling_reproduces_random_blocks(
        target in block_strategy(),
        seed in any::<u64>(),
    ) {
        let dim = target.len();
        let names: Vec<String> = (0..dim).map(|i| format!("x{i}")).collect();
        let specs: Vec<ParameterSpec> = names
            .iter()
            .map(|n| ParameterSpec::new(n.as_str(), DistributionFamily::Normal, 1.0, 0.5))
            .collect();
        let blocks = vec![CorrelationBlock::new("random", names.clone(), target.clone())];
        let mut rng = StdRng::seed_from_u64(seed);

        let out = sample_parameters(&specs, &blocks, 5000, SamplingMode::Correlated, &mut rng)
            .unwrap();
        prop_assert!(out.warnings.is_empty());

        for i in 0..dim {
            for j in (i + 1)..dim {
                let r = pearson(
                    out.samples.column(&names[i]).unwrap(),
                    out.samples.column(&names[j]).unwrap(),
                );
                prop_assert!(
                    (r - target[i][j]).abs() < 0.05,
                    "corr(x{}, x{}) = {}, target {}", i, j, r, target[i][j]
                );
            }
        }
    }
}
