//! Criterion benchmarks for hecon_core sampling and decision analysis
//!
//! Run with: cargo bench -p hecon_core

use std::collections::BTreeMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hecon_core::decision::{ceac, ceaf, dr_nmb, expected_regret};
use hecon_core::model::{
    CorrelationBlock, DistributionFamily, JurisdictionId, ParameterSpec, PerspectiveId,
};
use hecon_core::outcome::{ArmModel, LinearTerm};
use hecon_core::sampling::{SamplingMode, sample_parameters};
use hecon_core::{LinearOutcomeModel, PsaConfig, TieBreak, run_psa};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn parameters() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("c_a", DistributionFamily::Gamma, 450.0, 60.0),
        ParameterSpec::new("c_b", DistributionFamily::Gamma, 800.0, 100.0),
        ParameterSpec::new("p_a", DistributionFamily::Beta, 0.45, 0.06),
        ParameterSpec::new("p_b", DistributionFamily::Beta, 0.55, 0.05),
        ParameterSpec::new("hr", DistributionFamily::LogNormal, 0.0, 0.1),
        ParameterSpec::new("u", DistributionFamily::Normal, 0.8, 0.04),
    ]
}

fn blocks() -> Vec<CorrelationBlock> {
    vec![
        CorrelationBlock::pair("costs", "c_a", "c_b", 0.5),
        CorrelationBlock::new(
            "efficacy",
            vec!["p_a".into(), "p_b".into(), "hr".into()],
            vec![
                vec![1.0, 0.6, -0.3],
                vec![0.6, 1.0, 0.2],
                vec![-0.3, 0.2, 1.0],
            ],
        ),
    ]
}

fn config(n_iterations: usize) -> PsaConfig {
    PsaConfig {
        n_iterations,
        correlated_psa: true,
        seed: 42,
        wtp_grid: (0..=20).map(|i| f64::from(i) * 5_000.0).collect(),
        strategies: vec!["A".into(), "B".into(), "C".into()],
        base_strategy: "A".into(),
        jurisdictions: vec!["AU".into(), "NZ".into()],
        perspectives: vec!["health_system".into(), "societal".into()],
        ..Default::default()
    }
}

fn model() -> LinearOutcomeModel {
    let arm = |cost: &str, qaly: &str| ArmModel {
        cost: LinearTerm::constant(1000.0).with_term(cost, 8.0),
        qaly: LinearTerm::constant(0.5).with_term(qaly, 0.3).with_term("u", 0.05),
    };
    let mut arms = BTreeMap::new();
    arms.insert("A".to_string(), arm("c_a", "p_a"));
    arms.insert("B".to_string(), arm("c_b", "p_b"));
    arms.insert("C".to_string(), arm("c_b", "p_a"));
    LinearOutcomeModel {
        arms,
        ..Default::default()
    }
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let specs = parameters();
    let blocks = blocks();

    for n in [1_000usize, 10_000] {
        for mode in [SamplingMode::Independent, SamplingMode::Correlated] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), n),
                &n,
                |b, &n| {
                    b.iter(|| {
                        let mut rng = StdRng::seed_from_u64(7);
                        sample_parameters(
                            black_box(&specs),
                            black_box(&blocks),
                            n,
                            mode,
                            &mut rng,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_decision(c: &mut Criterion) {
    let config = config(5_000);
    let Ok(run) = run_psa(&config, &parameters(), &blocks(), &model()) else {
        return;
    };
    let slice = run.outcomes.slice(JurisdictionId(0), PerspectiveId(0));
    let wtp = config.wtp_grid.as_slice();

    let mut group = c.benchmark_group("decision");
    group.bench_function("ceac_split", |b| {
        b.iter(|| ceac(black_box(&slice), black_box(wtp), TieBreak::Split))
    });
    group.bench_function("ceaf", |b| b.iter(|| ceaf(black_box(&slice), black_box(wtp))));
    group.bench_function("expected_regret", |b| {
        b.iter(|| expected_regret(black_box(&slice), black_box(wtp)))
    });
    group.bench_function("dr_nmb_100", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(3);
            dr_nmb(black_box(&slice), black_box(wtp), 100, &mut rng)
        })
    });
    group.finish();
}

fn bench_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_psa");
    group.sample_size(10);
    let specs = parameters();
    let blocks = blocks();
    let model = model();

    for n in [1_000usize, 5_000] {
        let config = config(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &config, |b, config| {
            b.iter(|| run_psa(black_box(config), &specs, &blocks, &model))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sampling, bench_decision, bench_full_run);
criterion_main!(benches);
