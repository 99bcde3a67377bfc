//! CSV renderings of the run results
//!
//! Every table is rendered to bytes first so it can be written atomically.
//! Floats use Rust's shortest round-trip formatting; failed outcomes appear as
//! `NaN`.

use hecon_core::DecisionReport;
use hecon_core::model::{ParameterSamples, SimulationResult};

use crate::data::DataError;

fn render<I>(headers: &[&str], rows: I) -> Result<Vec<u8>, DataError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| DataError::Csv(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| DataError::Csv(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Csv(e.to_string()))
}

fn num(value: f64) -> String {
    value.to_string()
}

/// `iteration, arm, jurisdiction, perspective, cost, qaly`
pub fn psa_results_csv(result: &SimulationResult) -> Result<Vec<u8>, DataError> {
    render(
        &["iteration", "arm", "jurisdiction", "perspective", "cost", "qaly"],
        result.rows.iter().map(|row| {
            vec![
                row.iteration.to_string(),
                result.strategy_name(row.strategy).to_string(),
                result.jurisdiction_name(row.jurisdiction).to_string(),
                result.perspective_name(row.perspective).to_string(),
                num(row.cost),
                num(row.qaly),
            ]
        }),
    )
}

/// `iteration, <parameter>...`
pub fn parameter_samples_csv(samples: &ParameterSamples) -> Result<Vec<u8>, DataError> {
    let mut headers = vec!["iteration"];
    headers.extend(samples.names().iter().map(String::as_str));

    render(
        &headers,
        (0..samples.n_iterations()).map(|i| {
            let draw = samples.draw(i);
            std::iter::once(i.to_string())
                .chain(draw.iter().map(|(_, v)| num(v)))
                .collect()
        }),
    )
}

/// `jurisdiction, perspective, wtp, arm, prob_ce`
pub fn ceac_csv(reports: &[DecisionReport]) -> Result<Vec<u8>, DataError> {
    render(
        &["jurisdiction", "perspective", "wtp", "arm", "prob_ce"],
        reports.iter().flat_map(|r| {
            r.ceac.iter().map(move |(wtp, arm, p)| {
                vec![
                    r.jurisdiction.clone(),
                    r.perspective.clone(),
                    num(wtp),
                    arm.to_string(),
                    num(p),
                ]
            })
        }),
    )
}

/// `jurisdiction, perspective, wtp, arm, prob_optimal, expected_optimal, on_frontier`
pub fn ceaf_csv(reports: &[DecisionReport]) -> Result<Vec<u8>, DataError> {
    render(
        &[
            "jurisdiction",
            "perspective",
            "wtp",
            "arm",
            "prob_optimal",
            "expected_optimal",
            "on_frontier",
        ],
        reports.iter().flat_map(|r| {
            let curve = &r.ceaf.prob_optimal;
            let width = curve.strategies().len();
            (0..curve.wtp_grid().len()).flat_map(move |w| {
                (0..width).map(move |s| {
                    vec![
                        r.jurisdiction.clone(),
                        r.perspective.clone(),
                        num(curve.wtp_grid()[w]),
                        curve.strategies()[s].clone(),
                        num(curve.get(w, s)),
                        r.ceaf.is_expected_optimal(w, s).to_string(),
                        r.ceaf.on_frontier(s).to_string(),
                    ]
                })
            })
        }),
    )
}

/// `jurisdiction, perspective, arm, wtp, expected_regret`
pub fn regret_csv(reports: &[DecisionReport]) -> Result<Vec<u8>, DataError> {
    render(
        &["jurisdiction", "perspective", "arm", "wtp", "expected_regret"],
        reports.iter().flat_map(|r| arm_major_rows(r, &r.regret)),
    )
}

/// `jurisdiction, perspective, arm, wtp, dr_nmb`
pub fn dr_nmb_csv(reports: &[DecisionReport]) -> Result<Vec<u8>, DataError> {
    render(
        &["jurisdiction", "perspective", "arm", "wtp", "dr_nmb"],
        reports.iter().flat_map(|r| arm_major_rows(r, &r.dr_nmb)),
    )
}

fn arm_major_rows<'a>(
    report: &'a DecisionReport,
    curve: &'a hecon_core::decision::DecisionCurve,
) -> impl Iterator<Item = Vec<String>> + 'a {
    let n_wtp = curve.wtp_grid().len();
    (0..curve.strategies().len()).flat_map(move |s| {
        (0..n_wtp).map(move |w| {
            vec![
                report.jurisdiction.clone(),
                report.perspective.clone(),
                curve.strategies()[s].clone(),
                num(curve.wtp_grid()[w]),
                num(curve.get(w, s)),
            ]
        })
    })
}

/// `jurisdiction, perspective, wtp, evpi`
pub fn evpi_csv(reports: &[DecisionReport], wtp_grid: &[f64]) -> Result<Vec<u8>, DataError> {
    render(
        &["jurisdiction", "perspective", "wtp", "evpi"],
        reports.iter().flat_map(|r| {
            wtp_grid.iter().zip(&r.evpi).map(move |(&wtp, &v)| {
                vec![
                    r.jurisdiction.clone(),
                    r.perspective.clone(),
                    num(wtp),
                    num(v),
                ]
            })
        }),
    )
}

/// `jurisdiction, perspective, arm, mean_cost, mean_qaly, incremental_cost, incremental_qaly, icer`
pub fn summary_csv(reports: &[DecisionReport]) -> Result<Vec<u8>, DataError> {
    render(
        &[
            "jurisdiction",
            "perspective",
            "arm",
            "mean_cost",
            "mean_qaly",
            "incremental_cost",
            "incremental_qaly",
            "icer",
        ],
        reports.iter().flat_map(|r| {
            r.summary.iter().map(move |s| {
                vec![
                    r.jurisdiction.clone(),
                    r.perspective.clone(),
                    s.strategy.clone(),
                    num(s.mean_cost),
                    num(s.mean_qaly),
                    num(s.incremental_cost),
                    num(s.incremental_qaly),
                    s.icer.map(num).unwrap_or_default(),
                ]
            })
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hecon_core::error::{ModelError, SimulationError};
    use hecon_core::model::{JurisdictionId, OutcomeRow, PerspectiveId, StrategyId};

    fn result() -> SimulationResult {
        let row = |iteration, s, cost, qaly| OutcomeRow {
            iteration,
            strategy: StrategyId(s),
            jurisdiction: JurisdictionId(0),
            perspective: PerspectiveId(0),
            cost,
            qaly,
        };
        SimulationResult {
            strategies: vec!["ECT".into(), "IV_KA".into()],
            jurisdictions: vec!["AU".into()],
            perspectives: vec!["health_system".into()],
            n_iterations: 2,
            rows: vec![
                row(0, 0, 1000.0, 0.5),
                row(0, 1, 800.0, 0.55),
                row(1, 0, 1200.0, 0.45),
                row(1, 1, f64::NAN, f64::NAN),
            ],
            failures: vec![SimulationError {
                iteration: 1,
                strategy: "IV_KA".into(),
                jurisdiction: "AU".into(),
                perspective: "health_system".into(),
                source: ModelError::Failed("boom".into()),
            }],
        }
    }

    #[test]
    fn test_psa_results_layout() {
        let text = String::from_utf8(psa_results_csv(&result()).unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "iteration,arm,jurisdiction,perspective,cost,qaly");
        assert_eq!(lines[1], "0,ECT,AU,health_system,1000,0.5");
        assert_eq!(lines[4], "1,IV_KA,AU,health_system,NaN,NaN");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_parameter_samples_layout() {
        let samples = ParameterSamples::from_columns(
            vec!["param1".into(), "param2".into()],
            vec![vec![0.5, 0.25], vec![0.6, 0.7]],
        )
        .unwrap();
        let text = String::from_utf8(parameter_samples_csv(&samples).unwrap()).unwrap();
        assert_eq!(text, "iteration,param1,param2\n0,0.5,0.6\n1,0.25,0.7\n");
    }
}
