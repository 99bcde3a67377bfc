//! Outcome models
//!
//! An [`OutcomeModel`] turns one iteration's parameter vector into a cost and a
//! QALY for a given strategy, jurisdiction and perspective. Evaluation must be a
//! pure function of its inputs: the simulator calls it from several threads
//! and in no particular order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::PsaConfig;
use crate::error::{ConfigError, ModelError};
use crate::model::ParameterDraw;

/// The identifiers an outcome is evaluated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario<'a> {
    pub strategy: &'a str,
    pub jurisdiction: &'a str,
    pub perspective: &'a str,
}

/// Realized cost and effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub cost: f64,
    pub qaly: f64,
}

impl Outcome {
    #[must_use]
    pub fn new(cost: f64, qaly: f64) -> Self {
        Self { cost, qaly }
    }
}

/// Cost/effect model evaluated once per (iteration, strategy, jurisdiction, perspective)
pub trait OutcomeModel: Sync {
    fn evaluate(
        &self,
        draw: &ParameterDraw<'_>,
        scenario: &Scenario<'_>,
    ) -> Result<Outcome, ModelError>;

    /// Check the model against the run configuration and parameter names
    /// before sampling. The default accepts everything.
    fn validate(&self, _config: &PsaConfig, _parameters: &[&str]) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// `intercept + sum(coefficient * parameter)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearTerm {
    pub intercept: f64,
    pub terms: BTreeMap<String, f64>,
}

impl LinearTerm {
    #[must_use]
    pub fn constant(intercept: f64) -> Self {
        Self {
            intercept,
            terms: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_term(mut self, parameter: impl Into<String>, coefficient: f64) -> Self {
        self.terms.insert(parameter.into(), coefficient);
        self
    }

    pub fn evaluate(&self, draw: &ParameterDraw<'_>) -> Result<f64, ModelError> {
        let mut value = self.intercept;
        for (parameter, coefficient) in &self.terms {
            let x = draw
                .get(parameter)
                .ok_or_else(|| ModelError::MissingParameter(parameter.clone()))?;
            value += coefficient * x;
        }
        Ok(value)
    }

    fn parameters(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }
}

/// Cost and QALY of one strategy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmModel {
    pub cost: LinearTerm,
    pub qaly: LinearTerm,
}

/// Jurisdiction-level price adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JurisdictionModel {
    pub cost_multiplier: f64,
}

impl Default for JurisdictionModel {
    fn default() -> Self {
        Self {
            cost_multiplier: 1.0,
        }
    }
}

/// Costs a perspective adds on top of the arm's cost (e.g. productivity loss)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveModel {
    pub extra_cost: LinearTerm,
}

/// Linear cost/QALY model keyed by strategy, jurisdiction and perspective name.
///
/// `cost = (arm.cost + perspective.extra_cost) * jurisdiction.cost_multiplier`,
/// `qaly = arm.qaly`. Jurisdictions and perspectives without an entry use the
/// neutral defaults (multiplier 1, no extra cost).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearOutcomeModel {
    pub arms: BTreeMap<String, ArmModel>,
    #[serde(default)]
    pub jurisdictions: BTreeMap<String, JurisdictionModel>,
    #[serde(default)]
    pub perspectives: BTreeMap<String, PerspectiveModel>,
}

impl OutcomeModel for LinearOutcomeModel {
    fn evaluate(
        &self,
        draw: &ParameterDraw<'_>,
        scenario: &Scenario<'_>,
    ) -> Result<Outcome, ModelError> {
        let arm = self
            .arms
            .get(scenario.strategy)
            .ok_or_else(|| ModelError::UnknownStrategy(scenario.strategy.to_string()))?;

        let multiplier = self
            .jurisdictions
            .get(scenario.jurisdiction)
            .map_or(1.0, |j| j.cost_multiplier);
        let extra_cost = match self.perspectives.get(scenario.perspective) {
            Some(p) => p.extra_cost.evaluate(draw)?,
            None => 0.0,
        };

        let cost = (arm.cost.evaluate(draw)? + extra_cost) * multiplier;
        let qaly = arm.qaly.evaluate(draw)?;

        if !cost.is_finite() {
            return Err(ModelError::NonFinite {
                quantity: "cost",
                value: cost,
            });
        }
        if !qaly.is_finite() {
            return Err(ModelError::NonFinite {
                quantity: "qaly",
                value: qaly,
            });
        }

        Ok(Outcome::new(cost, qaly))
    }

    fn validate(&self, config: &PsaConfig, parameters: &[&str]) -> Result<(), ConfigError> {
        for strategy in &config.strategies {
            if !self.arms.contains_key(strategy) {
                return Err(ConfigError::MissingArmModel(strategy.clone()));
            }
        }
        check_keys("arms", self.arms.keys(), &config.strategies)?;
        check_keys(
            "jurisdictions",
            self.jurisdictions.keys(),
            &config.jurisdictions,
        )?;
        check_keys("perspectives", self.perspectives.keys(), &config.perspectives)?;

        for (name, j) in &self.jurisdictions {
            if !j.cost_multiplier.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "jurisdiction '{name}' has non-finite cost_multiplier"
                )));
            }
        }

        let known = |context: String, term: &LinearTerm| -> Result<(), ConfigError> {
            match term.parameters().find(|p| !parameters.contains(p)) {
                Some(p) => Err(ConfigError::UnknownParameter {
                    context,
                    parameter: p.to_string(),
                }),
                None => Ok(()),
            }
        };
        for (name, arm) in &self.arms {
            known(format!("cost of arm '{name}'"), &arm.cost)?;
            known(format!("qaly of arm '{name}'"), &arm.qaly)?;
        }
        for (name, perspective) in &self.perspectives {
            known(
                format!("extra_cost of perspective '{name}'"),
                &perspective.extra_cost,
            )?;
        }

        Ok(())
    }
}

fn check_keys<'a>(
    section: &'static str,
    keys: impl Iterator<Item = &'a String>,
    configured: &[String],
) -> Result<(), ConfigError> {
    for key in keys {
        if !configured.contains(key) {
            return Err(ConfigError::UnknownModelKey {
                section,
                key: key.clone(),
            });
        }
    }
    Ok(())
}
