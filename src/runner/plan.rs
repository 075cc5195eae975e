use anyhow::Result;

use crate::parser::{Feature, Step};
use crate::steps::{ResolvedStep, StepRegistry};

/// A feature step bound to its definition
#[derive(Debug, Clone)]
pub struct PlannedStep {
    pub display: String,
    pub line: usize,
    pub resolved: ResolvedStep,
}

/// A scenario ready to execute: background steps followed by its own
#[derive(Debug, Clone)]
pub struct PlannedScenario {
    pub feature_name: String,
    pub feature_path: String,
    pub scenario_name: String,
    pub steps: Vec<PlannedStep>,
}

/// Resolve every step of every selected scenario up front
///
/// All undefined and ambiguous steps are reported together, so nothing
/// launches a browser for a run that cannot finish.
pub fn plan_scenarios(
    features: &[Feature],
    registry: &StepRegistry,
    tags: &[String],
) -> Result<Vec<PlannedScenario>> {
    let mut planned = Vec::new();
    let mut problems = Vec::new();

    for feature in features {
        let feature_path = feature.path.display().to_string();

        let mut resolve = |step: &Step| {
            let resolved = match &step.argument {
                Some(argument) => Err(format!(
                    "step `{}` does not take {}",
                    step.text,
                    argument.describe()
                )),
                None => registry.resolve(&step.text).map_err(|e| e.to_string()),
            };
            match resolved {
                Ok(resolved) => Some(PlannedStep {
                    display: step.display(),
                    line: step.line,
                    resolved,
                }),
                Err(e) => {
                    // Background steps are seen once per scenario
                    let problem = format!("{}:{}: {}", feature_path, step.line, e);
                    if !problems.contains(&problem) {
                        problems.push(problem);
                    }
                    None
                }
            }
        };

        for scenario in feature.scenarios_matching(tags) {
            let steps: Vec<Option<PlannedStep>> = scenario
                .background
                .iter()
                .chain(scenario.steps.iter())
                .map(&mut resolve)
                .collect();

            planned.push(PlannedScenario {
                feature_name: feature.name.clone(),
                feature_path: feature_path.clone(),
                scenario_name: scenario.name.clone(),
                steps: steps.into_iter().flatten().collect(),
            });
        }
    }

    if !problems.is_empty() {
        anyhow::bail!(
            "{} step(s) could not be resolved:\n  {}",
            problems.len(),
            problems.join("\n  ")
        );
    }

    Ok(planned)
}
