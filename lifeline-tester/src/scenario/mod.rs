use anyhow::{Result, ensure};

use crate::logic::{PolicyKind, SimulationPlan, SimulationSummary, run_plan};

/// A named simulation plan plus the expectations that make it a test.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

const SCENARIOS: &[(&str, &str)] = &[
    ("smoke", "Autopilot collects, stabilizes and transmits every colonist"),
    (
        "chaos",
        "Random and malformed input never breaks a structural invariant",
    ),
    (
        "determinism",
        "Two runs on the same seed finalize identically",
    ),
    (
        "tight-hold",
        "A one-slot hold still clears the whole roster",
    ),
    (
        "stress",
        "Long chaos run that must keep every invariant",
    ),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.to_vec()
}

#[must_use]
pub fn scenario_keys() -> Vec<String> {
    SCENARIOS.iter().map(|(key, _)| (*key).to_string()).collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.to_lowercase();
    let (key, description) = SCENARIOS.iter().find(|(k, _)| *k == key).copied()?;
    let plan = match key {
        "smoke" => SimulationPlan::new(PolicyKind::Autopilot).with_expectation(expect_full_rescue),
        "chaos" => SimulationPlan::new(PolicyKind::Chaos).with_max_steps(4_000),
        "determinism" => {
            SimulationPlan::new(PolicyKind::Autopilot).with_expectation(expect_reproducible)
        }
        "tight-hold" => SimulationPlan::new(PolicyKind::Autopilot)
            .with_hold_capacity(1)
            .with_expectation(expect_full_rescue)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                ensure!(
                    summary.max_carried <= 1,
                    "hold carried {} colonists",
                    summary.max_carried
                );
                Ok(())
            }),
        "stress" => SimulationPlan::new(PolicyKind::Chaos).with_max_steps(20_000),
        _ => return None,
    };
    Some(TestScenario {
        key,
        name: display_name(key),
        description,
        plan,
    })
}

fn display_name(key: &str) -> String {
    key.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn expect_full_rescue(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.policy_finished,
        "policy still busy after {} steps",
        summary.steps
    );
    ensure!(summary.mission_complete, "mission incomplete");
    ensure!(
        summary.finalized.len() == summary.colonists,
        "finalized {} of {} colonists",
        summary.finalized.len(),
        summary.colonists
    );
    for record in &summary.finalized {
        ensure!(
            (record.total_progress - record.total_target_time).abs() <= 1.0e-3,
            "{} finalized at {}/{}",
            record.colonist,
            record.total_progress,
            record.total_target_time
        );
    }
    Ok(())
}

fn expect_reproducible(summary: &SimulationSummary) -> Result<()> {
    let rerun = run_plan(&SimulationPlan::new(PolicyKind::Autopilot), summary.seed)?;
    ensure!(
        rerun.steps == summary.steps && rerun.ticks == summary.ticks,
        "rerun took {} steps / {} ticks, first run {} / {}",
        rerun.steps,
        rerun.ticks,
        summary.steps,
        summary.ticks
    );
    ensure!(
        rerun.finalized == summary.finalized,
        "finalize records differ between runs"
    );
    Ok(())
}
