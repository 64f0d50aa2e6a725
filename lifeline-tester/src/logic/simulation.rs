use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use lifeline_game::{
    FinalizeRecord, Hold, NavMode, SelectionOutcome, StaticLoader, TriageEngine, TriageSession,
};

use crate::logic::policy::{Input, InputPolicy, PolicyKind};

/// Host frame length fed to the session clock each step.
pub const FRAME: Duration = Duration::from_micros(16_667);
pub const DEFAULT_MAX_STEPS: usize = 60_000;
const SUM_TOLERANCE: f32 = 1.0e-3;

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// # Errors
    ///
    /// Returns the expectation's failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// What to run and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub policy: PolicyKind,
    pub max_steps: usize,
    pub hold_capacity: Option<usize>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(policy: PolicyKind) -> Self {
        Self {
            policy,
            max_steps: DEFAULT_MAX_STEPS,
            hold_capacity: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub const fn with_hold_capacity(mut self, capacity: usize) -> Self {
        self.hold_capacity = Some(capacity);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Everything observed during one run.
#[derive(Debug, Clone, Default)]
pub struct SimulationSummary {
    pub seed: u64,
    pub policy: String,
    pub steps: usize,
    pub ticks: u64,
    pub colonists: usize,
    pub stabilized_regions: usize,
    pub rejected_inputs: usize,
    pub max_carried: usize,
    pub finalized: Vec<FinalizeRecord>,
    pub mission_complete: bool,
    pub policy_finished: bool,
    pub violations: Vec<String>,
}

/// Open a session on the bundled catalog and drive it with `plan`'s policy.
///
/// # Errors
///
/// Returns an error if the session cannot be opened.
pub fn run_plan(plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
    let mut session = TriageEngine::new(StaticLoader)
        .open_validated_session(seed)
        .context("opening triage session")?;
    if let Some(capacity) = plan.hold_capacity {
        session = session.with_hold(Hold::with_capacity(capacity));
    }
    let ids = session.spawn_all();
    let mut policy = plan.policy.create_policy(seed);

    let mut summary = SimulationSummary {
        seed,
        policy: policy.name().to_string(),
        colonists: ids.len(),
        ..SimulationSummary::default()
    };

    for step in 0..plan.max_steps {
        let Some(input) = policy.next_input(&session) else {
            summary.policy_finished = true;
            break;
        };
        summary.steps = step + 1;
        if !apply_input(&mut session, input, &mut summary) {
            summary.rejected_inputs += 1;
        }

        let before = progress_vector(&session);
        let report = session.update(FRAME);
        let after = progress_vector(&session);
        summary.ticks += u64::from(report.ticks);
        summary.stabilized_regions += report.stabilized.len();
        summary.max_carried = summary.max_carried.max(session.hold().len());

        let moved = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        if moved > 1 {
            summary
                .violations
                .push(format!("step {step}: {moved} regions advanced in one frame"));
        }
        for violation in check_invariants(&session) {
            summary.violations.push(format!("step {step}: {violation}"));
        }
        if !summary.violations.is_empty() {
            log::warn!("stopping run seed={seed} after invariant violation");
            break;
        }
    }

    summary.mission_complete = session.mission_status().is_complete();
    Ok(summary)
}

/// Send one input to the session. Returns false when it was ignored or rejected.
fn apply_input(
    session: &mut TriageSession,
    input: Input,
    summary: &mut SimulationSummary,
) -> bool {
    match input {
        Input::Display(id) => session.display_colonist(id),
        Input::Scroll(direction) => session.scroll(direction),
        Input::Select => session.perform_selection() != SelectionOutcome::Ignored,
        Input::Collapse => session.collapse(),
        Input::Stop => session.stop_progress().is_some(),
        Input::Highlight(index) => session.highlight_incident(index),
        Input::Collect(id) => session.collect(id).is_ok(),
        Input::Finalize(id, action) => match session.finalize(id, action) {
            Ok(record) => {
                summary.finalized.push(record);
                true
            }
            Err(_) => false,
        },
        Input::Wait => true,
    }
}

fn progress_vector(session: &TriageSession) -> Vec<f32> {
    session
        .roster()
        .iter()
        .flat_map(|colonist| colonist.profile().incidents())
        .flat_map(|incident| incident.regions().iter().map(|region| region.progress()))
        .collect()
}

/// Every structural invariant of the session that can be read from outside.
#[must_use]
pub fn check_invariants(session: &TriageSession) -> Vec<String> {
    let mut violations = Vec::new();
    for colonist in session.roster().iter() {
        let id = colonist.id();
        let profile = colonist.profile();
        let mut total = 0.0_f32;
        for (i, incident) in profile.incidents().iter().enumerate() {
            let mut categories = HashSet::new();
            let mut sum = 0.0_f32;
            for (r, region) in incident.regions().iter().enumerate() {
                if !categories.insert(region.category()) {
                    violations.push(format!(
                        "{id} incident {i}: duplicate {:?}",
                        region.category()
                    ));
                }
                if region.progress() < 0.0 || region.progress() > region.target_time() {
                    violations.push(format!(
                        "{id} region {i}/{r}: progress {} outside 0..={}",
                        region.progress(),
                        region.target_time()
                    ));
                }
                let at_target = region.progress() == region.target_time();
                if !region.is_inert() && region.is_stabilized() != at_target {
                    violations.push(format!(
                        "{id} region {i}/{r}: status {:?} with progress {}/{}",
                        region.status(),
                        region.progress(),
                        region.target_time()
                    ));
                }
                sum += region.progress();
            }
            if (incident.progress() - sum).abs() > SUM_TOLERANCE {
                violations.push(format!(
                    "{id} incident {i}: progress {} != region sum {sum}",
                    incident.progress()
                ));
            }
            if incident.stabilized_count() > incident.total_injured_count() {
                violations.push(format!("{id} incident {i}: stabilized count exceeds injured"));
            }
            total += incident.progress();
        }
        if (profile.total_progress() - total).abs() > SUM_TOLERANCE {
            violations.push(format!(
                "{id}: total progress {} != incident sum {total}",
                profile.total_progress()
            ));
        }
    }

    if let Some(id) = session.displayed()
        && let Some(profile) = session.roster().profile(id)
    {
        let nav = session.navigator();
        let count = profile.incident_count();
        if count > 0 && nav.selected_incident() >= count {
            violations.push(format!(
                "navigator incident cursor {} out of {count}",
                nav.selected_incident()
            ));
        }
        if nav.mode() == NavMode::BrowsingRegions {
            let regions = nav
                .expanded_incident()
                .and_then(|i| profile.incident(i))
                .map_or(0, |incident| incident.region_count());
            if nav.selected_region() >= regions {
                violations.push(format!(
                    "navigator region cursor {} out of {regions}",
                    nav.selected_region()
                ));
            }
        }
    }

    if session.hold().len() > session.hold().capacity() {
        violations.push("hold over capacity".to_string());
    }

    if let Some(target) = session.engine().active() {
        let live = session
            .roster()
            .get(target.colonist)
            .filter(|colonist| colonist.in_care())
            .and_then(|colonist| colonist.profile().incident(target.incident))
            .and_then(|incident| incident.region(target.region))
            .is_some_and(|region| region.is_interactive());
        if !live {
            violations.push(format!("active target {target:?} is not progressable"));
        }
    }
    violations
}
