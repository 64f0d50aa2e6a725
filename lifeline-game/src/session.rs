//! Session façade wiring roster, progression, navigator, hold and clock.
use serde::Serialize;
use smallvec::SmallVec;
use std::time::Duration;

use crate::assembly::assemble_profile;
use crate::body::BodyDiagram;
use crate::catalog::IncidentCatalog;
use crate::clock::FixedStep;
use crate::colonist::{ColonistId, MissionStatus, Roster};
use crate::constants::{LOG_SPAWN_ASSEMBLED, LOG_SPAWN_UNKNOWN_TEMPLATE};
use crate::hold::{FinalizeAction, FinalizeRecord, Hold, HoldError};
use crate::incident::IncidentTemplate;
use crate::navigator::{NavRow, SelectionNavigator, SelectionOutcome};
use crate::profile::ProfileSnapshot;
use crate::progression::{ProgressionEngine, RegionAddress, TickOutcome};
use crate::rng::SpawnRng;

/// Regions that reached their target during one host frame.
pub type StabilizedSet = SmallVec<[RegionAddress; 2]>;

/// Summary of one [`TriageSession::update`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameReport {
    pub ticks: u32,
    pub stabilized: StabilizedSet,
    /// A profile became ready to finalize during this frame.
    pub profile_ready: bool,
}

/// One rescue run: every colonist spawned, plus the single navigator and
/// progression engine that act on them.
#[derive(Debug, Clone)]
pub struct TriageSession {
    catalog: IncidentCatalog,
    spawn_rng: SpawnRng,
    roster: Roster,
    engine: ProgressionEngine,
    navigator: SelectionNavigator,
    hold: Hold,
    clock: FixedStep,
}

impl TriageSession {
    #[must_use]
    pub fn new(catalog: IncidentCatalog, seed: u64) -> Self {
        Self {
            catalog,
            spawn_rng: SpawnRng::from_user_seed(seed),
            roster: Roster::new(),
            engine: ProgressionEngine::new(),
            navigator: SelectionNavigator::new(),
            hold: Hold::default(),
            clock: FixedStep::default(),
        }
    }

    #[must_use]
    pub fn with_hold(mut self, hold: Hold) -> Self {
        self.hold = hold;
        self
    }

    #[must_use]
    pub const fn with_clock(mut self, clock: FixedStep) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.spawn_rng.seed()
    }

    #[must_use]
    pub const fn catalog(&self) -> &IncidentCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    #[must_use]
    pub const fn navigator(&self) -> &SelectionNavigator {
        &self.navigator
    }

    #[must_use]
    pub const fn hold(&self) -> &Hold {
        &self.hold
    }

    #[must_use]
    pub const fn clock(&self) -> &FixedStep {
        &self.clock
    }

    /// Spawn the catalog colonist `template_id` with freshly assembled injuries.
    pub fn spawn_colonist(&mut self, template_id: &str) -> Option<ColonistId> {
        let Some(template) = self.catalog.find_colonist(template_id) else {
            log::warn!("{LOG_SPAWN_UNKNOWN_TEMPLATE} template={template_id:?}");
            return None;
        };
        let incidents = self.catalog.resolve(template);
        let id = self.roster.next_id();
        let mut rng = self.spawn_rng.colonist_stream(id);
        let profile = assemble_profile(incidents, &mut rng);
        log::debug!(
            "{LOG_SPAWN_ASSEMBLED} colonist={id} template={template_id:?} incidents={} draws={}",
            profile.incident_count(),
            rng.draws()
        );
        Some(
            self.roster
                .spawn(template.name.clone(), template.id.clone(), profile),
        )
    }

    /// Spawn a colonist from ad-hoc templates that are not in the catalog.
    pub fn spawn_with_templates(
        &mut self,
        name: &str,
        templates: &[IncidentTemplate],
    ) -> ColonistId {
        let id = self.roster.next_id();
        let mut rng = self.spawn_rng.colonist_stream(id);
        let profile = assemble_profile(templates, &mut rng);
        self.roster.spawn(name, "custom", profile)
    }

    /// Spawn one colonist per catalog entry, in catalog order.
    pub fn spawn_all(&mut self) -> Vec<ColonistId> {
        let ids: Vec<String> = self
            .catalog
            .colonists
            .iter()
            .map(|colonist| colonist.id.clone())
            .collect();
        ids.iter()
            .filter_map(|id| self.spawn_colonist(id))
            .collect()
    }

    /// Point the navigator at `colonist`, pausing anyone else's progress.
    pub fn display_colonist(&mut self, colonist: ColonistId) -> bool {
        self.navigator
            .display(colonist, &self.roster, &mut self.engine)
    }

    #[must_use]
    pub const fn displayed(&self) -> Option<ColonistId> {
        self.navigator.colonist()
    }

    pub fn scroll(&mut self, direction: i32) -> bool {
        self.navigator.scroll(&mut self.roster, direction)
    }

    pub fn highlight_incident(&mut self, index: usize) -> bool {
        self.navigator.highlight_incident(&mut self.roster, index)
    }

    pub fn perform_selection(&mut self) -> SelectionOutcome {
        self.navigator
            .perform_selection(&self.roster, &mut self.engine)
    }

    pub fn collapse(&mut self) -> bool {
        self.navigator.collapse()
    }

    pub fn stop_progress(&mut self) -> Option<RegionAddress> {
        self.engine.stop()
    }

    /// Run a single fixed tick.
    pub fn tick(&mut self) -> TickOutcome {
        let dt = self.clock.step_seconds();
        self.engine.advance(&mut self.roster, dt)
    }

    /// Advance the active target by an arbitrary slice, bypassing the clock.
    pub fn advance(&mut self, dt: f32) -> TickOutcome {
        self.engine.advance(&mut self.roster, dt)
    }

    /// Bank a host frame and run the fixed ticks it pays for.
    pub fn update(&mut self, frame: Duration) -> FrameReport {
        let ticks = self.clock.accumulate(frame);
        let mut report = FrameReport {
            ticks,
            ..FrameReport::default()
        };
        for _ in 0..ticks {
            if let TickOutcome::Stabilized {
                target,
                profile_ready,
                ..
            } = self.tick()
            {
                report.stabilized.push(target);
                report.profile_ready |= profile_ready;
            }
        }
        report
    }

    /// The displayed colonist may be ejected or transmitted.
    #[must_use]
    pub fn ready_to_finalize(&self) -> bool {
        self.navigator.ready_to_finalize(&self.roster)
    }

    /// Totals for the displayed colonist.
    #[must_use]
    pub fn snapshot(&self) -> Option<ProfileSnapshot> {
        self.displayed().and_then(|id| self.colonist_snapshot(id))
    }

    #[must_use]
    pub fn colonist_snapshot(&self, colonist: ColonistId) -> Option<ProfileSnapshot> {
        self.roster.profile(colonist).map(|profile| profile.snapshot())
    }

    #[must_use]
    pub fn body_diagram(&self) -> Option<BodyDiagram> {
        self.displayed()
            .and_then(|id| self.roster.profile(id))
            .map(|profile| profile.body_diagram())
    }

    #[must_use]
    pub fn rows(&self) -> Vec<NavRow> {
        self.navigator.rows(&self.roster)
    }

    /// Move an in-world colonist into the hold.
    ///
    /// # Errors
    ///
    /// See [`Hold::collect`].
    pub fn collect(&mut self, colonist: ColonistId) -> Result<(), HoldError> {
        self.hold.collect(&mut self.roster, colonist)
    }

    /// Eject or transmit a carried, fully stabilized colonist.
    ///
    /// # Errors
    ///
    /// See [`Hold::finalize`].
    pub fn finalize(
        &mut self,
        colonist: ColonistId,
        action: FinalizeAction,
    ) -> Result<FinalizeRecord, HoldError> {
        let record = self.hold.finalize(&mut self.roster, colonist, action)?;
        self.engine.stop_for(colonist);
        if self.navigator.colonist() == Some(colonist) {
            self.navigator.release();
        }
        Ok(record)
    }

    #[must_use]
    pub fn mission_status(&self) -> MissionStatus {
        self.roster.mission_status()
    }
}
