//! Tick-driven stabilization of the single active region.
//!
//! The engine holds at most one target across all colonists. Starting a new
//! target commits whatever the previous one accrued; nothing is ever rolled
//! back.
use serde::Serialize;
use thiserror::Error;

use crate::body::RegionCategory;
use crate::colonist::{ColonistId, Roster};
use crate::constants::{
    LOG_PROGRESS_REJECTED, LOG_PROGRESS_STABILIZED, LOG_PROGRESS_STALE, LOG_PROGRESS_START,
    LOG_PROGRESS_STOP, LOG_PROGRESS_SWITCH,
};
use crate::numbers::positive_seconds;
use crate::region::RegionAdvance;

/// Fully qualified path to one region of one colonist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegionAddress {
    pub colonist: ColonistId,
    pub incident: usize,
    pub region: usize,
}

impl RegionAddress {
    #[must_use]
    pub const fn new(colonist: ColonistId, incident: usize, region: usize) -> Self {
        Self {
            colonist,
            incident,
            region,
        }
    }
}

/// Reasons a region cannot become the active target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("{colonist} is not in the roster")]
    UnknownColonist { colonist: ColonistId },
    #[error("{colonist} has left player control")]
    Finalized { colonist: ColonistId },
    #[error("incident {incident} out of range (count {count})")]
    IncidentOutOfRange { incident: usize, count: usize },
    #[error("region {region} out of range (count {count})")]
    RegionOutOfRange { region: usize, count: usize },
    #[error("region {category:?} has no positive target time")]
    InertRegion { category: RegionCategory },
    #[error("region {category:?} is already stabilized")]
    AlreadyStabilized { category: RegionCategory },
}

/// Result of a successful [`ProgressionEngine::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartOutcome {
    /// Nothing was active before.
    Started,
    /// A different region was paused with its progress committed.
    Switched { previous: RegionAddress },
    /// The addressed region was already the active target.
    AlreadyActive,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TickOutcome {
    /// No target, or the slice was empty.
    Idle,
    Progressed {
        target: RegionAddress,
        applied: f32,
    },
    /// The target reached its goal and the engine went idle.
    Stabilized {
        target: RegionAddress,
        incident_complete: bool,
        profile_ready: bool,
    },
}

/// Owner of the single active progression target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressionEngine {
    active: Option<RegionAddress>,
}

impl ProgressionEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    #[must_use]
    pub const fn active(&self) -> Option<RegionAddress> {
        self.active
    }

    #[must_use]
    pub fn is_active_for(&self, colonist: ColonistId) -> bool {
        self.active.is_some_and(|target| target.colonist == colonist)
    }

    /// Make `address` the active target.
    ///
    /// # Errors
    ///
    /// Returns a [`ProgressError`] when the address does not resolve to an
    /// interactive region of a colonist still in care. The current target is
    /// left untouched in that case.
    pub fn start(
        &mut self,
        roster: &Roster,
        address: RegionAddress,
    ) -> Result<StartOutcome, ProgressError> {
        if let Err(err) = validate_target(roster, address) {
            log::warn!("{LOG_PROGRESS_REJECTED} target={address:?} reason={err}");
            return Err(err);
        }
        let outcome = match self.active {
            Some(current) if current == address => StartOutcome::AlreadyActive,
            Some(previous) => {
                log::debug!("{LOG_PROGRESS_SWITCH} from={previous:?} to={address:?}");
                StartOutcome::Switched { previous }
            }
            None => {
                log::debug!("{LOG_PROGRESS_START} target={address:?}");
                StartOutcome::Started
            }
        };
        self.active = Some(address);
        Ok(outcome)
    }

    /// Pause the active target, keeping its progress. Returns what was paused.
    pub fn stop(&mut self) -> Option<RegionAddress> {
        let previous = self.active.take();
        if let Some(target) = previous {
            log::debug!("{LOG_PROGRESS_STOP} target={target:?}");
        }
        previous
    }

    /// Pause only if the active target belongs to `colonist`.
    pub fn stop_for(&mut self, colonist: ColonistId) -> Option<RegionAddress> {
        if self.is_active_for(colonist) {
            self.stop()
        } else {
            None
        }
    }

    /// Feed `dt` seconds into the active target and propagate the sums.
    pub fn advance(&mut self, roster: &mut Roster, dt: f32) -> TickOutcome {
        let Some(target) = self.active else {
            return TickOutcome::Idle;
        };
        if positive_seconds(dt).is_none() {
            return TickOutcome::Idle;
        }
        let Some(profile) = roster
            .get_mut(target.colonist)
            .filter(|colonist| colonist.in_care())
            .map(|colonist| colonist.profile_mut())
        else {
            log::warn!("{LOG_PROGRESS_STALE} target={target:?} colonist unavailable");
            self.active = None;
            return TickOutcome::Idle;
        };
        match profile.advance_region(target.incident, target.region, dt) {
            Some(RegionAdvance::Progressed { applied }) => {
                TickOutcome::Progressed { target, applied }
            }
            Some(RegionAdvance::Stabilized { .. }) => {
                self.active = None;
                let incident_complete = profile
                    .incident(target.incident)
                    .is_some_and(|incident| incident.is_complete());
                let profile_ready = profile.ready_to_finalize();
                log::debug!(
                    "{LOG_PROGRESS_STABILIZED} target={target:?} incident_complete={incident_complete} profile_ready={profile_ready}"
                );
                TickOutcome::Stabilized {
                    target,
                    incident_complete,
                    profile_ready,
                }
            }
            Some(RegionAdvance::Rejected) | None => {
                log::warn!("{LOG_PROGRESS_STALE} target={target:?} no longer progressable");
                self.active = None;
                TickOutcome::Idle
            }
        }
    }
}

fn validate_target(roster: &Roster, address: RegionAddress) -> Result<(), ProgressError> {
    let colonist = roster
        .get(address.colonist)
        .ok_or(ProgressError::UnknownColonist {
            colonist: address.colonist,
        })?;
    if !colonist.in_care() {
        return Err(ProgressError::Finalized {
            colonist: address.colonist,
        });
    }
    let profile = colonist.profile();
    let incident = profile
        .incident(address.incident)
        .ok_or(ProgressError::IncidentOutOfRange {
            incident: address.incident,
            count: profile.incident_count(),
        })?;
    let region = incident
        .region(address.region)
        .ok_or(ProgressError::RegionOutOfRange {
            region: address.region,
            count: incident.region_count(),
        })?;
    if region.is_stabilized() {
        return Err(ProgressError::AlreadyStabilized {
            category: region.category(),
        });
    }
    if region.is_inert() {
        return Err(ProgressError::InertRegion {
            category: region.category(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RegionStatus;
    use crate::colonist::Custody;
    use crate::incident::Incident;
    use crate::profile::InjuryProfile;
    use crate::region::Region;

    const TICK: f32 = 1.0 / 60.0;

    fn roster() -> (Roster, ColonistId) {
        let mut roster = Roster::new();
        let id = roster.spawn(
            "Ada",
            "engineer",
            InjuryProfile::new(vec![Incident::new(
                "Decompression",
                [
                    Region::injured(RegionCategory::Head, 5.0),
                    Region::injured(RegionCategory::Chest, 5.0),
                    Region::injured(RegionCategory::Neck, 0.0),
                ],
            )]),
        );
        (roster, id)
    }

    fn region(roster: &Roster, address: RegionAddress) -> Region {
        roster
            .profile(address.colonist)
            .and_then(|p| p.incident(address.incident))
            .and_then(|i| i.region(address.region))
            .cloned()
            .unwrap()
    }

    #[test]
    fn five_seconds_at_sixty_hertz_stabilizes_head() {
        let (mut roster, id) = roster();
        let head = RegionAddress::new(id, 0, 0);
        let mut engine = ProgressionEngine::new();
        assert_eq!(engine.start(&roster, head), Ok(StartOutcome::Started));

        let mut stabilized_at = None;
        for tick in 1..=300 {
            if let TickOutcome::Stabilized { .. } = engine.advance(&mut roster, TICK) {
                stabilized_at = Some(tick);
            }
        }
        assert_eq!(stabilized_at, Some(300));
        let head_region = region(&roster, head);
        assert_eq!(head_region.status(), RegionStatus::Stabilized);
        assert!((head_region.progress() - 5.0).abs() < f32::EPSILON);
        let incident = roster.profile(id).unwrap().incident(0).unwrap().clone();
        assert_eq!(incident.stabilized_count(), 1);
        assert!(engine.active().is_none());
    }

    #[test]
    fn switching_commits_partial_progress() {
        let (mut roster, id) = roster();
        let head = RegionAddress::new(id, 0, 0);
        let chest = RegionAddress::new(id, 0, 1);
        let mut engine = ProgressionEngine::new();
        engine.start(&roster, head).unwrap();
        engine.advance(&mut roster, 2.0);

        let outcome = engine.start(&roster, chest).unwrap();
        assert_eq!(outcome, StartOutcome::Switched { previous: head });
        engine.advance(&mut roster, 1.0);

        let head_region = region(&roster, head);
        assert!((head_region.progress() - 2.0).abs() < f32::EPSILON);
        assert_eq!(head_region.status(), RegionStatus::Injured);
        assert!((region(&roster, chest).progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stop_pauses_without_reset() {
        let (mut roster, id) = roster();
        let head = RegionAddress::new(id, 0, 0);
        let mut engine = ProgressionEngine::new();
        engine.start(&roster, head).unwrap();
        engine.advance(&mut roster, 1.5);
        assert_eq!(engine.stop(), Some(head));
        assert_eq!(engine.advance(&mut roster, 1.0), TickOutcome::Idle);
        assert!((region(&roster, head).progress() - 1.5).abs() < f32::EPSILON);
        assert_eq!(
            engine.start(&roster, head),
            Ok(StartOutcome::Started),
            "restart resumes"
        );
        assert_eq!(engine.start(&roster, head), Ok(StartOutcome::AlreadyActive));
    }

    #[test]
    fn invalid_targets_are_rejected_without_side_effects() {
        let (mut roster, id) = roster();
        let mut engine = ProgressionEngine::new();
        let head = RegionAddress::new(id, 0, 0);
        engine.start(&roster, head).unwrap();

        assert!(matches!(
            engine.start(&roster, RegionAddress::new(id, 0, 2)),
            Err(ProgressError::InertRegion { .. })
        ));
        assert!(matches!(
            engine.start(&roster, RegionAddress::new(id, 4, 0)),
            Err(ProgressError::IncidentOutOfRange { count: 1, .. })
        ));
        assert!(matches!(
            engine.start(&roster, RegionAddress::new(id, 0, 9)),
            Err(ProgressError::RegionOutOfRange { count: 3, .. })
        ));
        assert!(matches!(
            engine.start(&roster, RegionAddress::new(ColonistId::new(42), 0, 0)),
            Err(ProgressError::UnknownColonist { .. })
        ));
        assert_eq!(engine.active(), Some(head));

        engine.advance(&mut roster, 5.0);
        assert!(matches!(
            engine.start(&roster, head),
            Err(ProgressError::AlreadyStabilized { .. })
        ));
    }

    #[test]
    fn finalized_colonist_clears_stale_target() {
        let (mut roster, id) = roster();
        let mut engine = ProgressionEngine::new();
        engine.start(&roster, RegionAddress::new(id, 0, 0)).unwrap();
        roster.get_mut(id).unwrap().set_custody(Custody::Finalized);
        assert_eq!(engine.advance(&mut roster, TICK), TickOutcome::Idle);
        assert!(engine.active().is_none());
        assert!(matches!(
            engine.start(&roster, RegionAddress::new(id, 0, 1)),
            Err(ProgressError::Finalized { .. })
        ));
    }

    #[test]
    fn stop_for_only_touches_matching_colonist() {
        let (roster, id) = roster();
        let mut engine = ProgressionEngine::new();
        engine.start(&roster, RegionAddress::new(id, 0, 0)).unwrap();
        assert_eq!(engine.stop_for(ColonistId::new(7)), None);
        assert!(engine.is_active_for(id));
        assert!(engine.stop_for(id).is_some());
    }
}
