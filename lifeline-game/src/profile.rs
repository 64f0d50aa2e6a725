//! Colonist-wide injury profile and its aggregates.
use serde::Serialize;

use crate::body::BodyDiagram;
use crate::incident::{Incident, IncidentView};
use crate::numbers::{count_ratio, fill_ratio, sum_seconds};
use crate::region::RegionAdvance;

/// Ordered incidents of one colonist plus colonist-wide totals.
///
/// The incident list is fixed at assembly; only region progress changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjuryProfile {
    incidents: Vec<Incident>,
    total_target_time: f32,
    total_progress: f32,
    last_selected_incident: usize,
}

impl InjuryProfile {
    #[must_use]
    pub fn new(incidents: Vec<Incident>) -> Self {
        let mut profile = Self {
            incidents,
            total_target_time: 0.0,
            total_progress: 0.0,
            last_selected_incident: 0,
        };
        profile.recompute_totals();
        profile
    }

    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    #[must_use]
    pub fn incident(&self, index: usize) -> Option<&Incident> {
        self.incidents.get(index)
    }

    #[must_use]
    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }

    #[must_use]
    pub const fn total_target_time(&self) -> f32 {
        self.total_target_time
    }

    #[must_use]
    pub const fn total_progress(&self) -> f32 {
        self.total_progress
    }

    /// Incident the navigator should reopen on when this colonist is displayed.
    #[must_use]
    pub const fn last_selected_incident(&self) -> usize {
        self.last_selected_incident
    }

    pub(crate) fn remember_selection(&mut self, index: usize) {
        if index < self.incidents.len() {
            self.last_selected_incident = index;
        }
    }

    #[must_use]
    pub fn stabilized_count(&self) -> usize {
        self.incidents.iter().map(Incident::stabilized_count).sum()
    }

    #[must_use]
    pub fn total_injured_count(&self) -> usize {
        self.incidents.iter().map(Incident::total_injured_count).sum()
    }

    /// Every incident has all of its countable regions stabilized.
    #[must_use]
    pub fn ready_to_finalize(&self) -> bool {
        self.incidents.iter().all(Incident::is_complete)
    }

    pub(crate) fn advance_region(
        &mut self,
        incident: usize,
        region: usize,
        dt: f32,
    ) -> Option<RegionAdvance> {
        let outcome = self.incidents.get_mut(incident)?.advance_region(region, dt)?;
        self.recompute_totals();
        Some(outcome)
    }

    fn recompute_totals(&mut self) {
        self.total_target_time = sum_seconds(self.incidents.iter().map(Incident::target_time));
        self.total_progress = sum_seconds(self.incidents.iter().map(Incident::progress));
    }

    /// Most severe status per body area across all incidents.
    #[must_use]
    pub fn body_diagram(&self) -> BodyDiagram {
        let mut diagram = BodyDiagram::default();
        for region in self.incidents.iter().flat_map(Incident::regions) {
            diagram.mark(region.category(), region.status());
        }
        diagram
    }

    /// Aggregate figures handed to the finalize action and progress widgets.
    #[must_use]
    pub fn snapshot(&self) -> ProfileSnapshot {
        let stabilized = self.stabilized_count();
        let injured = self.total_injured_count();
        ProfileSnapshot {
            total_progress: self.total_progress,
            total_target_time: self.total_target_time,
            fill_ratio: fill_ratio(self.total_progress, self.total_target_time),
            stabilized_count: stabilized,
            total_injured_count: injured,
            completion_ratio: count_ratio(stabilized, injured),
            ready_to_finalize: self.ready_to_finalize(),
        }
    }

    #[must_use]
    pub fn incident_views(&self) -> Vec<IncidentView> {
        self.incidents.iter().map(Incident::view).collect()
    }
}

/// Colonist-wide totals at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileSnapshot {
    pub total_progress: f32,
    pub total_target_time: f32,
    pub fill_ratio: f32,
    pub stabilized_count: usize,
    pub total_injured_count: usize,
    pub completion_ratio: f32,
    pub ready_to_finalize: bool,
}
