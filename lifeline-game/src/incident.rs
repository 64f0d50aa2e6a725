//! Incident templates and their assembled per-colonist instances.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::body::{RegionCategory, RegionStatus};
use crate::constants::{DEFAULT_REGION_TARGET_SECS, LOG_CATALOG_DUPLICATE_PRESET};
use crate::numbers::{count_ratio, fill_ratio, sum_seconds};
use crate::region::{Region, RegionAdvance, RegionView};

/// Regions stored inline for the common case of a handful of injuries.
pub type RegionSet = SmallVec<[Region; 4]>;

/// Catalog entry describing one possibly-injured body area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub category: RegionCategory,
    /// Seconds needed to stabilize the region.
    #[serde(default = "RegionSpec::default_target_time")]
    pub target_time: f32,
}

impl RegionSpec {
    #[must_use]
    pub const fn new(category: RegionCategory, target_time: f32) -> Self {
        Self {
            category,
            target_time,
        }
    }

    const fn default_target_time() -> f32 {
        DEFAULT_REGION_TARGET_SECS
    }
}

/// Immutable recipe for an incident. Assembly copies values out of it and
/// never writes back, so templates can be shared freely between colonists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentTemplate {
    pub id: String,
    pub display_name: String,
    /// Regions always affected by this incident.
    #[serde(default)]
    pub preset: Vec<RegionSpec>,
    /// Pool that random extra regions are drawn from.
    #[serde(default)]
    pub candidates: Vec<RegionSpec>,
    /// How many extra regions to draw from `candidates`.
    #[serde(default)]
    pub desired_random: usize,
}

/// Assembled incident owned by one colonist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Incident {
    display_name: String,
    regions: RegionSet,
    target_time: f32,
    progress: f32,
    stabilized_count: usize,
    injured_count: usize,
}

impl Incident {
    /// Build an incident from region records, dropping any region whose
    /// category is already present.
    #[must_use]
    pub fn new(display_name: impl Into<String>, regions: impl IntoIterator<Item = Region>) -> Self {
        let display_name = display_name.into();
        let mut set = RegionSet::new();
        for region in regions {
            if set
                .iter()
                .any(|existing| existing.category() == region.category())
            {
                log::warn!(
                    "{LOG_CATALOG_DUPLICATE_PRESET} incident={display_name:?} category={:?} dropped",
                    region.category()
                );
                continue;
            }
            set.push(region);
        }
        let mut incident = Self {
            display_name,
            regions: set,
            target_time: 0.0,
            progress: 0.0,
            stabilized_count: 0,
            injured_count: 0,
        };
        incident.recompute();
        incident
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Index of the region covering `category`, if any.
    #[must_use]
    pub fn position_of(&self, category: RegionCategory) -> Option<usize> {
        self.regions
            .iter()
            .position(|region| region.category() == category)
    }

    /// Sum of member region target times.
    #[must_use]
    pub const fn target_time(&self) -> f32 {
        self.target_time
    }

    /// Sum of member region progress.
    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub const fn stabilized_count(&self) -> usize {
        self.stabilized_count
    }

    /// Regions that need stabilizing. Inert regions are not counted.
    #[must_use]
    pub const fn total_injured_count(&self) -> usize {
        self.injured_count
    }

    /// All countable regions are stabilized.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.stabilized_count == self.injured_count
    }

    /// At least one region can still be progressed.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.regions.iter().any(Region::is_interactive)
    }

    pub(crate) fn advance_region(&mut self, index: usize, dt: f32) -> Option<RegionAdvance> {
        let outcome = self.regions.get_mut(index)?.advance(dt);
        self.recompute();
        Some(outcome)
    }

    fn recompute(&mut self) {
        self.target_time = sum_seconds(self.regions.iter().map(Region::target_time));
        self.progress = sum_seconds(self.regions.iter().map(Region::progress));
        self.injured_count = self.regions.iter().filter(|r| !r.is_inert()).count();
        self.stabilized_count = self
            .regions
            .iter()
            .filter(|r| r.status() == RegionStatus::Stabilized)
            .count();
    }

    /// Presentation view of this incident.
    #[must_use]
    pub fn view(&self) -> IncidentView {
        IncidentView {
            display_name: self.display_name.clone(),
            progress: self.progress,
            target_time: self.target_time,
            fill_ratio: fill_ratio(self.progress, self.target_time),
            stabilized_count: self.stabilized_count,
            total_injured_count: self.injured_count,
            completion_ratio: count_ratio(self.stabilized_count, self.injured_count),
            interactive: self.is_interactive(),
            regions: self.regions.iter().map(Region::view).collect(),
        }
    }
}

/// Read-only incident data consumed by progress-bar widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentView {
    pub display_name: String,
    pub progress: f32,
    pub target_time: f32,
    pub fill_ratio: f32,
    pub stabilized_count: usize,
    pub total_injured_count: usize,
    pub completion_ratio: f32,
    pub interactive: bool,
    pub regions: Vec<RegionView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Incident {
        Incident::new(
            "Hull breach",
            [
                Region::injured(RegionCategory::Head, 5.0),
                Region::injured(RegionCategory::Chest, 3.0),
            ],
        )
    }

    #[test]
    fn aggregates_follow_regions() {
        let mut incident = sample();
        assert!((incident.target_time() - 8.0).abs() < f32::EPSILON);
        assert_eq!(incident.total_injured_count(), 2);
        assert_eq!(incident.stabilized_count(), 0);

        incident.advance_region(1, 3.0);
        incident.advance_region(0, 1.5);
        let expected: f32 = incident.regions().iter().map(Region::progress).sum();
        assert!((incident.progress() - expected).abs() < f32::EPSILON);
        assert_eq!(incident.stabilized_count(), 1);
        assert!(!incident.is_complete());
    }

    #[test]
    fn duplicate_categories_are_dropped_on_insert() {
        let incident = Incident::new(
            "Crush",
            [
                Region::injured(RegionCategory::LeftLeg, 2.0),
                Region::injured(RegionCategory::LeftLeg, 9.0),
            ],
        );
        assert_eq!(incident.region_count(), 1);
        assert!((incident.target_time() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn inert_regions_do_not_block_completion() {
        let mut incident = Incident::new(
            "Misconfigured",
            [
                Region::injured(RegionCategory::Neck, 0.0),
                Region::injured(RegionCategory::Pelvis, 1.0),
            ],
        );
        assert_eq!(incident.total_injured_count(), 1);
        incident.advance_region(1, 1.0);
        assert!(incident.is_complete());
        assert!(!incident.is_interactive());
    }

    #[test]
    fn out_of_range_region_is_none() {
        let mut incident = sample();
        assert!(incident.advance_region(7, 1.0).is_none());
        assert!(incident.region(7).is_none());
        assert_eq!(incident.position_of(RegionCategory::Chest), Some(1));
    }

    #[test]
    fn view_reports_ratios() {
        let mut incident = sample();
        incident.advance_region(1, 3.0);
        let view = incident.view();
        assert_eq!(view.regions.len(), 2);
        assert!((view.completion_ratio - 0.5).abs() < f32::EPSILON);
        assert!((view.fill_ratio - 3.0 / 8.0).abs() < 1e-6);
        assert!(view.interactive);
    }

    #[test]
    fn template_defaults_fill_in() {
        let template: IncidentTemplate = serde_json::from_str(
            r#"{"id":"burn","display_name":"Plasma burn","preset":[{"category":"chest"}]}"#,
        )
        .unwrap();
        assert_eq!(template.desired_random, 0);
        assert!(template.candidates.is_empty());
        assert!((template.preset[0].target_time - DEFAULT_REGION_TARGET_SECS).abs() < f32::EPSILON);
    }
}
