//! Spawn-time assembly of incidents and injury profiles from templates.
//!
//! Presets are always applied; extra regions are sampled uniformly without
//! replacement (by candidate index) from the candidate pool, re-rolling any
//! draw whose category is already present. The number of extras is clamped
//! to the unique categories the pool can still offer.
use rand::Rng;

use crate::body::RegionCategory;
use crate::constants::{
    LOG_CATALOG_EMPTY_POOL, LOG_CATALOG_EMPTY_PROFILE, LOG_CATALOG_INERT_REGION,
};
use crate::incident::{Incident, IncidentTemplate, RegionSpec};
use crate::profile::InjuryProfile;
use crate::region::Region;

/// Category membership keyed through the validated slot table.
#[derive(Debug, Clone, Copy, Default)]
struct CategorySet {
    present: [bool; RegionCategory::COUNT],
}

impl CategorySet {
    const fn contains(&self, category: RegionCategory) -> bool {
        self.present[category.slot()]
    }

    /// Returns true when the category was newly inserted.
    const fn insert(&mut self, category: RegionCategory) -> bool {
        let slot = category.slot();
        if self.present[slot] {
            return false;
        }
        self.present[slot] = true;
        true
    }
}

/// Number of extra regions the template will actually receive.
#[must_use]
pub fn clamped_random_count(template: &IncidentTemplate) -> usize {
    let mut taken = CategorySet::default();
    for spec in &template.preset {
        taken.insert(spec.category);
    }
    let mut available = 0;
    for spec in &template.candidates {
        if taken.insert(spec.category) {
            available += 1;
        }
    }
    template.desired_random.min(available)
}

/// Assemble a fresh incident instance from `template`.
pub fn assemble_incident<R>(template: &IncidentTemplate, rng: &mut R) -> Incident
where
    R: Rng + ?Sized,
{
    let wanted = clamped_random_count(template);
    let mut taken = CategorySet::default();
    let mut regions = Vec::with_capacity(template.preset.len().saturating_add(wanted));

    for spec in &template.preset {
        if taken.insert(spec.category) {
            regions.push(instantiate(template, spec));
        }
    }

    if template.desired_random > 0 && template.candidates.is_empty() {
        log::warn!(
            "{LOG_CATALOG_EMPTY_POOL} incident={} wants {} random regions but has no candidates",
            template.id,
            template.desired_random
        );
    }

    let mut remaining: Vec<usize> = (0..template.candidates.len()).collect();
    let mut drawn = 0;
    while drawn < wanted && !remaining.is_empty() {
        let pick = rng.gen_range(0..remaining.len());
        let index = remaining.swap_remove(pick);
        let spec = &template.candidates[index];
        if !taken.insert(spec.category) {
            continue;
        }
        regions.push(instantiate(template, spec));
        drawn += 1;
    }

    Incident::new(template.display_name.clone(), regions)
}

fn instantiate(template: &IncidentTemplate, spec: &RegionSpec) -> Region {
    let region = Region::injured(spec.category, spec.target_time);
    if region.is_inert() {
        log::warn!(
            "{LOG_CATALOG_INERT_REGION} incident={} category={:?} target_time={}",
            template.id,
            spec.category,
            spec.target_time
        );
    }
    region
}

/// Assemble a full profile, one incident per template, in order.
pub fn assemble_profile<'a, I, R>(templates: I, rng: &mut R) -> InjuryProfile
where
    I: IntoIterator<Item = &'a IncidentTemplate>,
    R: Rng + ?Sized,
{
    let incidents: Vec<Incident> = templates
        .into_iter()
        .map(|template| assemble_incident(template, rng))
        .collect();
    if incidents.is_empty() {
        log::warn!("{LOG_CATALOG_EMPTY_PROFILE} profile assembled with no incidents");
    }
    InjuryProfile::new(incidents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn template(desired: usize) -> IncidentTemplate {
        IncidentTemplate {
            id: "decompression".to_string(),
            display_name: "Decompression".to_string(),
            preset: vec![RegionSpec::new(RegionCategory::Head, 5.0)],
            candidates: vec![
                RegionSpec::new(RegionCategory::Chest, 3.0),
                RegionSpec::new(RegionCategory::Pelvis, 4.0),
                RegionSpec::new(RegionCategory::LeftArm, 2.0),
            ],
            desired_random: desired,
        }
    }

    #[test]
    fn preset_plus_two_random_regions() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let incident = assemble_incident(&template(2), &mut rng);
        assert_eq!(incident.region_count(), 3);
        assert_eq!(incident.regions()[0].category(), RegionCategory::Head);
        let expected: f32 = incident.regions().iter().map(Region::target_time).sum();
        assert!((incident.target_time() - expected).abs() < f32::EPSILON);
        assert!(incident.target_time() > 5.0);
    }

    #[test]
    fn desired_count_clamps_to_available_categories() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut tpl = template(10);
        tpl.candidates.push(RegionSpec::new(RegionCategory::Head, 1.0));
        tpl.candidates.push(RegionSpec::new(RegionCategory::Chest, 9.0));
        assert_eq!(clamped_random_count(&tpl), 3);
        let incident = assemble_incident(&tpl, &mut rng);
        assert_eq!(incident.region_count(), 4);
    }

    #[test]
    fn duplicate_presets_keep_first_entry() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut tpl = template(0);
        tpl.preset.push(RegionSpec::new(RegionCategory::Head, 99.0));
        let incident = assemble_incident(&tpl, &mut rng);
        assert_eq!(incident.region_count(), 1);
        assert!((incident.target_time() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_pool_yields_presets_only() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut tpl = template(2);
        tpl.candidates.clear();
        let incident = assemble_incident(&tpl, &mut rng);
        assert_eq!(incident.region_count(), 1);
    }

    #[test]
    fn templates_are_not_mutated_by_assembly() {
        let tpl = template(2);
        let before = tpl.clone();
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let mut first = assemble_incident(&tpl, &mut rng);
        first.advance_region(0, 5.0);
        let second = assemble_incident(&tpl, &mut rng);
        assert_eq!(tpl, before);
        assert!(second.progress().abs() < f32::EPSILON);
        assert_eq!(second.stabilized_count(), 0);
    }

    #[test]
    fn profile_keeps_template_order() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut other = template(0);
        other.display_name = "Fracture".to_string();
        let profile = assemble_profile([&template(1), &other], &mut rng);
        assert_eq!(profile.incident_count(), 2);
        assert_eq!(profile.incidents()[1].display_name(), "Fracture");
    }
}
