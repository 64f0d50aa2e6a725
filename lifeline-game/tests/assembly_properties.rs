use std::collections::HashSet;

use lifeline_game::{
    ColonistId, IncidentCatalog, IncidentTemplate, RegionCategory, RegionSpec, RegionStatus,
    SpawnRng, TriageSession, assemble_incident, assemble_profile, clamped_random_count,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const POOL: [RegionCategory; 6] = [
    RegionCategory::Chest,
    RegionCategory::Pelvis,
    RegionCategory::LeftArm,
    RegionCategory::RightArm,
    RegionCategory::LeftLeg,
    RegionCategory::RightLeg,
];

fn template(preset: &[RegionCategory], pool: &[RegionCategory], desired: usize) -> IncidentTemplate {
    IncidentTemplate {
        id: "property".to_string(),
        display_name: "Property".to_string(),
        preset: preset.iter().map(|&c| RegionSpec::new(c, 5.0)).collect(),
        candidates: pool
            .iter()
            .enumerate()
            .map(|(i, &c)| RegionSpec::new(c, 1.0 + i as f32))
            .collect(),
        desired_random: desired,
    }
}

#[test]
fn extra_region_count_is_min_of_desired_and_pool() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x00A5_5E4B);
    for pool_size in 0..=POOL.len() {
        for desired in 0..=POOL.len() + 2 {
            let tpl = template(&[RegionCategory::Head], &POOL[..pool_size], desired);
            let expected = desired.min(pool_size);
            assert_eq!(clamped_random_count(&tpl), expected);
            let incident = assemble_incident(&tpl, &mut rng);
            assert_eq!(incident.region_count(), 1 + expected);
        }
    }
}

#[test]
fn oversized_desired_count_is_clamped_without_allocating_for_it() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xB16);
    let tpl = template(
        &[RegionCategory::Head],
        &[RegionCategory::Chest],
        1_000_000_000_000,
    );
    assert_eq!(clamped_random_count(&tpl), 1);
    assert_eq!(assemble_incident(&tpl, &mut rng).region_count(), 2);

    let tpl = template(&[RegionCategory::Head], &[], usize::MAX);
    assert_eq!(assemble_incident(&tpl, &mut rng).region_count(), 1);
}

#[test]
fn max_desired_count_from_json_assembles() {
    let catalog = IncidentCatalog::from_json(
        r#"{
            "incidents": [{
                "id": "greedy",
                "display_name": "Greedy",
                "preset": [{"category": "head", "target_time": 2.0}],
                "desired_random": 18446744073709551615
            }],
            "colonists": []
        }"#,
    )
    .unwrap();
    let tpl = catalog.find_incident("greedy").unwrap();
    assert_eq!(tpl.desired_random, usize::MAX);
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    assert_eq!(assemble_incident(tpl, &mut rng).region_count(), 1);
}

#[test]
fn thousand_assemblies_never_duplicate_categories() {
    let tpl = template(&[RegionCategory::Head], &POOL, 3);
    let mut rng = ChaCha20Rng::seed_from_u64(1_000);
    let mut seen_extras = HashSet::new();
    for _ in 0..1_000 {
        let incident = assemble_incident(&tpl, &mut rng);
        assert_eq!(incident.region_count(), 4);
        let categories: HashSet<_> = incident.regions().iter().map(|r| r.category()).collect();
        assert_eq!(categories.len(), incident.region_count());
        assert_eq!(incident.regions()[0].category(), RegionCategory::Head);
        for region in incident.regions() {
            assert_eq!(region.status(), RegionStatus::Injured);
            assert!(region.progress().abs() < f32::EPSILON);
            seen_extras.insert(region.category());
        }
        let sum: f32 = incident.regions().iter().map(|r| r.target_time()).sum();
        assert!((incident.target_time() - sum).abs() < 1e-4);
    }
    assert_eq!(seen_extras.len(), POOL.len() + 1, "every candidate gets drawn eventually");
}

#[test]
fn overlapping_pool_entries_are_skipped() {
    let pool = [
        RegionCategory::Head,
        RegionCategory::Chest,
        RegionCategory::Chest,
        RegionCategory::Pelvis,
    ];
    let tpl = template(&[RegionCategory::Head], &pool, 5);
    assert_eq!(clamped_random_count(&tpl), 2);
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    for _ in 0..200 {
        let incident = assemble_incident(&tpl, &mut rng);
        assert_eq!(incident.region_count(), 3);
        assert!(incident.position_of(RegionCategory::Chest).is_some());
        assert!(incident.position_of(RegionCategory::Pelvis).is_some());
    }
}

#[test]
fn spawn_streams_are_reproducible_per_colonist() {
    let templates = [
        template(&[RegionCategory::Head], &POOL, 2),
        template(&[], &POOL, 3),
    ];
    let spawn = SpawnRng::from_user_seed(0xFEED);
    let colonist = ColonistId::new(4);
    let first = assemble_profile(&templates, &mut spawn.colonist_stream(colonist));
    let again = assemble_profile(&templates, &mut spawn.colonist_stream(colonist));
    assert_eq!(first, again);
    assert_eq!(first.incident_count(), 2);
    assert!(first.total_target_time() > 0.0);
}

#[test]
fn shared_templates_do_not_bleed_between_colonists() {
    let tpl = template(&[RegionCategory::Head], &POOL, 2);
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let mut session = TriageSession::new(IncidentCatalog::default(), 5);
    let a = session.spawn_with_templates("A", std::slice::from_ref(&tpl));
    let b = session.spawn_with_templates("B", std::slice::from_ref(&tpl));
    session.display_colonist(a);
    session.perform_selection();
    session.perform_selection();
    session.advance(5.0);
    let a_profile = session.roster().profile(a).unwrap();
    let b_profile = session.roster().profile(b).unwrap();
    assert_eq!(a_profile.stabilized_count(), 1);
    assert_eq!(b_profile.stabilized_count(), 0);
    assert!(b_profile.total_progress().abs() < f32::EPSILON);
    let fresh = assemble_incident(&tpl, &mut rng);
    assert!(fresh.progress().abs() < f32::EPSILON);
}
