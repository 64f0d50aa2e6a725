use lifeline_game::{
    ColonistId, Incident, InjuryProfile, ProgressionEngine, Region, RegionAddress,
    RegionCategory, RegionStatus, Roster, StartOutcome, TickOutcome,
};

const TICK: f32 = 1.0 / 60.0;

fn roster() -> (Roster, ColonistId) {
    let mut roster = Roster::new();
    let id = roster.spawn(
        "Mara",
        "engineer",
        InjuryProfile::new(vec![
            Incident::new(
                "Decompression",
                [
                    Region::injured(RegionCategory::Head, 5.0),
                    Region::injured(RegionCategory::Chest, 4.0),
                ],
            ),
            Incident::new("Burn", [Region::injured(RegionCategory::LeftArm, 2.5)]),
        ]),
    );
    (roster, id)
}

fn assert_region_invariants(roster: &Roster) {
    for colonist in roster.iter() {
        let profile = colonist.profile();
        let mut total = 0.0_f32;
        for incident in profile.incidents() {
            let mut sum = 0.0_f32;
            for region in incident.regions() {
                assert!(region.progress() >= 0.0);
                assert!(region.progress() <= region.target_time());
                let at_target = (region.progress() - region.target_time()).abs() < f32::EPSILON;
                if !region.is_inert() {
                    assert_eq!(region.status() == RegionStatus::Stabilized, at_target);
                }
                sum += region.progress();
            }
            assert!((incident.progress() - sum).abs() < 1e-4);
            total += incident.progress();
        }
        assert!((profile.total_progress() - total).abs() < 1e-4);
    }
}

#[test]
fn only_one_region_moves_per_tick() {
    let (mut roster, id) = roster();
    let mut engine = ProgressionEngine::new();
    engine.start(&roster, RegionAddress::new(id, 0, 0)).unwrap();
    for step in 0..600 {
        let before: Vec<f32> = roster
            .profile(id)
            .unwrap()
            .incidents()
            .iter()
            .flat_map(|i| i.regions().iter().map(Region::progress))
            .collect();
        engine.advance(&mut roster, TICK);
        let after: Vec<f32> = roster
            .profile(id)
            .unwrap()
            .incidents()
            .iter()
            .flat_map(|i| i.regions().iter().map(Region::progress))
            .collect();
        let changed = before.iter().zip(&after).filter(|(a, b)| a != b).count();
        assert!(changed <= 1);
        assert_region_invariants(&roster);
        if step == 100 {
            engine.start(&roster, RegionAddress::new(id, 1, 0)).unwrap();
        }
        if step == 300 {
            engine.start(&roster, RegionAddress::new(id, 0, 1)).unwrap();
        }
    }
}

#[test]
fn switching_targets_never_loses_progress() {
    let (mut roster, id) = roster();
    let head = RegionAddress::new(id, 0, 0);
    let chest = RegionAddress::new(id, 0, 1);
    let mut engine = ProgressionEngine::new();
    engine.start(&roster, head).unwrap();
    for _ in 0..120 {
        engine.advance(&mut roster, TICK);
    }
    let head_progress = roster.profile(id).unwrap().incidents()[0].regions()[0].progress();
    assert!((head_progress - 2.0).abs() < 1e-3);

    assert_eq!(
        engine.start(&roster, chest).unwrap(),
        StartOutcome::Switched { previous: head }
    );
    for _ in 0..60 {
        engine.advance(&mut roster, TICK);
    }
    let incident = &roster.profile(id).unwrap().incidents()[0];
    assert!((incident.regions()[0].progress() - head_progress).abs() < f32::EPSILON);
    assert_eq!(incident.regions()[0].status(), RegionStatus::Injured);
    assert!((incident.regions()[1].progress() - 1.0).abs() < 1e-3);
}

#[test]
fn ready_to_finalize_flips_on_last_stabilization() {
    let (mut roster, id) = roster();
    let mut engine = ProgressionEngine::new();
    let targets = [
        RegionAddress::new(id, 0, 0),
        RegionAddress::new(id, 0, 1),
        RegionAddress::new(id, 1, 0),
    ];
    let mut last = None;
    for (n, target) in targets.iter().enumerate() {
        assert!(!roster.profile(id).unwrap().ready_to_finalize());
        engine.start(&roster, *target).unwrap();
        loop {
            let outcome = engine.advance(&mut roster, TICK);
            if let TickOutcome::Stabilized { profile_ready, .. } = outcome {
                assert_eq!(profile_ready, n == targets.len() - 1);
                last = Some(outcome);
                break;
            }
        }
    }
    assert!(matches!(
        last,
        Some(TickOutcome::Stabilized {
            incident_complete: true,
            profile_ready: true,
            ..
        })
    ));
    let snapshot = roster.profile(id).unwrap().snapshot();
    assert!(snapshot.ready_to_finalize);
    assert_eq!(snapshot.stabilized_count, snapshot.total_injured_count);
    assert!((snapshot.total_progress - snapshot.total_target_time).abs() < 1e-4);
}

#[test]
fn oversized_slices_clamp_at_target() {
    let (mut roster, id) = roster();
    let mut engine = ProgressionEngine::new();
    engine.start(&roster, RegionAddress::new(id, 1, 0)).unwrap();
    let outcome = engine.advance(&mut roster, 100.0);
    assert!(matches!(outcome, TickOutcome::Stabilized { .. }));
    let region = &roster.profile(id).unwrap().incidents()[1].regions()[0];
    assert!((region.progress() - 2.5).abs() < f32::EPSILON);
    assert_eq!(engine.advance(&mut roster, 1.0), TickOutcome::Idle);
}
