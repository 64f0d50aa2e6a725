use std::time::Duration;

use lifeline_game::{
    Custody, FinalizeAction, HoldError, IncidentCatalog, NavMode, RegionStatus, SelectionOutcome,
    StaticLoader, TriageEngine, TriageSession,
};

const FRAME: Duration = Duration::from_micros(16_667);

fn open(seed: u64) -> TriageSession {
    TriageEngine::new(StaticLoader)
        .open_validated_session(seed)
        .expect("bundled catalog opens")
}

/// Stabilize every region of the displayed colonist using only input events.
fn stabilize_displayed(session: &mut TriageSession) {
    let colonist = session.displayed().expect("a colonist is displayed");
    let incident_count = session.roster().profile(colonist).unwrap().incident_count();
    for incident in 0..incident_count {
        session.highlight_incident(incident);
        let outcome = session.perform_selection();
        assert_eq!(outcome, SelectionOutcome::Expanded { incident });
        let regions = session
            .roster()
            .profile(colonist)
            .unwrap()
            .incident(incident)
            .unwrap()
            .region_count();
        for region in 0..regions {
            assert_eq!(session.navigator().mode(), NavMode::BrowsingRegions);
            assert_eq!(session.navigator().selected_region(), region);
            if matches!(session.perform_selection(), SelectionOutcome::Progression(_)) {
                while session.engine().active().is_some() {
                    session.update(FRAME);
                }
            }
            if region + 1 < regions {
                session.scroll(1);
            }
        }
        session.collapse();
    }
}

#[test]
fn full_rescue_completes_the_mission() {
    let mut session = open(0x5EED);
    let ids = session.spawn_all();
    assert!(!ids.is_empty());
    let mut records = Vec::new();
    for chunk in ids.chunks(session.hold().capacity()) {
        for &id in chunk {
            session.collect(id).unwrap();
        }
        for &id in chunk {
            assert!(session.display_colonist(id));
            assert!(!session.ready_to_finalize());
            stabilize_displayed(&mut session);
            assert!(session.ready_to_finalize());
            let snapshot = session.snapshot().unwrap();
            assert_eq!(snapshot.stabilized_count, snapshot.total_injured_count);
            records.push(session.finalize(id, FinalizeAction::Transmit).unwrap());
        }
    }
    assert_eq!(records.len(), ids.len());
    for record in &records {
        assert!((record.total_progress - record.total_target_time).abs() < 1e-3);
    }
    let status = session.mission_status();
    assert!(status.is_complete());
    assert_eq!(status.finalized, ids.len());
}

#[test]
fn hold_capacity_and_finalize_gating() {
    let mut session = open(9);
    let ids = session.spawn_all();
    assert!(ids.len() > 3);
    for &id in &ids[..3] {
        session.collect(id).unwrap();
    }
    assert_eq!(
        session.collect(ids[3]),
        Err(HoldError::Full { capacity: 3 })
    );
    assert!(matches!(
        session.finalize(ids[0], FinalizeAction::Eject),
        Err(HoldError::NotReady { .. })
    ));
    assert!(matches!(
        session.finalize(ids[3], FinalizeAction::Eject),
        Err(HoldError::NotCarried { .. })
    ));
    assert_eq!(
        session.roster().get(ids[0]).map(|c| c.custody()),
        Some(Custody::Carried)
    );
}

#[test]
fn displaying_another_colonist_pauses_progress() {
    let mut session = open(3);
    let ids = session.spawn_all();
    session.display_colonist(ids[0]);
    session.perform_selection();
    session.perform_selection();
    for _ in 0..30 {
        session.update(FRAME);
    }
    let paused = session.engine().active().unwrap();
    session.display_colonist(ids[1]);
    assert!(session.engine().active().is_none());

    let progress = |session: &TriageSession| {
        let profile = session.roster().profile(ids[0]).unwrap();
        profile.incidents()[paused.incident].regions()[paused.region].progress()
    };
    let before = progress(&session);
    assert!(before > 0.0);
    for _ in 0..30 {
        session.update(FRAME);
    }
    assert!((progress(&session) - before).abs() < f32::EPSILON);
}

#[test]
fn collapse_and_stop_are_independent() {
    let mut session = open(11);
    let ids = session.spawn_all();
    session.display_colonist(ids[0]);
    session.perform_selection();
    session.perform_selection();
    assert!(session.collapse());
    assert!(session.engine().active().is_some());
    let stopped = session.stop_progress().unwrap();
    assert!(session.stop_progress().is_none());
    let region = &session.roster().profile(ids[0]).unwrap().incidents()[stopped.incident]
        .regions()[stopped.region];
    assert_eq!(region.status(), RegionStatus::Injured);
}

#[test]
fn body_diagram_tracks_displayed_colonist() {
    let mut session = open(21);
    let ids = session.spawn_all();
    assert!(session.body_diagram().is_none());
    session.display_colonist(ids[0]);
    let diagram = session.body_diagram().unwrap();
    assert!(diagram.injured_areas() > 0);
    stabilize_displayed(&mut session);
    let diagram = session.body_diagram().unwrap();
    assert_eq!(diagram.injured_areas(), 0);
    assert!(
        diagram
            .iter()
            .any(|(_, status)| status == RegionStatus::Stabilized)
    );
}

#[test]
fn unknown_and_custom_catalogs_degrade_gracefully() {
    let catalog = IncidentCatalog::from_json(
        r#"{
            "incidents": [
                {"id": "broken", "display_name": "Broken", "preset": [{"category": "head", "target_time": 0.0}]},
                {"id": "ok", "display_name": "Ok", "preset": [{"category": "chest", "target_time": 1.0}]}
            ],
            "colonists": [{"id": "x", "name": "X", "incidents": ["broken", "ok", "ghost"]}]
        }"#,
    )
    .unwrap();
    let mut session = TriageSession::new(catalog, 1);
    let id = session.spawn_colonist("x").unwrap();
    session.display_colonist(id);
    assert_eq!(session.perform_selection(), SelectionOutcome::Expanded { incident: 0 });
    assert_eq!(session.perform_selection(), SelectionOutcome::Ignored);
    session.collapse();
    session.scroll(1);
    session.perform_selection();
    assert!(matches!(
        session.perform_selection(),
        SelectionOutcome::Progression(_)
    ));
    session.advance(1.0);
    assert!(session.ready_to_finalize());
}
