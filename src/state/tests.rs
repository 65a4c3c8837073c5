use super::*;
use std::sync::Arc;

fn mithi() -> MonitoredRiver {
    MonitoredRiver {
        id: 1,
        name: "Mithi River".to_string(),
        level: 4.1,
        risk: 65,
    }
}

fn single_river_store(draws: Vec<f64>) -> SnapshotStore {
    let seed = Snapshot::new(vec![mithi()], vec![], vec![]);
    SnapshotStore::new(seed, Box::new(ScriptedJitter::new(draws)))
}

fn boundary_seed() -> Snapshot {
    let rivers = vec![
        MonitoredRiver {
            id: 1,
            name: "Low".to_string(),
            level: 0.0,
            risk: 0,
        },
        MonitoredRiver {
            id: 2,
            name: "High".to_string(),
            level: 9.0,
            risk: 100,
        },
    ];
    let zones = vec![
        DangerZone {
            id: "DZ-LO".to_string(),
            severity: 0,
        },
        DangerZone {
            id: "DZ-HI".to_string(),
            severity: 100,
        },
    ];
    let cameras = vec![
        Camera {
            id: "CAM-LO".to_string(),
            risk: 0,
        },
        Camera {
            id: "CAM-HI".to_string(),
            risk: 100,
        },
    ];
    Snapshot::new(rivers, zones, cameras)
}

#[test]
fn test_minimum_draws_on_mithi_river() {
    let mut store = single_river_store(vec![-0.5, -5.0]);

    let next = store.advance();

    assert_eq!(next.rivers[0].level, 3.6);
    assert_eq!(next.rivers[0].risk, 60);
    assert_eq!(next.rivers[0].name, "Mithi River");
}

#[test]
fn test_maximum_draws_on_mithi_river() {
    // Upper bounds are exclusive: 0.49 for the level, 4.x floors to 4
    let mut store = single_river_store(vec![0.49, 4.99]);

    let next = store.advance();

    assert_eq!(next.rivers[0].level, 4.59);
    assert_eq!(next.rivers[0].risk, 69);
}

#[test]
fn test_zone_severity_clamped_at_upper_bound() {
    let seed = Snapshot::new(
        vec![],
        vec![DangerZone {
            id: "DZ-03".to_string(),
            severity: 98,
        }],
        vec![],
    );
    let mut store = SnapshotStore::new(seed, Box::new(ScriptedJitter::new(vec![4.0])));

    let next = store.advance();

    assert_eq!(next.zones[0].severity, 100);
}

#[test]
fn test_camera_risk_clamped_at_lower_bound() {
    let seed = Snapshot::new(
        vec![],
        vec![],
        vec![Camera {
            id: "CAM-01".to_string(),
            risk: 1,
        }],
    );
    let mut store = SnapshotStore::new(seed, Box::new(ScriptedJitter::new(vec![-3.0])));

    let next = store.advance();

    assert_eq!(next.cameras[0].risk, 0);
}

#[test]
fn test_negative_fraction_floors_downward() {
    // floor(-0.1) is -1, not 0
    assert_eq!(step_score(50, -0.1), 49);
    assert_eq!(step_score(50, 0.9), 50);
    assert_eq!(step_score(50, -5.0), 45);
}

#[test]
fn test_level_is_not_clamped() {
    assert_eq!(step_level(0.2, -0.5), -0.3);
    assert_eq!(step_level(250.0, 0.25), 250.25);
}

#[test]
fn test_clamp_policy() {
    assert_eq!(clamp(-7, 0, 100), 0);
    assert_eq!(clamp(102, 0, 100), 100);
    assert_eq!(clamp(42, 0, 100), 42);
}

#[test]
fn test_draw_order_rivers_then_zones_then_cameras() {
    let seed = Snapshot::new(
        vec![mithi()],
        vec![DangerZone {
            id: "DZ-01".to_string(),
            severity: 50,
        }],
        vec![Camera {
            id: "CAM-01".to_string(),
            risk: 50,
        }],
    );
    let jitter = ScriptedJitter::new(vec![0.0, 1.0, 2.0, -3.0]);
    let mut store = SnapshotStore::new(seed, Box::new(jitter));

    let next = store.advance();

    assert_eq!(next.rivers[0].level, 4.1);
    assert_eq!(next.rivers[0].risk, 66);
    assert_eq!(next.zones[0].severity, 52);
    assert_eq!(next.cameras[0].risk, 47);
}

#[test]
fn test_scores_stay_in_range_over_many_ticks() {
    let mut store = SnapshotStore::new(boundary_seed(), Box::new(RandomJitter::seeded(7)));

    for _ in 0..5_000 {
        let snap = store.advance();
        for river in &snap.rivers {
            assert!(river.risk <= 100);
        }
        for zone in &snap.zones {
            assert!(zone.severity <= 100);
        }
        for camera in &snap.cameras {
            assert!(camera.risk <= 100);
        }
    }
}

#[test]
fn test_adversarial_extremes_hold_clamp() {
    // Always draw the most extreme value in each direction
    for draw in [-5.0, 4.999] {
        let mut store = SnapshotStore::new(boundary_seed(), Box::new(ScriptedJitter::new(vec![draw])));
        for _ in 0..50 {
            let snap = store.advance();
            let scores = snap
                .rivers
                .iter()
                .map(|r| r.risk)
                .chain(snap.zones.iter().map(|z| z.severity))
                .chain(snap.cameras.iter().map(|c| c.risk));
            for score in scores {
                assert!(u16::from(score) <= 100);
            }
        }
    }
}

#[test]
fn test_random_draws_respect_half_open_ranges() {
    let mut jitter = RandomJitter::seeded(11);
    for _ in 0..10_000 {
        let v = jitter.uniform(RIVER_RISK_STEP.0, RIVER_RISK_STEP.1);
        assert!((-5.0..5.0).contains(&v));
        assert!(v.floor() as i32 <= 4);
    }
}

#[test]
fn test_advance_preserves_identity_and_order() {
    let seed = boundary_seed();
    let mut store = SnapshotStore::new(seed.clone(), Box::new(RandomJitter::seeded(3)));

    let next = store.advance();

    let ids: Vec<u32> = next.rivers.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    let zone_ids: Vec<&str> = next.zones.iter().map(|z| z.id.as_str()).collect();
    assert_eq!(zone_ids, vec!["DZ-LO", "DZ-HI"]);
    assert_eq!(next.entity_count(), seed.entity_count());
}

#[test]
fn test_previous_snapshot_untouched_by_advance() {
    let mut store = single_river_store(vec![0.3, 2.0]);
    let before = store.current();

    let after = store.advance();

    assert_eq!(before.rivers[0].level, 4.1);
    assert_eq!(before.rivers[0].risk, 65);
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(Arc::ptr_eq(&after, &store.current()));
}

#[test]
fn test_current_has_no_side_effects() {
    let store = single_river_store(vec![]);
    let a = store.current();
    let b = store.current();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_seeded_jitter_is_reproducible() {
    let mut a = SnapshotStore::new(boundary_seed(), Box::new(RandomJitter::seeded(99)));
    let mut b = SnapshotStore::new(boundary_seed(), Box::new(RandomJitter::seeded(99)));
    for _ in 0..10 {
        assert_eq!(*a.advance(), *b.advance());
    }
}

#[test]
fn test_snapshot_wire_shape() {
    let snap = Snapshot::new(
        vec![mithi()],
        vec![DangerZone {
            id: "DZ-01".to_string(),
            severity: 78,
        }],
        vec![Camera {
            id: "CAM-01".to_string(),
            risk: 30,
        }],
    );

    let json = serde_json::to_value(&snap).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "rivers": [{"id": 1, "name": "Mithi River", "level": 4.1, "risk": 65}],
            "zones": [{"id": "DZ-01", "severity": 78}],
            "cameras": [{"id": "CAM-01", "risk": 30}]
        })
    );
}
