//! Reconciling bodies with authoritative snapshots.

use approx::assert_relative_eq;
use glam::Vec2;
use isowalk::{
    Body, InterpolationBundle, InterpolationOutcome, KinematicBody, MovementState, Snapshot,
    SnapshotInterpolator, SnapshotStore,
};
use rstest::{fixture, rstest};
use test_utils::assert_vec2_near;

const NORMAL_SPEED: f32 = 2.0;

#[fixture]
fn interpolator() -> SnapshotInterpolator {
    SnapshotInterpolator::default()
}

fn snap(tick: u64, x: f32, movement: MovementState) -> Snapshot {
    Snapshot::at(tick, Vec2::new(x, 0.0), movement)
}

#[rstest]
fn idle_pair_at_rest_keeps_body_still(mut interpolator: SnapshotInterpolator) {
    let mut body = KinematicBody::default();
    let bundle = InterpolationBundle::between(
        snap(100, 0.0, MovementState::Idle),
        snap(110, 0.0, MovementState::Idle),
        105,
    );
    let outcome = interpolator.apply(&bundle, &mut body, NORMAL_SPEED);
    assert_eq!(outcome, InterpolationOutcome::AlreadyStopped);
    assert_eq!(body.velocity(), Vec2::ZERO);
}

#[rstest]
fn moving_pair_steers_to_arrive_on_time(mut interpolator: SnapshotInterpolator) {
    let mut body = KinematicBody::default();
    let bundle = InterpolationBundle::between(
        snap(100, 0.0, MovementState::Moving),
        snap(110, 100.0, MovementState::Moving),
        105,
    );
    let outcome = interpolator.apply(&bundle, &mut body, NORMAL_SPEED);
    assert_eq!(outcome, InterpolationOutcome::Steering { speed: 20.0 });
    assert_relative_eq!(body.velocity().x, 20.0);
    assert_relative_eq!(body.velocity().y, 0.0);
}

#[rstest]
#[case::stale(snap(100, 0.0, MovementState::Moving), snap(105, 10.0, MovementState::Moving), 105)]
#[case::acting(snap(100, 0.0, MovementState::Moving), snap(110, 90.0, MovementState::Acting), 105)]
#[case::far_stop(snap(100, 0.0, MovementState::Moving), snap(110, 90.0, MovementState::Idle), 105)]
fn soft_failures_leave_motion_alone(
    mut interpolator: SnapshotInterpolator,
    #[case] s1: Snapshot,
    #[case] s2: Snapshot,
    #[case] tick: u64,
) {
    let mut body = KinematicBody::default();
    body.set_velocity(Vec2::new(1.0, 1.0));
    let bundle = InterpolationBundle::between(s1, s2, tick);
    let outcome = interpolator.apply(&bundle, &mut body, NORMAL_SPEED);
    assert!(!outcome.moved_body(), "{outcome:?} changed the body");
    assert_eq!(body.velocity(), Vec2::new(1.0, 1.0));
}

#[rstest]
fn missing_positions_are_ignored(mut interpolator: SnapshotInterpolator) {
    let mut body = KinematicBody::default();
    let mut target = snap(110, 50.0, MovementState::Moving);
    target.position = None;
    let bundle = InterpolationBundle::between(snap(100, 0.0, MovementState::Moving), target, 105);
    assert_eq!(
        interpolator.apply(&bundle, &mut body, NORMAL_SPEED),
        InterpolationOutcome::MissingPosition
    );
}

#[rstest]
fn store_drives_body_through_walk_and_stop(mut interpolator: SnapshotInterpolator) {
    let mut store = SnapshotStore::new(0);
    store.insert(snap(0, 0.0, MovementState::Idle));
    store.insert(snap(10, 20.0, MovementState::Moving).moving_at(Vec2::new(2.0, 0.0)));
    store.insert(snap(20, 40.0, MovementState::Moving).moving_at(Vec2::new(2.0, 0.0)));
    store.insert(snap(30, 40.0, MovementState::Idle).facing(1.5));

    let mut body = KinematicBody::default();
    for tick in 0..40 {
        if let Some(bundle) = store.bundle(tick) {
            interpolator.apply(&bundle, &mut body, NORMAL_SPEED);
            store.zap(bundle.current_tick);
        }
        body.integrate();
    }
    assert_vec2_near(body.position(), Vec2::new(40.0, 0.0), 1e-3);
    assert!(body.is_stopped());
    assert_relative_eq!(body.orientation(), 1.5);
}
