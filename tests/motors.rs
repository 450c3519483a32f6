//! Motors driving entities through the world handle.

use std::f32::consts::PI;

use approx::assert_relative_eq;
use glam::Vec2;
use isowalk::motor::PathProgress;
use isowalk::vector_math::normalize_angle;
use isowalk::{
    Body, Direction, Facing, FacingNames, KinematicBody, MotorSpec, PathMotor, Polyline,
    RotationSmoother, WorldHandle,
};
use rstest::{fixture, rstest};
use test_utils::assert_vec2_near;
use test_utils::fixtures::empty_world;

#[fixture]
fn world() -> WorldHandle {
    empty_world(300.0)
}

fn run(world: &mut WorldHandle, ticks: u64) {
    for _ in 0..ticks {
        world.step();
    }
}

#[rstest]
fn patrol_dwells_at_the_far_end_then_walks_back(mut world: WorldHandle) {
    let id = world.spawn_at(Vec2::new(10.0, 10.0), 2.0);
    let corridor = Polyline::open(vec![Vec2::new(10.0, 10.0), Vec2::new(30.0, 10.0)]);
    // 100 ms at 60 Hz is six ticks.
    let motor = PathMotor::new(corridor, Direction::Forward).with_dwell(0, 100);
    world.attach_motor(id, motor).unwrap();

    run(&mut world, 10);
    assert_vec2_near(world.entity(id).unwrap().position(), Vec2::new(30.0, 10.0), 1e-4);
    run(&mut world, 6);
    assert_vec2_near(world.entity(id).unwrap().position(), Vec2::new(30.0, 10.0), 1e-4);
    run(&mut world, 4);
    let entity = world.entity(id).unwrap();
    assert_vec2_near(entity.position(), Vec2::new(22.0, 10.0), 1e-4);
    // Turning clockwise from east towards west passes south.
    assert_eq!(entity.facing(), Facing::SouthEast);
}

#[rstest]
fn closed_patrol_loops_back_to_start(mut world: WorldHandle) {
    let start = Vec2::new(20.0, 20.0);
    let id = world.spawn_at(start, 2.0);
    let square = Polyline::closed(vec![
        start,
        Vec2::new(120.0, 20.0),
        Vec2::new(120.0, 120.0),
        Vec2::new(20.0, 120.0),
    ]);
    world
        .attach_motor(id, PathMotor::new(square, Direction::Forward))
        .unwrap();
    run(&mut world, 50);
    assert_vec2_near(world.entity(id).unwrap().position(), Vec2::new(120.0, 20.0), 1e-3);
    run(&mut world, 150);
    assert_vec2_near(world.entity(id).unwrap().position(), start, 1e-3);
}

#[rstest]
fn saved_progress_resumes_at_the_same_spot() {
    let line = Polyline::open(vec![Vec2::ZERO, Vec2::new(50.0, 0.0)]);
    let mut original = PathMotor::new(line.clone(), Direction::Forward);
    original.restore(PathProgress {
        distance: 18.0,
        direction: Direction::Backward,
    });
    let saved = serde_json::to_string(&original.progress()).unwrap();

    let mut resumed = PathMotor::new(line, Direction::Forward);
    resumed.restore(serde_json::from_str(&saved).unwrap());
    assert_eq!(resumed.progress(), original.progress());
    let (point, heading) = resumed.follower().current().unwrap();
    assert_vec2_near(point, Vec2::new(18.0, 0.0), 1e-5);
    assert_relative_eq!(heading.abs(), PI, epsilon = 1e-5);
}

#[rstest]
fn authored_guard_faces_configured_direction(mut world: WorldHandle) {
    let spec: MotorSpec = toml::from_str(
        r#"
        kind = "fix_position"
        point = [40.0, 40.0]
        facing = "west"
        "#,
    )
    .unwrap();
    let motor = spec.build(&FacingNames::new(), world.config()).unwrap();
    let id = world.spawn_at(Vec2::new(40.0, 40.0), 1.0);
    world.attach_motor(id, motor).unwrap();
    run(&mut world, 30);
    let guard = world.entity(id).unwrap();
    assert_eq!(guard.facing(), Facing::West);
    assert!(guard.body().is_stopped());
}

#[rstest]
fn smoother_never_overshoots_a_half_turn() {
    let mut body = KinematicBody::default();
    let mut smoother = RotationSmoother::default();
    let mut previous = 0.0;
    let mut turns = 0;
    while smoother.rotate(&mut body, PI) {
        let current = normalize_angle(body.orientation());
        assert!(current >= previous, "swept backwards to {current}");
        assert!(current <= PI, "overshot to {current}");
        previous = current;
        turns += 1;
        assert!(turns < 100, "rotation never settled");
    }
    assert_eq!(body.orientation(), PI);
}
