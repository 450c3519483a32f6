//! World-level scenarios: gates, chases and remote entities.

use glam::Vec2;
use isowalk::motor::RouteSource;
use isowalk::{
    BlockerId, EntityId, Facing, MovementState, ReturnState, Snapshot, WorldError, WorldHandle,
};
use rstest::{fixture, rstest};
use test_utils::assert_vec2_near;
use test_utils::fixtures::{chunk_blocker, empty_world};

const BASE: Vec2 = Vec2::new(15.0, 15.0);

/// 3x3 chunks with a wall down the middle column and a gate at its foot.
struct Keep {
    world: WorldHandle,
    gate: BlockerId,
    chaser: EntityId,
}

#[fixture]
fn keep() -> Keep {
    let mut world = empty_world(90.0);
    world.add_blocker(chunk_blocker(1, 0, 30.0), true).unwrap();
    world.add_blocker(chunk_blocker(1, 1, 30.0), true).unwrap();
    let gate = world.add_blocker(chunk_blocker(1, 2, 30.0), true).unwrap();
    let chaser = world.spawn_at(BASE, 3.0);
    let motor = world.config().return_path_motor(BASE);
    world.attach_motor(chaser, motor).unwrap();
    for _ in 0..20 {
        world.drive(chaser, 0.0).unwrap();
        world.step();
    }
    Keep {
        world,
        gate,
        chaser,
    }
}

fn walk_home(keep: &mut Keep) -> u64 {
    for tick in 1..=200 {
        keep.world.step();
        let state = keep
            .world
            .entity(keep.chaser)
            .and_then(|e| e.return_motor())
            .map(|m| m.state());
        if state == Some(ReturnState::Returned) {
            return tick;
        }
    }
    panic!("chaser never made it home");
}

fn route_source(keep: &Keep) -> Option<RouteSource> {
    keep.world
        .entity(keep.chaser)
        .and_then(|e| e.return_motor())
        .and_then(|m| m.route_source())
}

#[rstest]
fn closed_gate_falls_back_to_trail(mut keep: Keep) {
    let chaser = keep.world.entity(keep.chaser).unwrap();
    assert_vec2_near(chaser.position(), Vec2::new(75.0, 15.0), 1e-3);
    assert!(keep.world.finish_return(keep.chaser).unwrap());
    assert_eq!(route_source(&keep), Some(RouteSource::Trail));
    let ticks = walk_home(&mut keep);
    assert!((20..=22).contains(&ticks), "took {ticks} ticks");
    assert_vec2_near(keep.world.entity(keep.chaser).unwrap().position(), BASE, 1e-3);
}

#[rstest]
fn open_gate_routes_through_it(mut keep: Keep) {
    assert!(keep.world.set_blocker_active(keep.gate, false).unwrap());
    assert!(keep.world.finish_return(keep.chaser).unwrap());
    assert_eq!(route_source(&keep), Some(RouteSource::Grid));
    let route = keep
        .world
        .entity(keep.chaser)
        .and_then(|e| e.return_motor())
        .and_then(|m| m.route())
        .unwrap()
        .points()
        .to_vec();
    assert!(route.contains(&Vec2::new(45.0, 75.0)), "route {route:?} misses the gate");
    walk_home(&mut keep);
    assert_vec2_near(keep.world.entity(keep.chaser).unwrap().position(), BASE, 1e-3);
}

#[rstest]
fn despawned_entities_stop_resolving(mut keep: Keep) {
    keep.world.despawn(keep.chaser).unwrap();
    assert_eq!(
        keep.world.finish_return(keep.chaser),
        Err(WorldError::UnknownEntity(keep.chaser))
    );
    assert_eq!(keep.world.step_entities(&[keep.chaser]), keep.world.current_tick());
}

#[rstest]
fn remote_entity_glides_toward_snapshots() {
    let mut world = empty_world(300.0);
    let ghost = world.spawn_remote(Vec2::new(200.0, 200.0), 2.0);
    let local = world.spawn_at(Vec2::ZERO, 2.0);
    let snapshots = [
        Snapshot::at(0, Vec2::new(200.0, 200.0), MovementState::Idle),
        Snapshot::at(20, Vec2::new(240.0, 200.0), MovementState::Moving),
    ];
    for snapshot in snapshots {
        assert!(world.push_snapshot(ghost, snapshot).unwrap());
    }
    assert!(!world
        .push_snapshot(local, Snapshot::at(0, Vec2::ZERO, MovementState::Idle))
        .unwrap());
    for _ in 0..5 {
        world.step();
    }
    let entity = world.entity(ghost).unwrap();
    assert!(entity.position().x > 205.0);
    assert_vec2_near(Vec2::new(0.0, entity.position().y), Vec2::new(0.0, 200.0), 1e-4);
    assert_eq!(entity.facing(), Facing::East);
}
