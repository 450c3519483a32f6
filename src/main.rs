//! Command-line demo for the isowalk locomotion crate.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use isowalk::numeric::index_to_f32;
use isowalk::{
    init_logging, BlockingShape, Direction, Facing, FacingNames, FixPositionMotor,
    LocomotionConfig, MovementState, PathMotor, Polyline, Rect, ReturnPathMotor, Snapshot,
    WorldHandle,
};
use log::{info, warn};

/// Runs a scripted patrol, chase and return scenario and logs the outcome
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,
}

fn load_config(path: Option<&PathBuf>) -> Result<LocomotionConfig> {
    path.map_or_else(
        || Ok(LocomotionConfig::default()),
        |file| {
            LocomotionConfig::load(file)
                .with_context(|| format!("loading configuration from {}", file.display()))
        },
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    let names = FacingNames::new();
    let scene = Rect::new(Vec2::ZERO, Vec2::new(300.0, 300.0));
    let mut world = WorldHandle::new(scene, config.clone())?;

    world.add_blocker(
        BlockingShape::Rect(Rect::new(Vec2::new(140.0, 0.0), Vec2::new(160.0, 240.0))),
        true,
    )?;
    let gate = world.add_blocker(
        BlockingShape::Rect(Rect::new(Vec2::new(140.0, 240.0), Vec2::new(160.0, 300.0))),
        true,
    )?;

    let guard = world.spawn_at(Vec2::new(60.0, 260.0), 1.5);
    let guard_motor = if config.motors.contains_key("guard") {
        config.motor("guard", &names)?
    } else {
        FixPositionMotor::new(Vec2::new(60.0, 260.0), Some(Facing::South)).into()
    };
    world.attach_motor(guard, guard_motor)?;

    let patroller = world.spawn_at(Vec2::new(20.0, 20.0), 2.0);
    let square = Polyline::closed(vec![
        Vec2::new(20.0, 20.0),
        Vec2::new(120.0, 20.0),
        Vec2::new(120.0, 120.0),
        Vec2::new(20.0, 120.0),
    ]);
    world.attach_motor(patroller, PathMotor::new(square, Direction::Forward))?;

    let base = Vec2::new(45.0, 45.0);
    let chaser = world.spawn_at(base, 3.0);
    world.attach_motor(chaser, config.return_path_motor(base))?;

    let ghost = world.spawn_remote(Vec2::new(200.0, 200.0), 2.0);
    for (i, tick) in (0..args.ticks).step_by(10).enumerate() {
        let x = (200.0 + 15.0 * index_to_f32(i)).min(290.0);
        let movement = if i % 4 == 3 {
            MovementState::Idle
        } else {
            MovementState::Moving
        };
        world.push_snapshot(ghost, Snapshot::at(tick, Vec2::new(x, 200.0), movement))?;
    }

    let chase_until = args.ticks / 4;
    let gate_opens_at = args.ticks / 2;
    for _ in 0..args.ticks {
        let tick = world.current_tick();
        if tick < chase_until {
            let angle = if tick < chase_until / 2 { 0.3 } else { 1.2 };
            world.drive(chaser, angle)?;
        } else if tick == chase_until && !world.finish_return(chaser)? {
            warn!("chaser could not find a way home");
        }
        if tick == gate_opens_at && world.set_blocker_active(gate, false)? {
            info!("gate opened at tick {tick}");
        }
        world.step();
    }

    for id in world.ids() {
        let entity = world.entity(id).context("entity vanished during the run")?;
        let kind = entity
            .motor()
            .map_or_else(|| "snapshots".to_owned(), |m| format!("{:?}", m.kind()));
        info!(
            "{id} ({kind}) ends at {} facing {:?}",
            entity.position(),
            entity.facing()
        );
    }
    if let Some(state) = world
        .entity(chaser)
        .and_then(|e| e.return_motor())
        .map(ReturnPathMotor::state)
    {
        info!("chaser return state: {state:?}");
    }
    Ok(())
}
