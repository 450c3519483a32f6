//! In-memory world state: the entity table, scene blockers and the shared
//! pathfinder.
//!
//! The handle owns every [`WorldEntity`]. Motors never hold references to
//! entities; callers address them through [`EntityId`] handles that are
//! looked up again on every call, so a despawned entity simply stops
//! resolving. The walkability grid is rebuilt from the active blockers
//! whenever one is added or toggled and replaced wholesale.

use std::fmt;

use glam::Vec2;
use hashbrown::HashMap;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{FixedRateClock, TickClock};
use crate::config::LocomotionConfig;
use crate::entity::WorldEntity;
use crate::grid::{BlockingShape, ChunkPathfinder, GridError, Rect, WalkabilityGrid};
use crate::motor::Motor;
use crate::snapshot::Snapshot;

/// Entity identifier with type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Scene blocker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockerId(pub u64);

impl fmt::Display for BlockerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blocker#{}", self.0)
    }
}

/// Errors returned by [`WorldHandle`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// No entity has this identifier.
    #[error("unknown {0}")]
    UnknownEntity(EntityId),
    /// No blocker has this identifier.
    #[error("unknown {0}")]
    UnknownBlocker(BlockerId),
    /// The entity is not driven by a return motor.
    #[error("{0} has no return motor")]
    NoReturnMotor(EntityId),
    /// The walkability grid could not be built.
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq)]
struct Blocker {
    shape: BlockingShape,
    active: bool,
}

/// Owner of all simulated state for one scene.
#[derive(Debug, Clone)]
pub struct WorldHandle {
    config: LocomotionConfig,
    clock: FixedRateClock,
    scene: Rect,
    entities: HashMap<EntityId, WorldEntity>,
    blockers: HashMap<BlockerId, Blocker>,
    pathfinder: ChunkPathfinder,
    next_entity: u64,
    next_blocker: u64,
}

impl WorldHandle {
    /// Creates an empty world covering `scene`.
    ///
    /// # Errors
    /// Returns [`WorldError::Grid`] when `scene` is empty or the configured
    /// chunk size is unusable.
    pub fn new(scene: Rect, config: LocomotionConfig) -> Result<Self, WorldError> {
        let grid = WalkabilityGrid::build(scene, config.grid.chunk_size, [])?;
        let pathfinder = ChunkPathfinder::with_diagonal_cost(grid, config.grid.diagonal_cost);
        info!("World handle created for {scene:?}");
        Ok(Self {
            clock: config.clock(),
            config,
            scene,
            entities: HashMap::new(),
            blockers: HashMap::new(),
            pathfinder,
            next_entity: 0,
            next_blocker: 0,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// The simulation clock.
    #[must_use]
    pub const fn clock(&self) -> &FixedRateClock {
        &self.clock
    }

    /// Tick of the last [`Self::step`].
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.clock.current_tick()
    }

    /// Scene bounds.
    #[must_use]
    pub const fn scene(&self) -> Rect {
        self.scene
    }

    /// Pathfinder over the current walkability grid.
    #[must_use]
    pub const fn pathfinder(&self) -> &ChunkPathfinder {
        &self.pathfinder
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entity identifiers in spawn order.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Adds `entity` and returns its handle.
    pub fn spawn(&mut self, entity: WorldEntity) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        debug!("spawned {id} at {}", entity.position());
        self.entities.insert(id, entity);
        id
    }

    /// Creates an entity with the configured rotation smoother and adds it.
    pub fn spawn_at(&mut self, position: Vec2, speed: f32) -> EntityId {
        let entity =
            WorldEntity::new(position, speed).with_smoother(self.config.rotation_smoother());
        self.spawn(entity)
    }

    /// Creates a snapshot-driven entity and adds it.
    pub fn spawn_remote(&mut self, position: Vec2, speed: f32) -> EntityId {
        let entity = WorldEntity::new(position, speed)
            .with_remote_sync(self.config.snapshot_store(), self.config.interpolator());
        self.spawn(entity)
    }

    /// Removes an entity, discarding its motor and trail.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle.
    pub fn despawn(&mut self, id: EntityId) -> Result<WorldEntity, WorldError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        debug!("despawned {id}");
        Ok(entity)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&WorldEntity> {
        self.entities.get(&id)
    }

    /// Looks up an entity for modification.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut WorldEntity> {
        self.entities.get_mut(&id)
    }

    fn resolve(&mut self, id: EntityId) -> Result<&mut WorldEntity, WorldError> {
        self.entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))
    }

    /// Attaches `motor` to an entity that has none.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle.
    ///
    /// # Panics
    /// Panics when the entity already has a motor.
    pub fn attach_motor(
        &mut self,
        id: EntityId,
        motor: impl Into<Motor>,
    ) -> Result<(), WorldError> {
        self.resolve(id)?.attach_motor(motor);
        Ok(())
    }

    /// Detaches an entity's motor.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle.
    pub fn clear_motor(&mut self, id: EntityId) -> Result<Option<Motor>, WorldError> {
        Ok(self.resolve(id)?.clear_motor())
    }

    /// Clears the current motor and attaches `motor`, returning the old one.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle.
    pub fn replace_motor(
        &mut self,
        id: EntityId,
        motor: impl Into<Motor>,
    ) -> Result<Option<Motor>, WorldError> {
        let entity = self.resolve(id)?;
        let previous = entity.clear_motor();
        entity.attach_motor(motor);
        Ok(previous)
    }

    /// Adds a blocking shape. Active shapes take effect immediately.
    ///
    /// # Errors
    /// Returns [`WorldError::Grid`] when the grid cannot be rebuilt.
    pub fn add_blocker(
        &mut self,
        shape: BlockingShape,
        active: bool,
    ) -> Result<BlockerId, WorldError> {
        let id = BlockerId(self.next_blocker);
        self.next_blocker += 1;
        self.blockers.insert(id, Blocker { shape, active });
        if active {
            self.rebuild_grid()?;
        }
        Ok(id)
    }

    /// Opens or closes a blocker such as a gate. Returns whether anything
    /// changed.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownBlocker`] for a stale handle or
    /// [`WorldError::Grid`] when the grid cannot be rebuilt.
    pub fn set_blocker_active(&mut self, id: BlockerId, active: bool) -> Result<bool, WorldError> {
        let blocker = self
            .blockers
            .get_mut(&id)
            .ok_or(WorldError::UnknownBlocker(id))?;
        if blocker.active == active {
            return Ok(false);
        }
        blocker.active = active;
        debug!("{id} is now {}", if active { "blocking" } else { "open" });
        self.rebuild_grid()?;
        Ok(true)
    }

    /// Rasterises the active blockers into a fresh walkability grid.
    ///
    /// # Errors
    /// Returns [`WorldError::Grid`] when the grid cannot be built; the
    /// previous grid stays in place.
    pub fn rebuild_grid(&mut self) -> Result<(), WorldError> {
        let active = self
            .blockers
            .values()
            .filter(|blocker| blocker.active)
            .map(|blocker| &blocker.shape);
        let grid = WalkabilityGrid::build(self.scene, self.config.grid.chunk_size, active)?;
        info!(
            "rebuilt walkability grid: {}x{} chunks, {} blocked",
            grid.cols(),
            grid.rows(),
            grid.blocked_count()
        );
        self.pathfinder.replace_grid(grid);
        Ok(())
    }

    /// Steers a chasing entity along `angle`, recording its trail.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle or
    /// [`WorldError::NoReturnMotor`] when the entity has no return motor.
    pub fn drive(&mut self, id: EntityId, angle: f32) -> Result<(), WorldError> {
        if self.resolve(id)?.drive(angle) {
            Ok(())
        } else {
            Err(WorldError::NoReturnMotor(id))
        }
    }

    /// Ends a chase and sends the entity home. Returns whether a route was
    /// found.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle or
    /// [`WorldError::NoReturnMotor`] when the entity has no return motor.
    pub fn finish_return(&mut self, id: EntityId) -> Result<bool, WorldError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        entity
            .finish_return(Some(&self.pathfinder), &self.clock)
            .ok_or(WorldError::NoReturnMotor(id))
    }

    /// Delivers an authoritative snapshot. Returns `false` when the entity
    /// is locally driven and ignores snapshots.
    ///
    /// # Errors
    /// Returns [`WorldError::UnknownEntity`] for a stale handle.
    pub fn push_snapshot(
        &mut self,
        id: EntityId,
        snapshot: Snapshot,
    ) -> Result<bool, WorldError> {
        Ok(self.resolve(id)?.push_snapshot(snapshot))
    }

    /// Advances the clock and ticks every entity in spawn order.
    pub fn step(&mut self) -> u64 {
        let ids = self.ids();
        self.step_entities(&ids)
    }

    /// Advances the clock and ticks the listed entities.
    ///
    /// Handles that no longer resolve are logged and skipped. Returns the
    /// new tick.
    pub fn step_entities(&mut self, ids: &[EntityId]) -> u64 {
        let tick = self.clock.advance();
        for id in ids {
            match self.entities.get_mut(id) {
                Some(entity) => entity.tick(&self.clock),
                None => warn!("skipping stale handle {id} at tick {tick}"),
            }
        }
        tick
    }
}
