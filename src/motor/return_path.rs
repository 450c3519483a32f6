//! Return-to-base behaviour for entities that were lured away.
//!
//! While chasing, the owning AI steers the body through
//! [`ReturnPathMotor::move_body`], which also records a breadcrumb trail.
//! When the chase ends, [`ReturnPathMotor::finish`] picks a route home:
//! a coarse grid path when one exists, otherwise the recorded trail walked
//! backwards. The motor then follows that route tick by tick until it
//! reaches the base point.

use glam::Vec2;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::{WaitState, WaitTimer};
use crate::body::Body;
use crate::clock::TickClock;
use crate::grid::ChunkPathfinder;
use crate::path::{Direction, PathFollower, Polyline};
use crate::trail::TrailRecorder;
use crate::vector_math::limit_speed;
use crate::{PATH_EPSILON, TRAIL_MIN_SPACING};

/// Phase of the return behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReturnState {
    /// Driven externally; the trail is being recorded.
    #[default]
    Idle,
    /// Following the route home.
    Returning,
    /// Arrived at the base point.
    Returned,
}

/// Where the homeward route came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteSource {
    /// Found by the chunk pathfinder.
    Grid,
    /// The recorded trail walked backwards.
    Trail,
}

/// Motor bringing an entity back to its base point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPathMotor {
    base: Vec2,
    state: ReturnState,
    trail: TrailRecorder,
    follower: PathFollower,
    timer: WaitTimer,
    wait_ms: u64,
    last_seen: Option<Vec2>,
    route_source: Option<RouteSource>,
}

impl ReturnPathMotor {
    /// Creates an idle motor returning to `base`.
    #[must_use]
    pub fn new(base: Vec2) -> Self {
        Self::with_settings(base, TRAIL_MIN_SPACING, 0)
    }

    /// Creates an idle motor with explicit trail spacing and a delay, in
    /// milliseconds, between [`Self::finish`] and setting off.
    #[must_use]
    pub fn with_settings(base: Vec2, min_spacing: f32, wait_ms: u64) -> Self {
        Self {
            base,
            state: ReturnState::Idle,
            trail: TrailRecorder::new(min_spacing),
            follower: PathFollower::default(),
            timer: WaitTimer::default(),
            wait_ms,
            last_seen: None,
            route_source: None,
        }
    }

    /// The point the entity returns to.
    #[must_use]
    pub const fn base_point(&self) -> Vec2 {
        self.base
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> ReturnState {
        self.state
    }

    /// Whether the motor is following a route home.
    #[must_use]
    pub fn is_returning(&self) -> bool {
        self.state == ReturnState::Returning
    }

    /// Whether the entity has arrived home since the last external move.
    #[must_use]
    pub fn has_returned(&self) -> bool {
        self.state == ReturnState::Returned
    }

    /// Whether the start delay armed by [`Self::finish`] is over, or none was
    /// armed.
    #[must_use]
    pub fn is_return_ready(&self, clock: &dyn TickClock) -> bool {
        !self.timer.is_running(clock)
    }

    /// The recorded trail.
    #[must_use]
    pub const fn trail(&self) -> &TrailRecorder {
        &self.trail
    }

    /// The route currently being followed.
    #[must_use]
    pub const fn route(&self) -> Option<&Polyline> {
        self.follower.path()
    }

    /// Which source produced the current route.
    #[must_use]
    pub const fn route_source(&self) -> Option<RouteSource> {
        self.route_source
    }

    /// Where the chased target was last seen.
    #[must_use]
    pub const fn last_seen_point(&self) -> Option<Vec2> {
        self.last_seen
    }

    /// Records where the chased target was last seen.
    pub const fn set_last_seen_point(&mut self, point: Vec2) {
        self.last_seen = Some(point);
    }

    /// Forgets the last seen target position.
    pub const fn clear_last_seen_point(&mut self) {
        self.last_seen = None;
    }

    /// Steers the body externally and records the movement in the trail.
    ///
    /// A return in progress is abandoned, which also drops the trail it was
    /// based on, so a fresh pursuit starts recording from scratch.
    pub fn move_body(&mut self, body: &mut dyn Body, angle: f32, speed: f32) {
        match self.state {
            ReturnState::Returning => {
                debug!("return to {} interrupted", self.base);
                self.abandon_route();
                self.trail.reset();
            }
            ReturnState::Returned => self.trail.reset(),
            ReturnState::Idle => {}
        }
        self.state = ReturnState::Idle;
        body.set_velocity_from_angle(angle, speed);
        self.trail.add_point(body.position(), angle);
    }

    /// Plans the route home from `position` and starts returning.
    ///
    /// Returns `false` when neither the grid nor the trail yields a route;
    /// the motor then stays idle and the entity holds its place.
    pub fn finish(
        &mut self,
        position: Vec2,
        pathfinder: Option<&ChunkPathfinder>,
        clock: &dyn TickClock,
    ) -> bool {
        self.abandon_route();
        if position.distance(self.base) <= PATH_EPSILON {
            self.arrive();
            return true;
        }
        let planned = self
            .grid_route(position, pathfinder)
            .map(|route| (route, RouteSource::Grid))
            .or_else(|| {
                self.trail_route(position)
                    .map(|route| (route, RouteSource::Trail))
            });
        let Some((route, source)) = planned else {
            warn!("no route home from {position} to {}, holding", self.base);
            self.state = ReturnState::Idle;
            return false;
        };
        if !self.follower.set_path(Polyline::open(route)) {
            self.state = ReturnState::Idle;
            return false;
        }
        debug!(
            "returning to {} via {source:?} route of length {:.1}",
            self.base,
            self.follower.total_length()
        );
        if self.wait_ms > 0 {
            self.timer.arm(clock, self.wait_ms);
        }
        self.route_source = Some(source);
        self.state = ReturnState::Returning;
        true
    }

    fn grid_route(
        &self,
        position: Vec2,
        pathfinder: Option<&ChunkPathfinder>,
    ) -> Option<Vec<Vec2>> {
        let mut route = pathfinder?.find_path(position, self.base)?;
        if route.first() != Some(&position) {
            route.insert(0, position);
        }
        Some(route)
    }

    fn trail_route(&self, position: Vec2) -> Option<Vec<Vec2>> {
        let homeward = self.trail.homeward_from(position);
        let first = *homeward.first()?;
        let mut route = Vec::with_capacity(homeward.len() + 2);
        if first != position {
            route.push(position);
        }
        route.extend(homeward);
        if let Some(&oldest) = route.last() {
            if oldest.distance(self.base) > self.trail.min_spacing() {
                route.push(self.base);
            }
        }
        (route.len() >= 2).then_some(route)
    }

    fn abandon_route(&mut self) {
        self.follower.clear();
        self.follower.set_direction(Direction::Forward);
        self.timer.disarm();
        self.route_source = None;
    }

    fn arrive(&mut self) {
        info!("returned to base {}", self.base);
        self.abandon_route();
        self.trail.reset();
        self.state = ReturnState::Returned;
    }

    /// Advances the return by one tick. Returns the heading to face while
    /// moving.
    ///
    /// Idle motors leave the body alone since it is being driven through
    /// [`Self::move_body`].
    pub fn update_body(
        &mut self,
        body: &mut dyn Body,
        speed: f32,
        clock: &dyn TickClock,
    ) -> Option<f32> {
        match self.state {
            ReturnState::Idle => return None,
            ReturnState::Returned => {
                body.stop();
                return None;
            }
            ReturnState::Returning => {}
        }
        if self.follower.at_end() {
            body.stop();
            self.arrive();
            return None;
        }
        match self.timer.state(clock) {
            WaitState::Running => {
                body.stop();
                return None;
            }
            WaitState::Overdue => self.timer.disarm(),
            WaitState::Invalid => {}
        }
        self.follower.step(speed);
        let (point, heading) = self.follower.current()?;
        body.set_velocity(limit_speed(point - body.position(), speed));
        Some(heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KinematicBody;
    use crate::clock::{FixedRateClock, MockTickClock};
    use crate::grid::{Rect, WalkabilityGrid};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn chased() -> (ReturnPathMotor, KinematicBody) {
        let mut motor = ReturnPathMotor::with_settings(Vec2::ZERO, 5.0, 0);
        let mut body = KinematicBody::default();
        for angle in [0.0, 0.0, 0.0, 1.0, 1.0, 1.0] {
            motor.move_body(&mut body, angle, 4.0);
            body.integrate();
        }
        (motor, body)
    }

    #[rstest]
    fn move_body_records_trail(chased: (ReturnPathMotor, KinematicBody)) {
        let (motor, _) = chased;
        assert!(motor.trail().points().len() >= 2);
        assert_eq!(motor.state(), ReturnState::Idle);
    }

    #[rstest]
    fn falls_back_to_trail_without_grid(chased: (ReturnPathMotor, KinematicBody)) {
        let (mut motor, body) = chased;
        let clock = FixedRateClock::default();
        assert!(motor.finish(body.position, None, &clock));
        assert!(motor.is_returning());
        assert_eq!(motor.route_source(), Some(RouteSource::Trail));
        let route = motor.route().unwrap();
        assert_eq!(route.points().first(), Some(&body.position));
    }

    #[rstest]
    fn prefers_grid_route(chased: (ReturnPathMotor, KinematicBody)) {
        let (mut motor, body) = chased;
        let bounds = Rect::from_min_size(Vec2::splat(-100.0), Vec2::splat(200.0));
        let finder = ChunkPathfinder::new(WalkabilityGrid::build(bounds, 30.0, []).unwrap());
        let clock = FixedRateClock::default();
        assert!(motor.finish(body.position, Some(&finder), &clock));
        assert_eq!(motor.route_source(), Some(RouteSource::Grid));
        assert_eq!(motor.route().unwrap().points().last(), Some(&Vec2::ZERO));
    }

    #[rstest]
    fn empty_trail_stays_idle() {
        let mut motor = ReturnPathMotor::new(Vec2::ZERO);
        let clock = FixedRateClock::default();
        assert!(!motor.finish(Vec2::new(50.0, 0.0), None, &clock));
        assert_eq!(motor.state(), ReturnState::Idle);
        assert!(motor.route().is_none());
    }

    #[rstest]
    fn start_delay_holds_body() {
        let mut motor = ReturnPathMotor::with_settings(Vec2::ZERO, 1.0, 250);
        let mut body = KinematicBody::default();
        motor.move_body(&mut body, 0.0, 5.0);
        body.integrate();
        motor.move_body(&mut body, 0.5, 5.0);
        body.integrate();

        let mut arming = MockTickClock::new();
        arming.expect_tick_add_ms().return_const(20_u64);
        assert!(motor.finish(body.position, None, &arming));

        let mut early = MockTickClock::new();
        early.expect_current_tick().return_const(19_u64);
        assert!(!motor.is_return_ready(&early));
        assert!(motor.update_body(&mut body, 2.0, &early).is_none());
        assert!(body.is_stopped());

        let mut due = MockTickClock::new();
        due.expect_current_tick().return_const(20_u64);
        assert!(motor.is_return_ready(&due));
        assert!(motor.update_body(&mut body, 2.0, &due).is_some());
        assert!(!body.is_stopped());
    }

    #[rstest]
    fn arrives_and_clears_trail(chased: (ReturnPathMotor, KinematicBody)) {
        let (mut motor, mut body) = chased;
        let mut clock = FixedRateClock::default();
        motor.finish(body.position, None, &clock);
        for _ in 0..100 {
            motor.update_body(&mut body, 3.0, &clock);
            body.integrate();
            clock.advance();
            if motor.has_returned() {
                break;
            }
        }
        assert!(motor.has_returned());
        assert!(motor.trail().is_empty());
        assert_relative_eq!(body.position.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(body.position.y, 0.0, epsilon = 1e-3);
    }

    #[rstest]
    fn external_move_interrupts_return(chased: (ReturnPathMotor, KinematicBody)) {
        let (mut motor, mut body) = chased;
        let clock = FixedRateClock::default();
        motor.finish(body.position, None, &clock);
        motor.move_body(&mut body, 2.0, 1.0);
        assert_eq!(motor.state(), ReturnState::Idle);
        assert!(motor.route().is_none());
        assert_eq!(motor.trail().points().len(), 1);
    }

    #[rstest]
    fn tracks_last_seen_point() {
        let mut motor = ReturnPathMotor::new(Vec2::ZERO);
        motor.set_last_seen_point(Vec2::new(3.0, 4.0));
        assert_eq!(motor.last_seen_point(), Some(Vec2::new(3.0, 4.0)));
        motor.clear_last_seen_point();
        assert_eq!(motor.last_seen_point(), None);
    }
}
