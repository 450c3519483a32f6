//! Polyline paths and the distance-based follower that walks them.
//!
//! Both [`PathMotor`](crate::motor::PathMotor) and
//! [`ReturnPathMotor`](crate::motor::ReturnPathMotor) drive bodies by
//! advancing a [`PathFollower`] a fixed distance per tick and steering toward
//! the point it reports.

mod follower;
mod polyline;

pub use follower::{Direction, PathFollower};
pub use polyline::{Polyline, Segment};
