//! Discrete facing derived from continuous orientation.
//!
//! Sprite selection works on a small set of compass directions. Entities
//! keep their continuous orientation and derive one of these each tick.
//! Angles follow the screen-space convention of
//! [`vector_math`](crate::vector_math): `y` grows downward, so north is
//! `-π/2`.
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::vector_math::angular_distance;

/// Compass direction an entity is drawn facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing `+x`.
    East,
    /// Between east and south.
    SouthEast,
    /// Facing `+y` (down the screen).
    South,
    /// Between south and west.
    SouthWest,
    /// Facing `-x`.
    West,
    /// Between west and north.
    NorthWest,
    /// Facing `-y` (up the screen).
    North,
    /// Between north and east.
    NorthEast,
}

/// How many discrete facings an entity's sprite set supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FacingResolution {
    /// Only the four cardinal directions.
    Four,
    /// Cardinal and diagonal directions.
    #[default]
    Eight,
}

const CARDINALS: [Facing; 4] = [Facing::East, Facing::South, Facing::West, Facing::North];

const ALL: [Facing; 8] = [
    Facing::East,
    Facing::SouthEast,
    Facing::South,
    Facing::SouthWest,
    Facing::West,
    Facing::NorthWest,
    Facing::North,
    Facing::NorthEast,
];

impl Facing {
    /// Orientation in radians this facing points along.
    ///
    /// # Examples
    /// ```
    /// use isowalk::facing::Facing;
    /// assert_eq!(Facing::East.to_radian(), 0.0);
    /// ```
    #[must_use]
    pub const fn to_radian(self) -> f32 {
        match self {
            Self::East => 0.0,
            Self::SouthEast => FRAC_PI_4,
            Self::South => FRAC_PI_2,
            Self::SouthWest => 3.0 * FRAC_PI_4,
            Self::West => PI,
            Self::NorthWest => -3.0 * FRAC_PI_4,
            Self::North => -FRAC_PI_2,
            Self::NorthEast => -FRAC_PI_4,
        }
    }

    /// Facing closest to `radian` among those allowed by `resolution`.
    ///
    /// Ties go to the direction listed first, walking clockwise from east.
    ///
    /// # Examples
    /// ```
    /// use isowalk::facing::{Facing, FacingResolution};
    /// assert_eq!(Facing::nearest(FacingResolution::Eight, 0.7), Facing::SouthEast);
    /// assert_eq!(Facing::nearest(FacingResolution::Four, 0.7), Facing::East);
    /// ```
    #[must_use]
    pub fn nearest(resolution: FacingResolution, radian: f32) -> Self {
        let candidates: &[Self] = match resolution {
            FacingResolution::Four => &CARDINALS,
            FacingResolution::Eight => &ALL,
        };
        let mut best = Self::East;
        let mut best_distance = f32::INFINITY;
        for &facing in candidates {
            let distance = angular_distance(facing.to_radian(), radian);
            if distance < best_distance {
                best_distance = distance;
                best = facing;
            }
        }
        best
    }
}

/// Immutable lookup from authored direction names to [`Facing`].
///
/// Built once at start-up and passed to whatever parses authored data, so no
/// code path reaches for a global table.
#[derive(Debug, Clone)]
pub struct FacingNames {
    by_name: HashMap<&'static str, Facing>,
}

impl FacingNames {
    /// Builds the table with both long and compass-abbreviation spellings.
    #[must_use]
    pub fn new() -> Self {
        let entries = [
            ("east", Facing::East),
            ("e", Facing::East),
            ("south_east", Facing::SouthEast),
            ("se", Facing::SouthEast),
            ("south", Facing::South),
            ("s", Facing::South),
            ("south_west", Facing::SouthWest),
            ("sw", Facing::SouthWest),
            ("west", Facing::West),
            ("w", Facing::West),
            ("north_west", Facing::NorthWest),
            ("nw", Facing::NorthWest),
            ("north", Facing::North),
            ("n", Facing::North),
            ("north_east", Facing::NorthEast),
            ("ne", Facing::NorthEast),
        ];
        Self {
            by_name: entries.into_iter().collect(),
        }
    }

    /// Resolves a name, ignoring ASCII case and surrounding whitespace.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Facing> {
        let key = name.trim().to_ascii_lowercase().replace('-', "_");
        self.by_name.get(key.as_str()).copied()
    }
}

impl Default for FacingNames {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, Facing::East)]
    #[case(FRAC_PI_2, Facing::South)]
    #[case(-FRAC_PI_2, Facing::North)]
    #[case(PI, Facing::West)]
    #[case(-PI + 0.01, Facing::West)]
    #[case(-0.8, Facing::NorthEast)]
    fn nearest_eight_way(#[case] radian: f32, #[case] expected: Facing) {
        assert_eq!(Facing::nearest(FacingResolution::Eight, radian), expected);
    }

    #[rstest]
    #[case(-0.8, Facing::North)]
    #[case(2.0, Facing::South)]
    #[case(2.5, Facing::West)]
    fn nearest_four_way(#[case] radian: f32, #[case] expected: Facing) {
        assert_eq!(Facing::nearest(FacingResolution::Four, radian), expected);
    }

    #[rstest]
    #[case("north", Some(Facing::North))]
    #[case(" NE ", Some(Facing::NorthEast))]
    #[case("south-west", Some(Facing::SouthWest))]
    #[case("up", None)]
    fn names_resolve(#[case] name: &str, #[case] expected: Option<Facing>) {
        let names = FacingNames::new();
        assert_eq!(names.resolve(name), expected);
    }
}
