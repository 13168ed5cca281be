//! The projectile value type shared by every compute path.
//!
//! A [`Projectile`] carries both the physics inputs (launch angle and
//! velocity) and the outputs filled in by
//! [`RangeCalculator`](crate::physics::RangeCalculator). Inputs are created
//! with zeroed outputs; runners produce fresh values rather than mutating the
//! batch they were given.
//!
//! The layout is `#[repr(C)]` with five `f32` fields so that a batch can be
//! uploaded to a GPU storage buffer as-is (see `ops::wgpu`).

use core::fmt;

/// Per-object physics inputs and outputs.
///
/// Equality is exact on all five fields; no epsilon is applied. Use
/// [`crate::verify::Comparison::Tolerance`] where two backends are not
/// expected to agree bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(C)]
pub struct Projectile {
    /// Launch angle in degrees.
    pub angle: f32,
    /// Initial speed.
    pub velocity: f32,
    /// Horizontal distance travelled.
    pub range: f32,
    /// Total time of flight.
    pub flight_time: f32,
    /// Peak height reached.
    pub max_height: f32,
}

impl Projectile {
    /// Number of `f32` lanes in one projectile.
    pub const LANES: usize = 5;

    /// Creates an input projectile with zeroed outputs.
    ///
    /// # Example
    /// ```
    /// use projectile_range::projectile::Projectile;
    ///
    /// let p = Projectile::new(45.0, 100.0);
    /// assert_eq!(p.range, 0.0);
    /// ```
    pub const fn new(angle: f32, velocity: f32) -> Self {
        Self {
            angle,
            velocity,
            range: 0.0,
            flight_time: 0.0,
            max_height: 0.0,
        }
    }

    /// The fields in declaration order, as laid out in memory.
    pub const fn to_lanes(self) -> [f32; Self::LANES] {
        [
            self.angle,
            self.velocity,
            self.range,
            self.flight_time,
            self.max_height,
        ]
    }

    /// Rebuilds a projectile from its memory-order lanes.
    pub const fn from_lanes(lanes: [f32; Self::LANES]) -> Self {
        Self {
            angle: lanes[0],
            velocity: lanes[1],
            range: lanes[2],
            flight_time: lanes[3],
            max_height: lanes[4],
        }
    }
}

impl fmt::Display for Projectile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Angle: {} Velocity: {} Range: {} Time: {} Height: {}",
            self.angle, self.velocity, self.range, self.flight_time, self.max_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zeroes_outputs() {
        let p = Projectile::new(30.0, 50.0);
        assert_eq!(p.angle, 30.0);
        assert_eq!(p.velocity, 50.0);
        assert_eq!((p.range, p.flight_time, p.max_height), (0.0, 0.0, 0.0));
    }

    #[test]
    fn lanes_preserve_field_order() {
        let p = Projectile {
            angle: 1.0,
            velocity: 2.0,
            range: 3.0,
            flight_time: 4.0,
            max_height: 5.0,
        };
        assert_eq!(p.to_lanes(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(Projectile::from_lanes(p.to_lanes()), p);
        assert_eq!(core::mem::size_of::<Projectile>(), 4 * Projectile::LANES);
    }

    #[test]
    fn equality_is_exact() {
        let a = Projectile::new(45.0, 100.0);
        let mut b = a;
        assert_eq!(a, b);
        b.max_height = f32::from_bits(b.max_height.to_bits() + 1);
        assert_ne!(a, b);
    }

    #[test]
    fn display_lists_every_field() {
        let p = Projectile::new(10.0, 20.0);
        assert_eq!(
            p.to_string(),
            "Angle: 10 Velocity: 20 Range: 0 Time: 0 Height: 0"
        );
    }
}
