//! Projectile-motion formulas.
//!
//! [`RangeCalculator::compute`] is the single source of truth for the
//! physics: both the scalar and the CPU-parallel runners call it, which is
//! what lets their outputs be compared bit for bit.
//!
//! # Precision
//!
//! Fields are stored as `f32` while the constants are `f64`. The evaluation
//! order below is fixed: trigonometry and the divisions/multiplications by
//! the constants happen in `f64`, everything else in `f32`. Changing the
//! order (or letting one path fuse a multiply-add) breaks exact equality.

use crate::projectile::Projectile;

/// Truncated value of π used by the angle conversion.
pub const PI_APPROX: f64 = 3.1415;

/// Gravitational acceleration in m/s².
pub const GRAVITY: f64 = 9.81;

/// Which maximum-height formula to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightFormula {
    /// `(v² · sin²θ) / 2 · g`, multiplying by `g`.
    ///
    /// Matches the reference program this harness reproduces.
    #[default]
    Literal,
    /// `(v² · sin²θ) / (2 · g)`, the textbook peak height.
    Corrected,
}

/// Maps an input projectile to its computed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeCalculator {
    /// Formula variant for [`Projectile::max_height`].
    pub height_formula: HeightFormula,
}

impl RangeCalculator {
    /// Creates a calculator using `height_formula`.
    pub const fn new(height_formula: HeightFormula) -> Self {
        Self { height_formula }
    }

    /// Computes range, flight time and peak height for `input`.
    ///
    /// The output carries the input's angle and velocity. Total over finite
    /// floats; `v = 0` yields all-zero outputs.
    ///
    /// # Example
    /// ```
    /// use projectile_range::physics::RangeCalculator;
    /// use projectile_range::projectile::Projectile;
    ///
    /// let out = RangeCalculator::default().compute(&Projectile::new(45.0, 100.0));
    /// assert!((out.flight_time - 14.4157).abs() < 1e-3);
    /// ```
    pub fn compute(&self, input: &Projectile) -> Projectile {
        let angle = input.angle;
        let velocity = input.velocity;

        let radians = f64::from(angle) * PI_APPROX / 180.0;
        let sin = radians.sin() as f32;
        let cos = radians.cos() as f32;

        let flight_time = (f64::from((2.0 * velocity * sin).abs()) / GRAVITY) as f32;
        let range = (velocity * flight_time * cos).abs();

        let lift = velocity * velocity * sin * sin;
        let max_height = match self.height_formula {
            HeightFormula::Literal => (f64::from(lift / 2.0) * GRAVITY) as f32,
            HeightFormula::Corrected => (f64::from(lift) / (2.0 * GRAVITY)) as f32,
        };

        Projectile {
            angle,
            velocity,
            range,
            flight_time,
            max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn compute_is_deterministic() {
        let calc = RangeCalculator::default();
        for (angle, velocity) in [(10.0, 10.0), (37.0, 250.0), (99.0, 409.0)] {
            let input = Projectile::new(angle, velocity);
            assert_eq!(calc.compute(&input), calc.compute(&input));
        }
    }

    #[test]
    fn forty_five_degrees_literal_height() {
        let out = RangeCalculator::default().compute(&Projectile::new(45.0, 100.0));
        assert_eq!(out.angle, 45.0);
        assert_eq!(out.velocity, 100.0);
        assert!(close(out.flight_time, 14.4157, 1e-3), "{}", out.flight_time);
        assert!(close(out.range, 1019.368, 0.01), "{}", out.range);
        assert!(close(out.max_height, 24523.86, 0.1), "{}", out.max_height);
    }

    #[test]
    fn forty_five_degrees_corrected_height() {
        let calc = RangeCalculator::new(HeightFormula::Corrected);
        let out = calc.compute(&Projectile::new(45.0, 100.0));
        assert!(close(out.max_height, 254.830, 0.01), "{}", out.max_height);
        // the formula only changes the height
        let literal = RangeCalculator::default().compute(&Projectile::new(45.0, 100.0));
        assert_eq!(out.range, literal.range);
        assert_eq!(out.flight_time, literal.flight_time);
    }

    #[test]
    fn zero_velocity_gives_zero_outputs() {
        for formula in [HeightFormula::Literal, HeightFormula::Corrected] {
            let out = RangeCalculator::new(formula).compute(&Projectile::new(60.0, 0.0));
            assert_eq!(out.range, 0.0);
            assert_eq!(out.flight_time, 0.0);
            assert_eq!(out.max_height, 0.0);
        }
    }

    #[test]
    fn flat_and_vertical_angles_are_finite() {
        let calc = RangeCalculator::default();

        let flat = calc.compute(&Projectile::new(0.0, 100.0));
        assert_eq!(flat.flight_time, 0.0);
        assert_eq!(flat.range, 0.0);
        assert_eq!(flat.max_height, 0.0);

        let vertical = calc.compute(&Projectile::new(90.0, 100.0));
        assert!(vertical.range.is_finite());
        assert!(vertical.range < 0.2, "{}", vertical.range);
        assert!(close(vertical.flight_time, 20.387, 1e-2));
        assert!(vertical.max_height.is_finite());
    }

    #[test]
    fn negative_inputs_produce_non_negative_range() {
        let out = RangeCalculator::default().compute(&Projectile::new(-30.0, -50.0));
        assert!(out.range >= 0.0);
        assert!(out.flight_time >= 0.0);
    }
}
