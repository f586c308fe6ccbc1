//! Per-particle animation math.
//!
//! These functions are the CPU side of the particle shader in
//! [`crate::shader`]; both must compute the same values. Every function is
//! total: ages are wrapped into [0, 1) so no input can leave the cycle.

use glam::{Vec2, Vec3, Vec4};

/// Glow falls to zero at this distance from the sprite center (UV units).
pub const GLOW_RADIUS: f32 = 0.2;

/// Global animation clock.
///
/// Advances by the fade speed once per frame and never goes backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationClock {
    value: f64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at `value`.
    pub fn starting_at(value: f64) -> Self {
        Self { value }
    }

    /// Advance by one frame. Negative steps are ignored.
    pub fn advance(&mut self, fade_speed: f32) {
        self.value += f64::from(fade_speed.max(0.0));
    }

    /// Total accumulated clock value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clock value wrapped into [0, 1), as uploaded to the GPU.
    ///
    /// Ages only depend on the fractional part, so this keeps f32 precision
    /// bounded without changing any particle's phase.
    pub fn phase(&self) -> f32 {
        self.value.rem_euclid(1.0) as f32
    }
}

/// Position of a particle within its cycle, in [0, 1).
#[inline]
pub fn age(clock: f32, birth_time: f32) -> f32 {
    let a = (clock - birth_time).rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if a >= 1.0 {
        0.0
    } else {
        a
    }
}

/// Anchor position lifted along +Y by `age * speed`.
#[inline]
pub fn displaced_position(anchor: Vec3, age: f32, speed: f32) -> Vec3 {
    anchor + Vec3::Y * (age * speed)
}

/// Point diameter in pixels.
#[inline]
pub fn point_size(size: f32, age: f32) -> f32 {
    size * (1.0 - age)
}

#[inline]
pub fn opacity(age: f32) -> f32 {
    1.0 - age
}

/// WGSL/GLSL smoothstep.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Radial glow mask at point-local `uv`: 1 at the center, 0 from
/// [`GLOW_RADIUS`] outwards.
#[inline]
pub fn glow(uv: Vec2) -> f32 {
    1.0 - smoothstep(0.0, GLOW_RADIUS, (uv - Vec2::splat(0.5)).length())
}

/// Final fragment color before additive blending.
pub fn fragment_color(color: Vec3, opacity: f32, uv: Vec2, texel: Vec4) -> Vec4 {
    color.extend(opacity * glow(uv)) * texel
}

/// Everything the vertex stage produces for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    pub age: f32,
    pub position: Vec3,
    pub point_size: f32,
    pub opacity: f32,
}

impl ParticleFrame {
    pub fn evaluate(anchor: Vec3, birth_time: f32, clock: f32, size: f32, speed: f32) -> Self {
        let age = age(clock, birth_time);
        Self {
            age,
            position: displaced_position(anchor, age, speed),
            point_size: point_size(size, age),
            opacity: opacity(age),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_age_wraps_into_unit_interval() {
        for clock in [-3.7_f32, -1.0, 0.0, 0.25, 0.999, 1.0, 12.5, 1000.3] {
            for birth in [0.0_f32, 0.1, 0.5, 0.999] {
                let a = age(clock, birth);
                assert!((0.0..1.0).contains(&a), "age({clock}, {birth}) = {a}");
            }
        }
    }

    #[test]
    fn test_age_integer_periodic() {
        for clock in [0.0_f32, 0.3, 2.75] {
            for birth in [0.0_f32, 0.42, 0.9] {
                let base = age(clock, birth);
                for k in [-2.0_f32, 1.0, 3.0, 10.0] {
                    let shifted = age(clock + k, birth);
                    let diff = (base - shifted).abs();
                    // 0.0 and 0.99999 are the same phase
                    assert!(diff < EPS || (1.0 - diff) < EPS, "k={k}: {base} vs {shifted}");
                }
            }
        }
    }

    #[test]
    fn test_birth_equal_to_clock_gives_full_particle() {
        let frame = ParticleFrame::evaluate(Vec3::ZERO, 0.25, 3.25, 40.0, 2.0);
        assert_eq!(frame.age, 0.0);
        assert_eq!(frame.point_size, 40.0);
        assert_eq!(frame.opacity, 1.0);
        assert_eq!(frame.position, Vec3::ZERO);
    }

    #[test]
    fn test_rise_and_fade() {
        let frame = ParticleFrame::evaluate(Vec3::new(1.0, 0.0, -1.0), 0.0, 0.75, 40.0, 2.0);
        assert!((frame.age - 0.75).abs() < EPS);
        assert!((frame.position.y - 1.5).abs() < EPS);
        assert_eq!(frame.position.x, 1.0);
        assert!((frame.point_size - 10.0).abs() < EPS);
        assert!((frame.opacity - 0.25).abs() < EPS);
    }

    #[test]
    fn test_glow_profile() {
        assert_eq!(glow(Vec2::splat(0.5)), 1.0);
        assert_eq!(glow(Vec2::new(0.5, 0.75)), 0.0);
        assert_eq!(glow(Vec2::ZERO), 0.0);
        let mid = glow(Vec2::new(0.6, 0.5));
        assert!((mid - 0.5).abs() < EPS);
    }

    #[test]
    fn test_fragment_color_modulates_texture() {
        let out = fragment_color(
            Vec3::new(1.0, 0.5, 0.0),
            0.5,
            Vec2::splat(0.5),
            Vec4::new(1.0, 1.0, 1.0, 0.8),
        );
        assert!((out - Vec4::new(1.0, 0.5, 0.0, 0.4)).abs().max_element() < EPS);
    }

    #[test]
    fn test_clock_advance_and_phase() {
        let mut clock = AnimationClock::starting_at(4.5);
        clock.advance(0.25);
        assert!((clock.value() - 4.75).abs() < 1e-9);
        assert!((clock.phase() - 0.75).abs() < EPS);
        clock.advance(-1.0);
        assert!((clock.value() - 4.75).abs() < 1e-9);
    }

    #[test]
    fn test_phase_preserves_ages() {
        let clock = AnimationClock::starting_at(12_345.678);
        let birth = 0.3;
        let full = age((clock.value() - f64::from(birth)).rem_euclid(1.0) as f32, 0.0);
        let wrapped = age(clock.phase(), birth);
        assert!((full - wrapped).abs() < EPS);
    }
}
