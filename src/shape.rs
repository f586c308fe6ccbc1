//! Base shapes the particle cloud is sampled from.
//!
//! Each [`BaseShape`] variant owns one sampling function. Sampling is a pure
//! function of the particle index, the total count, the ovoid scale and the
//! random source passed in.
//!
//! ```ignore
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
//! let points = sample_positions(BaseShape::Torus, 1000, 2.0, &mut rng);
//! assert_eq!(points.len(), 1000);
//! ```

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use rand::Rng;

/// Torus ring radius.
pub const TORUS_MAJOR_RADIUS: f32 = 1.0;
/// Torus tube radius.
pub const TORUS_MINOR_RADIUS: f32 = 0.3;

/// Shape the particle anchors are distributed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseShape {
    /// Egg-shaped shell, stretched downward by the ovoid scale (default).
    #[default]
    Ovoid,
    /// Deterministic spiral over the unit sphere.
    Sphere,
    /// Uniform fill of the cube from -1 to 1.
    Cube,
    /// Uniform angles over a torus lying in the XY plane.
    Torus,
}

impl BaseShape {
    /// All shapes, in panel order.
    pub const ALL: [BaseShape; 4] = [
        BaseShape::Ovoid,
        BaseShape::Sphere,
        BaseShape::Cube,
        BaseShape::Torus,
    ];

    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            BaseShape::Ovoid => "ovoid",
            BaseShape::Sphere => "sphere",
            BaseShape::Cube => "cube",
            BaseShape::Torus => "torus",
        }
    }

    /// Look up a shape by name, falling back to [`BaseShape::Ovoid`] for
    /// anything unrecognized.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sphere" => BaseShape::Sphere,
            "cube" => BaseShape::Cube,
            "torus" => BaseShape::Torus,
            _ => BaseShape::Ovoid,
        }
    }

    /// Position of particle `index` out of `count`.
    ///
    /// `ovoid_scale` only affects [`BaseShape::Ovoid`]. [`BaseShape::Sphere`]
    /// never touches `rng`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        index: u32,
        count: u32,
        ovoid_scale: f32,
        rng: &mut R,
    ) -> Vec3 {
        match self {
            BaseShape::Ovoid => sample_ovoid(ovoid_scale, rng),
            BaseShape::Sphere => sample_sphere(index, count),
            BaseShape::Cube => sample_cube(rng),
            BaseShape::Torus => sample_torus(rng),
        }
    }
}

impl fmt::Display for BaseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BaseShape {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BaseShape::from_name(s))
    }
}

/// Sample `count` positions for `shape`.
pub fn sample_positions<R: Rng + ?Sized>(
    shape: BaseShape,
    count: u32,
    ovoid_scale: f32,
    rng: &mut R,
) -> Vec<Vec3> {
    (0..count)
        .map(|i| shape.sample(i, count, ovoid_scale, rng))
        .collect()
}

/// Random point in a spherical shell of radius 0.5..1, with Y shifted down by
/// half a unit and stretched by `scale`.
///
/// The shift and stretch are applied after the shell is sampled, so density
/// is higher towards the top. That bias is the intended look.
fn sample_ovoid<R: Rng + ?Sized>(scale: f32, rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
    let r = 0.5 + rng.gen::<f32>() * 0.5;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        (r * phi.cos() - 0.5) * scale,
        r * phi.sin() * theta.sin(),
    )
}

fn sample_sphere(index: u32, count: u32) -> Vec3 {
    let n = count as f32;
    // Clamp guards the last index against acos(1 + eps)
    let phi = (-1.0 + (2.0 * index as f32) / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;

    Vec3::new(
        theta.cos() * phi.sin(),
        theta.sin() * phi.sin(),
        phi.cos(),
    )
}

fn sample_cube<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        (rng.gen::<f32>() - 0.5) * 2.0,
        (rng.gen::<f32>() - 0.5) * 2.0,
        (rng.gen::<f32>() - 0.5) * 2.0,
    )
}

fn sample_torus<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let u = rng.gen::<f32>() * TAU;
    let v = rng.gen::<f32>() * TAU;
    let ring = TORUS_MAJOR_RADIUS + TORUS_MINOR_RADIUS * v.cos();

    Vec3::new(ring * u.cos(), ring * u.sin(), TORUS_MINOR_RADIUS * v.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0xE3B)
    }

    #[test]
    fn test_every_shape_returns_count_finite_points() {
        let mut rng = rng();
        for shape in BaseShape::ALL {
            for count in [0, 1, 2, 7, 500] {
                let points = sample_positions(shape, count, 2.0, &mut rng);
                assert_eq!(points.len(), count as usize, "{shape} with {count}");
                assert!(points.iter().all(|p| p.is_finite()), "{shape} produced non-finite point");
            }
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = rng();
        assert!(sample_positions(BaseShape::Sphere, 0, 1.0, &mut rng).is_empty());
    }

    #[test]
    fn test_sphere_is_deterministic() {
        let a = sample_positions(BaseShape::Sphere, 300, 1.0, &mut SmallRng::seed_from_u64(1));
        let b = sample_positions(BaseShape::Sphere, 300, 1.0, &mut SmallRng::seed_from_u64(2));
        let a_bits: Vec<[u32; 3]> = a.iter().map(|p| p.to_array().map(f32::to_bits)).collect();
        let b_bits: Vec<[u32; 3]> = b.iter().map(|p| p.to_array().map(f32::to_bits)).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_sphere_points_on_unit_sphere() {
        let mut rng = rng();
        for p in sample_positions(BaseShape::Sphere, 400, 1.0, &mut rng) {
            assert!((p.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_spans_both_poles() {
        let points = sample_positions(BaseShape::Sphere, 100, 1.0, &mut rng());
        // First index sits at phi = pi, i.e. z = -1
        assert!((points[0].z + 1.0).abs() < 1e-5);
        assert!(points.last().unwrap().z > 0.9);
    }

    #[test]
    fn test_cube_bounds() {
        let mut rng = rng();
        for p in sample_positions(BaseShape::Cube, 2000, 1.0, &mut rng) {
            for c in p.to_array() {
                assert!((-1.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_torus_within_tube() {
        let mut rng = rng();
        for p in sample_positions(BaseShape::Torus, 2000, 1.0, &mut rng) {
            let ring_dist = (p.x * p.x + p.y * p.y).sqrt() - TORUS_MAJOR_RADIUS;
            let tube_dist = (ring_dist * ring_dist + p.z * p.z).sqrt();
            assert!(tube_dist <= TORUS_MINOR_RADIUS + 1e-5);
        }
    }

    #[test]
    fn test_ovoid_unscaled_radius() {
        let mut rng = rng();
        let scale = 3.0;
        for p in sample_positions(BaseShape::Ovoid, 2000, scale, &mut rng) {
            let y = p.y / scale + 0.5;
            let r = Vec3::new(p.x, y, p.z).length();
            assert!((0.5 - 1e-4..=1.0 + 1e-4).contains(&r), "radius {r}");
        }
    }

    #[test]
    fn test_from_name_falls_back_to_ovoid() {
        assert_eq!(BaseShape::from_name("torus"), BaseShape::Torus);
        assert_eq!(BaseShape::from_name(" Cube "), BaseShape::Cube);
        assert_eq!(BaseShape::from_name("pyramid"), BaseShape::Ovoid);
        assert_eq!(BaseShape::from_name(""), BaseShape::Ovoid);
        assert_eq!("sphere".parse::<BaseShape>().unwrap(), BaseShape::Sphere);
    }

    #[test]
    fn test_names_roundtrip() {
        for shape in BaseShape::ALL {
            assert_eq!(BaseShape::from_name(shape.name()), shape);
        }
    }
}
