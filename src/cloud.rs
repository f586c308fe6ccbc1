//! Particle cloud construction.
//!
//! A [`ParticleCloud`] is the CPU copy of the particle vertex buffer: one
//! [`ParticleSample`] per particle, laid out exactly as the render pipeline
//! reads it.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::params::ParticleParams;
use crate::shape::BaseShape;

/// Per-particle vertex data.
///
/// 16 bytes: position at location 0, birth time at location 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ParticleSample {
    /// Anchor position, fixed for the lifetime of the cloud.
    pub position: [f32; 3],
    /// Phase offset in [0, 1).
    pub birth_time: f32,
}

impl ParticleSample {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// The live set of particle samples and what they were built from.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    samples: Vec<ParticleSample>,
    shape: BaseShape,
    ovoid_scale: f32,
    generation: u64,
}

impl ParticleCloud {
    /// Build a cloud from the structural fields of `params`.
    ///
    /// Positions come from the shape sampler, one call per index; birth
    /// times are drawn independently from U(0, 1).
    pub fn build<R: Rng + ?Sized>(params: &ParticleParams, generation: u64, rng: &mut R) -> Self {
        let count = params.count;
        let samples = (0..count)
            .map(|i| {
                let position = params.shape.sample(i, count, params.ovoid_scale, rng);
                ParticleSample {
                    position: position.to_array(),
                    birth_time: rng.gen::<f32>(),
                }
            })
            .collect();

        Self {
            samples,
            shape: params.shape,
            ovoid_scale: params.ovoid_scale,
            generation,
        }
    }

    pub fn samples(&self) -> &[ParticleSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of instances to draw.
    pub fn count(&self) -> u32 {
        self.samples.len() as u32
    }

    pub fn shape(&self) -> BaseShape {
        self.shape
    }

    pub fn ovoid_scale(&self) -> f32 {
        self.ovoid_scale
    }

    /// Build number. Strictly increases with every rebuild of a scene.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Raw bytes for the vertex buffer.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }
}
