//! WGSL source for the particle pipeline.
//!
//! Vertex inputs are one [`ParticleSample`](crate::cloud::ParticleSample) per
//! instance; group 0 holds [`ParticleUniforms`](crate::uniforms::ParticleUniforms),
//! group 1 the sprite texture and its sampler. The math matches
//! [`crate::animation`].

pub const PARTICLE_SHADER: &str = include_str!("particle.wgsl");

/// Vertices per particle quad.
pub const QUAD_VERTICES: u32 = 6;

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";
