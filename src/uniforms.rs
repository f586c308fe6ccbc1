//! Shader uniform state.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::animation::AnimationClock;
use crate::params::{ParamEdit, ParticleParams};

/// Uniform block shared by every particle, mirrored by `Uniforms` in the
/// WGSL source. 112 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// RGB in xyz, w unused.
    pub color: [f32; 4],
    /// Surface size in pixels.
    pub viewport: [f32; 2],
    pub time: f32,
    pub particle_size: f32,
    pub particle_speed: f32,
    pub _padding: [f32; 3],
}

/// Values the shader reads, kept in sync with the cosmetic parameters.
///
/// Structural parameters never reach this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformState {
    pub clock: AnimationClock,
    pub size: f32,
    pub speed: f32,
    pub color: [f32; 3],
}

impl UniformState {
    pub fn from_params(params: &ParticleParams) -> Self {
        Self {
            clock: AnimationClock::new(),
            size: params.size,
            speed: params.speed,
            color: params.color,
        }
    }

    /// Push a cosmetic edit. Returns `false` for edits this state does not
    /// mirror.
    pub fn push(&mut self, edit: &ParamEdit) -> bool {
        match edit {
            ParamEdit::Size(v) => self.size = *v,
            ParamEdit::Speed(v) => self.speed = *v,
            ParamEdit::Color(v) => self.color = *v,
            _ => return false,
        }
        true
    }

    pub fn color(&self) -> Vec3 {
        Vec3::from_array(self.color)
    }

    /// Pack for upload.
    pub fn to_gpu(&self, view_proj: Mat4, viewport: [f32; 2]) -> ParticleUniforms {
        let [r, g, b] = self.color;
        ParticleUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            color: [r, g, b, 1.0],
            viewport,
            time: self.clock.phase(),
            particle_size: self.size,
            particle_speed: self.speed,
            _padding: [0.0; 3],
        }
    }
}
