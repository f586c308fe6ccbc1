//! # emberglow
//!
//! A cloud of textured, glowing point sprites that rise and fade in a loop,
//! with a live panel for tuning shape, count, size, speed and color.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberglow::prelude::*;
//!
//! fn main() {
//!     let params = ParticleParams::new()
//!         .with_count(1000)
//!         .with_shape(BaseShape::Torus)
//!         .with_color([1.0, 0.6, 0.2]);
//!     emberglow::run(params).unwrap();
//! }
//! ```
//!
//! ## How it fits together
//!
//! - [`shape`] samples anchor positions for one of four [`BaseShape`]s.
//! - [`ParticleCloud`] pairs each anchor with a random birth time.
//! - The particle shader ([`shader`]) turns the global clock into a per-particle
//!   age that lifts, shrinks and fades each sprite. [`animation`] holds the
//!   same math on the CPU.
//! - [`Scene`] owns all of the above and routes each [`ParamEdit`] either to a
//!   cloud rebuild or to a uniform update.
//!
//! ## Parameter reactions
//!
//! | Parameter | Reaction |
//! |-----------|----------|
//! | count, shape, ovoid scale | rebuild the cloud |
//! | size, speed, color | update uniforms |
//! | sprite URL | load the image in the background, swap when done |
//! | fade speed | read by the clock each frame |

pub mod animation;
mod app;
pub mod cloud;
pub mod error;
mod gpu;
#[cfg(feature = "egui")]
pub mod panel;
pub mod params;
pub mod scene;
pub mod shader;
pub mod shape;
pub mod textures;
pub mod uniforms;

pub use animation::AnimationClock;
pub use app::{run, App};
pub use cloud::{ParticleCloud, ParticleSample};
pub use error::{AppError, GpuError, SpriteError};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::Camera;
pub use params::{ParamEdit, ParamKey, ParticleParams, Reaction};
pub use scene::Scene;
pub use shape::BaseShape;
pub use textures::{SpriteImage, SpriteLoader, SpriteSource};
pub use uniforms::{ParticleUniforms, UniformState};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use emberglow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::params::{ParamEdit, ParticleParams};
    pub use crate::scene::Scene;
    pub use crate::shape::BaseShape;
    pub use crate::textures::SpriteImage;
    pub use crate::{run, Vec2, Vec3, Vec4};
}
