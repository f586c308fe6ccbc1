//! Scene state and the parameter update paths.
//!
//! [`Scene`] owns the parameter set, the live particle cloud, the uniform
//! state and the active sprite. Every change goes through [`Scene::apply`],
//! which routes the edit by [`ParamKey::reaction`](crate::params::ParamKey::reaction):
//!
//! - structural edits rebuild the cloud,
//! - cosmetic edits update the uniforms only,
//! - sprite edits start a background load,
//! - fade speed is read by [`Scene::advance`] on the next frame.
//!
//! The scene knows nothing about the GPU. The renderer compares
//! [`ParticleCloud::generation`] and [`Scene::sprite_revision`] with what it
//! last uploaded.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::cloud::ParticleCloud;
use crate::params::{ParamEdit, ParticleParams, Reaction};
use crate::textures::{SpriteImage, SpriteLoader};
use crate::uniforms::UniformState;

pub struct Scene {
    params: ParticleParams,
    cloud: ParticleCloud,
    uniforms: UniformState,
    sprite: SpriteImage,
    sprite_revision: u64,
    loader: SpriteLoader,
    rng: SmallRng,
}

impl Scene {
    /// Create a scene seeded from OS entropy.
    pub fn new(params: ParticleParams) -> Self {
        Self::with_rng(params, SmallRng::from_entropy())
    }

    /// Create a scene with a fixed seed, for reproducible clouds.
    pub fn seeded(params: ParticleParams, seed: u64) -> Self {
        Self::with_rng(params, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(mut params: ParticleParams, mut rng: SmallRng) -> Self {
        params.set_count(params.count);
        let cloud = ParticleCloud::build(&params, 0, &mut rng);
        let uniforms = UniformState::from_params(&params);
        let mut loader = SpriteLoader::new();
        let sprite = SpriteImage::default_sprite();
        if !params.sprite_url.trim().is_empty() {
            loader.request(&params.sprite_url);
        }

        log::info!(
            "Built {} particle cloud with {} particles",
            params.shape,
            cloud.len()
        );

        Self {
            params,
            cloud,
            uniforms,
            sprite,
            sprite_revision: 0,
            loader,
            rng,
        }
    }

    pub fn params(&self) -> &ParticleParams {
        &self.params
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    /// Sprite currently bound to the particles.
    pub fn sprite(&self) -> &SpriteImage {
        &self.sprite
    }

    /// Bumped every time the active sprite is replaced.
    pub fn sprite_revision(&self) -> u64 {
        self.sprite_revision
    }

    /// Cap sprite loads at `max` pixels per edge. Larger images are rejected
    /// and the current sprite stays.
    pub fn set_max_sprite_dimension(&mut self, max: u32) {
        self.loader.set_max_dimension(max);
    }

    /// Sprite loads still in flight.
    pub fn pending_sprites(&self) -> usize {
        self.loader.pending()
    }

    /// Record `edit` and react to it.
    pub fn apply(&mut self, edit: ParamEdit) -> Reaction {
        self.params.set(&edit);
        let reaction = edit.reaction();
        match reaction {
            Reaction::Structural => self.rebuild(),
            Reaction::Cosmetic => {
                self.uniforms.push(&edit);
            }
            Reaction::Sprite => {
                if let Some(sprite) = self.loader.request(&self.params.sprite_url) {
                    self.set_sprite(sprite);
                }
            }
            Reaction::Clock => {}
        }
        reaction
    }

    /// Apply several edits in order.
    pub fn apply_all<I: IntoIterator<Item = ParamEdit>>(&mut self, edits: I) {
        for edit in edits {
            self.apply(edit);
        }
    }

    /// Replace the cloud using the current structural parameters.
    pub fn rebuild(&mut self) {
        let generation = self.cloud.generation() + 1;
        self.cloud = ParticleCloud::build(&self.params, generation, &mut self.rng);
        log::debug!(
            "Rebuilt cloud #{}: {} x {} (ovoid scale {:.2})",
            generation,
            self.params.shape,
            self.cloud.len(),
            self.params.ovoid_scale
        );
    }

    /// Swap the active sprite.
    pub fn set_sprite(&mut self, sprite: SpriteImage) {
        self.sprite = sprite;
        self.sprite_revision += 1;
    }

    /// Install any sprite that finished loading. Returns `true` if the
    /// sprite changed.
    pub fn poll_sprite(&mut self) -> bool {
        match self.loader.poll() {
            Some(sprite) => {
                self.set_sprite(sprite);
                true
            }
            None => false,
        }
    }

    /// Wait for in-flight sprite loads, installing the last success.
    pub fn settle_sprites(&mut self, timeout: std::time::Duration) -> bool {
        match self.loader.settle(timeout) {
            Some(sprite) => {
                self.set_sprite(sprite);
                true
            }
            None => false,
        }
    }

    /// Per-frame tick: advance the clock by the fade speed.
    pub fn advance(&mut self) {
        self.uniforms.clock.advance(self.params.fade_speed);
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ParticleParams::default())
    }
}
