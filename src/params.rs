//! Tunable parameters and the edit dispatch table.
//!
//! [`ParticleParams`] is the full set of values the panel exposes. Edits
//! arrive as [`ParamEdit`]s, and [`ParamKey::reaction`] decides what each one
//! invalidates.

use std::ops::RangeInclusive;

use crate::shape::BaseShape;

/// Parameter set for the particle cloud.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParams {
    /// Number of particles in the cloud. Always at least 1.
    pub count: u32,
    /// Point sprite diameter in pixels at age 0.
    pub size: f32,
    /// Vertical distance travelled over one animation cycle.
    pub speed: f32,
    /// Vertical stretch applied to the ovoid shape.
    pub ovoid_scale: f32,
    /// Clock increment per frame.
    pub fade_speed: f32,
    /// Shape the particle anchors are sampled from.
    pub shape: BaseShape,
    /// Linear RGB color, 0.0-1.0.
    pub color: [f32; 3],
    /// Sprite image location. Empty means the built-in sprite.
    pub sprite_url: String,
}

impl ParticleParams {
    pub const COUNT_RANGE: RangeInclusive<u32> = 100..=2000;
    pub const COUNT_STEP: u32 = 100;
    pub const SIZE_RANGE: RangeInclusive<f32> = 10.0..=500.0;
    pub const SPEED_RANGE: RangeInclusive<f32> = 0.5..=5.0;
    pub const OVOID_SCALE_RANGE: RangeInclusive<f32> = 1.0..=5.0;
    pub const FADE_SPEED_RANGE: RangeInclusive<f32> = 0.001..=0.1;
    pub const FADE_SPEED_STEP: f64 = 0.001;

    /// Create parameters with default values.
    pub fn new() -> Self {
        Self {
            count: 500,
            size: 40.0,
            speed: 2.0,
            ovoid_scale: 2.0,
            fade_speed: 0.01,
            shape: BaseShape::Ovoid,
            color: [1.0, 1.0, 1.0],
            sprite_url: String::new(),
        }
    }

    /// Set the particle count. Zero is coerced to one.
    pub fn with_count(mut self, count: u32) -> Self {
        self.set_count(count);
        self
    }

    /// Set the point size in pixels.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Set the rise distance per cycle.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the ovoid vertical stretch.
    pub fn with_ovoid_scale(mut self, scale: f32) -> Self {
        self.ovoid_scale = scale;
        self
    }

    /// Set the per-frame clock increment.
    pub fn with_fade_speed(mut self, fade_speed: f32) -> Self {
        self.fade_speed = fade_speed;
        self
    }

    /// Set the base shape.
    pub fn with_shape(mut self, shape: BaseShape) -> Self {
        self.shape = shape;
        self
    }

    /// Set the particle color (RGB, 0.0-1.0).
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    /// Set the sprite image location.
    pub fn with_sprite_url(mut self, url: impl Into<String>) -> Self {
        self.sprite_url = url.into();
        self
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count.max(1);
    }

    /// Store the value carried by `edit`.
    pub fn set(&mut self, edit: &ParamEdit) {
        match edit {
            ParamEdit::Count(v) => self.set_count(*v),
            ParamEdit::Size(v) => self.size = *v,
            ParamEdit::Speed(v) => self.speed = *v,
            ParamEdit::OvoidScale(v) => self.ovoid_scale = *v,
            ParamEdit::FadeSpeed(v) => self.fade_speed = *v,
            ParamEdit::Shape(v) => self.shape = *v,
            ParamEdit::Color(v) => self.color = *v,
            ParamEdit::SpriteUrl(v) => self.sprite_url.clone_from(v),
        }
    }
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Name of a single field of [`ParticleParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Count,
    Size,
    Speed,
    OvoidScale,
    FadeSpeed,
    Shape,
    Color,
    SpriteUrl,
}

/// What a parameter change invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Particle positions or count changed; the cloud must be rebuilt.
    Structural,
    /// Only shader uniforms change; the cloud is kept.
    Cosmetic,
    /// A new sprite image must be loaded.
    Sprite,
    /// Read by the clock on the next frame; nothing to push.
    Clock,
}

impl ParamKey {
    pub const ALL: [ParamKey; 8] = [
        ParamKey::Count,
        ParamKey::Size,
        ParamKey::Speed,
        ParamKey::OvoidScale,
        ParamKey::FadeSpeed,
        ParamKey::Shape,
        ParamKey::Color,
        ParamKey::SpriteUrl,
    ];

    /// Dispatch table from field to reaction.
    pub fn reaction(&self) -> Reaction {
        match self {
            ParamKey::Count | ParamKey::Shape | ParamKey::OvoidScale => Reaction::Structural,
            ParamKey::Size | ParamKey::Speed | ParamKey::Color => Reaction::Cosmetic,
            ParamKey::SpriteUrl => Reaction::Sprite,
            ParamKey::FadeSpeed => Reaction::Clock,
        }
    }

    /// Field name as shown in the panel.
    pub fn name(&self) -> &'static str {
        match self {
            ParamKey::Count => "Particle count",
            ParamKey::Size => "Particle size",
            ParamKey::Speed => "Particle speed",
            ParamKey::OvoidScale => "Ovoid scale",
            ParamKey::FadeSpeed => "Fade speed",
            ParamKey::Shape => "Base shape",
            ParamKey::Color => "Particle color",
            ParamKey::SpriteUrl => "Sprite URL",
        }
    }
}

/// One edit to one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamEdit {
    Count(u32),
    Size(f32),
    Speed(f32),
    OvoidScale(f32),
    FadeSpeed(f32),
    Shape(BaseShape),
    Color([f32; 3]),
    SpriteUrl(String),
}

impl ParamEdit {
    pub fn key(&self) -> ParamKey {
        match self {
            ParamEdit::Count(_) => ParamKey::Count,
            ParamEdit::Size(_) => ParamKey::Size,
            ParamEdit::Speed(_) => ParamKey::Speed,
            ParamEdit::OvoidScale(_) => ParamKey::OvoidScale,
            ParamEdit::FadeSpeed(_) => ParamKey::FadeSpeed,
            ParamEdit::Shape(_) => ParamKey::Shape,
            ParamEdit::Color(_) => ParamKey::Color,
            ParamEdit::SpriteUrl(_) => ParamKey::SpriteUrl,
        }
    }

    pub fn reaction(&self) -> Reaction {
        self.key().reaction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ParticleParams::default();
        assert_eq!(p.count, 500);
        assert_eq!(p.size, 40.0);
        assert_eq!(p.speed, 2.0);
        assert_eq!(p.ovoid_scale, 2.0);
        assert_eq!(p.fade_speed, 0.01);
        assert_eq!(p.shape, BaseShape::Ovoid);
        assert_eq!(p.color, [1.0, 1.0, 1.0]);
        assert!(p.sprite_url.is_empty());
    }

    #[test]
    fn test_count_coerced_positive() {
        assert_eq!(ParticleParams::new().with_count(0).count, 1);
        let mut p = ParticleParams::new();
        p.set(&ParamEdit::Count(0));
        assert_eq!(p.count, 1);
    }

    #[test]
    fn test_dispatch_table() {
        let structural: Vec<_> = ParamKey::ALL
            .iter()
            .filter(|k| k.reaction() == Reaction::Structural)
            .collect();
        assert_eq!(structural, [&ParamKey::Count, &ParamKey::OvoidScale, &ParamKey::Shape]);

        assert_eq!(ParamKey::Size.reaction(), Reaction::Cosmetic);
        assert_eq!(ParamKey::Speed.reaction(), Reaction::Cosmetic);
        assert_eq!(ParamKey::Color.reaction(), Reaction::Cosmetic);
        assert_eq!(ParamKey::SpriteUrl.reaction(), Reaction::Sprite);
        assert_eq!(ParamKey::FadeSpeed.reaction(), Reaction::Clock);
    }

    #[test]
    fn test_set_stores_each_field() {
        let mut p = ParticleParams::new();
        p.set(&ParamEdit::Size(120.0));
        p.set(&ParamEdit::Shape(BaseShape::Torus));
        p.set(&ParamEdit::Color([0.2, 0.4, 0.6]));
        p.set(&ParamEdit::SpriteUrl("spark.png".into()));
        assert_eq!(p.size, 120.0);
        assert_eq!(p.shape, BaseShape::Torus);
        assert_eq!(p.color, [0.2, 0.4, 0.6]);
        assert_eq!(p.sprite_url, "spark.png");
    }

    #[test]
    fn test_edit_key_matches_variant() {
        assert_eq!(ParamEdit::FadeSpeed(0.02).key(), ParamKey::FadeSpeed);
        assert_eq!(ParamEdit::OvoidScale(3.0).reaction(), Reaction::Structural);
    }
}
