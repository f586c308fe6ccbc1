//! Sprite images and asynchronous sprite loading.
//!
//! Particles sample a single sprite texture. The built-in sprite is generated
//! procedurally; a user-supplied image can replace it at runtime:
//!
//! ```ignore
//! let mut loader = SpriteLoader::new();
//! loader.request("file:///home/me/spark.png");
//!
//! // Every frame:
//! if let Some(sprite) = loader.poll() {
//!     scene.set_sprite(sprite);
//! }
//! ```
//!
//! Loads run on a background thread. Only successful loads are ever handed
//! back; a failed load is logged and the current sprite stays bound.
//!
//! # Supported Formats
//!
//! - PNG (recommended)
//! - JPEG

use std::panic::{self, UnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::error::SpriteError;

/// Edge length of the built-in sprite in pixels.
pub const DEFAULT_SPRITE_SIZE: u32 = 64;

/// Largest sprite edge accepted until the device reports its own limit.
/// Matches `wgpu::Limits::default().max_texture_dimension_2d`.
pub const DEFAULT_MAX_SPRITE_DIMENSION: u32 = 8192;

/// RGBA8 pixel data for the particle sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SpriteImage {
    /// Create a sprite from raw RGBA data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self { data, width, height }
    }

    /// Decode an encoded PNG or JPEG image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        Ok(image::load_from_memory(bytes)?.into_rgba8().into())
    }

    /// Read and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SpriteError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let sprite = Self::from_bytes(&bytes)?;
        if sprite.width == 0 || sprite.height == 0 {
            return Err(SpriteError::Empty(path.to_path_buf()));
        }
        Ok(sprite)
    }

    /// Whether both edges are at most `max` pixels.
    pub fn fits(&self, max: u32) -> bool {
        self.width <= max && self.height <= max
    }

    /// Reject the sprite if either edge exceeds `max`.
    pub fn within(self, max: u32) -> Result<Self, SpriteError> {
        if self.fits(max) {
            Ok(self)
        } else {
            Err(SpriteError::TooLarge {
                width: self.width,
                height: self.height,
                max,
            })
        }
    }

    /// The built-in sprite: a soft four-pointed star whose alpha feathers to
    /// zero at the edges.
    pub fn default_sprite() -> Self {
        let size = DEFAULT_SPRITE_SIZE;
        let half = (size as f32 - 1.0) * 0.5;
        let img = RgbaImage::from_fn(size, size, |x, y| {
            let dx = (x as f32 - half) / half;
            let dy = (y as f32 - half) / half;
            let d = (dx * dx + dy * dy).sqrt();

            let core = (1.0 - d).max(0.0).powi(2);
            // Thin rays along both axes, fading with distance
            let rays = ((1.0 - dx.abs() * 8.0).max(0.0) + (1.0 - dy.abs() * 8.0).max(0.0))
                * (1.0 - d).max(0.0)
                * 0.5;
            let alpha = (core + rays).clamp(0.0, 1.0);

            image::Rgba([255, 255, 255, (alpha * 255.0).round() as u8])
        });
        img.into()
    }
}

impl From<RgbaImage> for SpriteImage {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }
}

/// Where a sprite comes from, parsed from the panel's URL field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSource {
    /// Empty field: the built-in sprite.
    Default,
    /// A local file, given as a path or a `file://` URL.
    File(PathBuf),
    /// Any other `scheme://` location. Not loadable.
    Remote(String),
}

impl SpriteSource {
    pub fn parse(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            SpriteSource::Default
        } else if let Some(path) = url.strip_prefix("file://") {
            SpriteSource::File(PathBuf::from(path))
        } else if url.contains("://") {
            SpriteSource::Remote(url.to_string())
        } else {
            SpriteSource::File(PathBuf::from(url))
        }
    }
}

struct Completed {
    url: String,
    result: Result<SpriteImage, SpriteError>,
}

/// Background sprite loader.
///
/// There is no cancellation: if several loads are in flight, the last one to
/// complete successfully wins.
pub struct SpriteLoader {
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    pending: usize,
    max_dimension: u32,
}

impl SpriteLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            pending: 0,
            max_dimension: DEFAULT_MAX_SPRITE_DIMENSION,
        }
    }

    /// Set the largest accepted sprite edge, usually the device's
    /// `max_texture_dimension_2d`.
    pub fn with_max_dimension(mut self, max: u32) -> Self {
        self.set_max_dimension(max);
        self
    }

    pub fn set_max_dimension(&mut self, max: u32) {
        self.max_dimension = max.max(1);
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Start loading the sprite at `url`.
    ///
    /// The built-in sprite is returned immediately for an empty `url`. File
    /// loads complete later through [`SpriteLoader::poll`]. Anything else is
    /// logged and ignored.
    pub fn request(&mut self, url: &str) -> Option<SpriteImage> {
        match SpriteSource::parse(url) {
            SpriteSource::Default => Some(SpriteImage::default_sprite()),
            SpriteSource::Remote(location) => {
                log::warn!("{}", SpriteError::UnsupportedScheme(location));
                None
            }
            SpriteSource::File(path) => {
                let max = self.max_dimension;
                self.spawn_load(url, move || SpriteImage::from_file(&path)?.within(max));
                None
            }
        }
    }

    /// Run `load` on a loader thread. A result is always sent back, even if
    /// `load` panics, so `pending` stays accurate.
    fn spawn_load<F>(&mut self, url: &str, load: F)
    where
        F: FnOnce() -> Result<SpriteImage, SpriteError> + Send + UnwindSafe + 'static,
    {
        let tx = self.tx.clone();
        let url = url.to_string();
        let spawned = std::thread::Builder::new()
            .name("sprite-loader".into())
            .spawn(move || {
                let result = panic::catch_unwind(load).unwrap_or(Err(SpriteError::LoadPanicked));
                // Receiver may have been dropped
                let _ = tx.send(Completed { url, result });
            });
        match spawned {
            Ok(_) => self.pending += 1,
            Err(e) => log::warn!("Could not start sprite load: {}", e),
        }
    }

    /// Loads started but not yet collected by [`SpriteLoader::poll`].
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Collect finished loads without blocking.
    ///
    /// Returns the most recent successful sprite, if any finished since the
    /// last call.
    pub fn poll(&mut self) -> Option<SpriteImage> {
        let mut latest = None;
        while let Ok(done) = self.rx.try_recv() {
            if let Some(sprite) = self.complete(done) {
                latest = Some(sprite);
            }
        }
        latest
    }

    /// Block until every pending load has finished or `timeout` elapses.
    ///
    /// Same return value as [`SpriteLoader::poll`].
    pub fn settle(&mut self, timeout: Duration) -> Option<SpriteImage> {
        let deadline = Instant::now() + timeout;
        let mut latest = None;
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    if let Some(sprite) = self.complete(done) {
                        latest = Some(sprite);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        latest
    }

    fn complete(&mut self, done: Completed) -> Option<SpriteImage> {
        self.pending = self.pending.saturating_sub(1);
        match done.result {
            Ok(sprite) => {
                log::debug!("Loaded sprite '{}' ({}x{})", done.url, sprite.width, sprite.height);
                Some(sprite)
            }
            Err(e) => {
                log::warn!("Keeping current sprite, '{}' failed: {}", done.url, e);
                None
            }
        }
    }
}

impl Default for SpriteLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emberglow-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_default_sprite_shape() {
        let sprite = SpriteImage::default_sprite();
        assert_eq!(sprite.width, DEFAULT_SPRITE_SIZE);
        assert_eq!(sprite.height, DEFAULT_SPRITE_SIZE);
        assert_eq!(sprite.data.len(), (DEFAULT_SPRITE_SIZE * DEFAULT_SPRITE_SIZE * 4) as usize);
    }

    #[test]
    fn test_default_sprite_feathered() {
        let sprite = SpriteImage::default_sprite();
        let alpha = |x: u32, y: u32| sprite.data[((y * sprite.width + x) * 4 + 3) as usize];
        let c = DEFAULT_SPRITE_SIZE / 2;
        assert!(alpha(c, c) > 200);
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(DEFAULT_SPRITE_SIZE - 1, DEFAULT_SPRITE_SIZE - 1), 0);
    }

    #[test]
    #[should_panic(expected = "RGBA data size mismatch")]
    fn test_from_rgba_checks_size() {
        SpriteImage::from_rgba(vec![0; 7], 2, 1);
    }

    #[test]
    fn test_parse_source() {
        assert_eq!(SpriteSource::parse(""), SpriteSource::Default);
        assert_eq!(SpriteSource::parse("   "), SpriteSource::Default);
        assert_eq!(
            SpriteSource::parse("file:///tmp/star.png"),
            SpriteSource::File(PathBuf::from("/tmp/star.png"))
        );
        assert_eq!(
            SpriteSource::parse("assets/star.png"),
            SpriteSource::File(PathBuf::from("assets/star.png"))
        );
        assert_eq!(
            SpriteSource::parse("https://example.com/star.png"),
            SpriteSource::Remote("https://example.com/star.png".into())
        );
    }

    #[test]
    fn test_empty_url_resolves_immediately() {
        let mut loader = SpriteLoader::new();
        assert_eq!(loader.request(""), Some(SpriteImage::default_sprite()));
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_remote_url_is_ignored() {
        let mut loader = SpriteLoader::new();
        assert_eq!(loader.request("https://example.com/star.png"), None);
        assert_eq!(loader.pending(), 0);
        assert_eq!(loader.poll(), None);
    }

    #[test]
    fn test_missing_file_yields_nothing() {
        let mut loader = SpriteLoader::new();
        assert_eq!(loader.request("/definitely/not/here/sprite.png"), None);
        assert_eq!(loader.pending(), 1);
        assert_eq!(loader.settle(Duration::from_secs(5)), None);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let path = temp_path("wide.png");
        let width = DEFAULT_MAX_SPRITE_DIMENSION + 808;
        RgbaImage::from_pixel(width, 1, image::Rgba([255, 255, 255, 255]))
            .save(&path)
            .unwrap();

        let mut loader = SpriteLoader::new();
        assert_eq!(loader.max_dimension(), wgpu::Limits::default().max_texture_dimension_2d);
        assert_eq!(loader.request(path.to_str().unwrap()), None);
        assert_eq!(loader.settle(Duration::from_secs(10)), None);
        assert_eq!(loader.pending(), 0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_max_dimension_is_configurable() {
        let path = temp_path("small.png");
        RgbaImage::from_pixel(16, 8, image::Rgba([0, 0, 0, 255])).save(&path).unwrap();

        let mut loader = SpriteLoader::new().with_max_dimension(8);
        loader.request(path.to_str().unwrap());
        assert_eq!(loader.settle(Duration::from_secs(5)), None);

        loader.set_max_dimension(16);
        loader.request(path.to_str().unwrap());
        let sprite = loader.settle(Duration::from_secs(5)).expect("sprite within limit");
        assert_eq!((sprite.width, sprite.height), (16, 8));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_within_reports_dimensions() {
        let sprite = SpriteImage::from_rgba(vec![0; 3 * 2 * 4], 3, 2);
        assert!(sprite.fits(3));
        match sprite.within(2) {
            Err(SpriteError::TooLarge { width, height, max }) => {
                assert_eq!((width, height, max), (3, 2, 2));
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_panicking_load_still_completes() {
        let mut loader = SpriteLoader::new();
        loader.spawn_load("broken.png", || panic!("decoder blew up"));
        assert_eq!(loader.pending(), 1);
        assert_eq!(loader.settle(Duration::from_secs(5)), None);
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_file_load_roundtrip() {
        let path = temp_path("sprite.png");
        let img = RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 40]));
        img.save(&path).unwrap();

        let mut loader = SpriteLoader::new();
        assert_eq!(loader.request(path.to_str().unwrap()), None);
        let sprite = loader.settle(Duration::from_secs(5)).expect("sprite should load");
        assert_eq!((sprite.width, sprite.height), (4, 2));
        assert_eq!(&sprite.data[..4], &[10, 20, 30, 40]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(SpriteImage::from_file(&path), Err(SpriteError::ImageLoad(_))));
        std::fs::remove_file(&path).ok();
    }
}
