//! Error types for emberglow.
//!
//! GPU initialization, sprite loading and the application run loop each get
//! their own error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("Surface has no supported texture formats")]
    NoSurfaceFormat,
}

/// Errors that can occur while loading a sprite image.
#[derive(Debug, Error)]
pub enum SpriteError {
    /// Failed to decode the image.
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// Failed to read the file from disk.
    #[error("Failed to read sprite file: {0}")]
    Io(#[from] std::io::Error),
    /// The location uses a scheme other than `file://`.
    #[error("Unsupported sprite location '{0}': only local files can be loaded")]
    UnsupportedScheme(String),
    /// The file decoded to an image with no pixels.
    #[error("Sprite '{}' is empty", .0.display())]
    Empty(PathBuf),
    /// The image is larger than the GPU can hold in one texture.
    #[error("Sprite is {width}x{height}, larger than the {max}px texture limit")]
    TooLarge { width: u32, height: u32, max: u32 },
    /// The loader thread panicked before producing a result.
    #[error("Sprite loader panicked")]
    LoadPanicked,
}

/// Errors that can occur when running the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to create or run the event loop.
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
