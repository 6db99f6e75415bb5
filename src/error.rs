//! Error types for the renderer and snapshot paths.
//!
//! The core noise/shading code has no recoverable error surface (invalid
//! parameters are programming errors and fail fast); these types cover the
//! parts that talk to the GPU, the window system, and the filesystem.

use std::fmt;

/// Errors from GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create the GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(
                f,
                "no compatible GPU adapter found; a Vulkan/Metal/DX12 capable GPU is required"
            ),
            GpuError::DeviceCreation(e) => write!(f, "failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors from writing an offline snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// Failed to encode or write the image.
    Image(image::ImageError),
    /// Failed to write the file.
    Io(std::io::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Image(e) => write!(f, "failed to encode snapshot: {}", e),
            SnapshotError::Io(e) => write!(f, "failed to write snapshot: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Image(e) => Some(e),
            SnapshotError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for SnapshotError {
    fn from(e: image::ImageError) -> Self {
        SnapshotError::Image(e)
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Errors from running the windowed demo.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Snapshot rendering failed.
    Snapshot(SnapshotError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "failed to create event loop: {}", e),
            RunError::Window(e) => write!(f, "failed to create window: {}", e),
            RunError::Gpu(e) => write!(f, "GPU error: {}", e),
            RunError::Snapshot(e) => write!(f, "snapshot error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Gpu(e) => Some(e),
            RunError::Snapshot(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<GpuError> for RunError {
    fn from(e: GpuError) -> Self {
        RunError::Gpu(e)
    }
}

impl From<SnapshotError> for RunError {
    fn from(e: SnapshotError) -> Self {
        RunError::Snapshot(e)
    }
}
