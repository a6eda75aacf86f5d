// Core types shared by the renderer, the surfaces and the export helpers.

/// Logical canvas width every scene is composed against.
pub const CANVAS_WIDTH: u32 = 960;
/// Logical canvas height every scene is composed against.
pub const CANVAS_HEIGHT: u32 = 600;

/// Exclusive upper bound for seeds handed out by a [`SeedSource`](crate::utils::rng::SeedSource).
pub const MAX_SEED: u32 = 10_000_000;

/// A seed fully determines one scene.
pub type Seed = u32;

/// A finished frame, snapshotted from a surface after rendering.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Raw pixel buffer in row-major RGB or RGBA format.
    Pixels {
        width: u32,
        height: u32,
        /// Pixel data. Convention: RGB uses 3 bytes per pixel, RGBA uses 4.
        data: Vec<u8>,
    },
}

impl RenderFrame {
    pub fn width(&self) -> u32 {
        match self { RenderFrame::Pixels { width, .. } => *width }
    }

    pub fn height(&self) -> u32 {
        match self { RenderFrame::Pixels { height, .. } => *height }
    }

    pub fn data(&self) -> &[u8] {
        match self { RenderFrame::Pixels { data, .. } => data }
    }
}

/// Recoverable errors across the crate. Rendering itself cannot fail; these come
/// from building surfaces and exporting frames.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("Invalid surface dimensions: {0}")]
    InvalidDimensions(String),
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("Other error: {0}")]
    Other(String),
}

/// Convenience alias for results using SceneError.
pub type Result<T> = std::result::Result<T, SceneError>;
