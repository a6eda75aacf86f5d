pub mod core;
pub mod interop;
pub mod scene;
pub mod surface;
pub mod utils;

pub use crate::core::{CANVAS_HEIGHT, CANVAS_WIDTH, MAX_SEED, RenderFrame, Result, SceneError, Seed};
pub use crate::scene::{RenderOptions, SceneGeometry, render, render_frame};
pub use crate::surface::{Command, DrawingSurface, LineCap, Paint, RasterSurface, RecordingSurface, StateGuard};
pub use crate::utils::{FixedSeeds, RandomSeeds, SceneRng, SeedSource, encode_png, export_filename, save_png};
