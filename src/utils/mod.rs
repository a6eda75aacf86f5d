pub mod rng;
pub mod render;
pub mod render2d;

pub use rng::{FixedSeeds, RandomSeeds, RngStream, SceneRng, SeedSource, mulberry32, reflection_seed, rng_from_seed};
pub use render::{encode_png, export_filename, save_png};
pub use render2d::{Color, Point, Transform, BLACK, TRANSPARENT, WHITE};
