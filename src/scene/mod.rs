//! The sailboat seascape.
//!
//! One call to [`render`] clears the surface and issues every primitive of the
//! illustration back to front. All randomness comes from two [`SceneRng`] streams
//! derived from the seed, drawn in a fixed order, so a seed always yields the same
//! primitives.

pub mod backdrop;
pub mod boat;
pub mod details;
pub mod reflection;

use log::{debug, trace};

use crate::core::{RenderFrame, Result, Seed};
use crate::surface::{DrawingSurface, RasterSurface};
use crate::utils::rng::SceneRng;

/// Boat and horizon measurements derived from the canvas size. Computed once per
/// render and shared read-only by the main pass and the reflection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneGeometry {
    pub width: f64,
    pub height: f64,
    /// Horizon: top edge of the water.
    pub water_start: f64,
    pub hull_x: f64,
    pub hull_y: f64,
    pub hull_width: f64,
    pub hull_height: f64,
    pub mast_x: f64,
    pub mast_y: f64,
    pub mast_height: f64,
    pub sail_width: f64,
    pub sail_top: f64,
    pub sail_bottom: f64,
}

impl SceneGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        let water_start = height * 0.45;
        let hull_width = width * 0.32;
        let hull_height = height * 0.12;
        let hull_x = width * 0.28;
        let hull_y = water_start + hull_height * 0.12;
        let mast_height = height * 0.42;
        let mast_x = hull_x + hull_width * 0.5;
        let mast_y = hull_y - mast_height;
        Self {
            width,
            height,
            water_start,
            hull_x,
            hull_y,
            hull_width,
            hull_height,
            mast_x,
            mast_y,
            mast_height,
            sail_width: hull_width * 0.85,
            sail_top: mast_y + mast_height * 0.05,
            sail_bottom: hull_y - hull_height * 0.2,
        }
    }

    /// Height of the water band below the horizon.
    pub fn water_depth(&self) -> f64 { self.height - self.water_start }
}

/// Knobs for [`render_frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    /// Device pixels per logical unit.
    pub pixel_ratio: f64,
}

impl Default for RenderOptions {
    fn default() -> Self { Self { pixel_ratio: 1.0 } }
}

/// Paint the full scene for `seed` onto `surface`.
pub fn render<S: DrawingSurface + ?Sized>(surface: &mut S, seed: Seed) {
    let (width, height) = surface.size();
    debug!("rendering seed {} on {}x{} surface", seed, width, height);
    surface.clear();

    let mut rng = SceneRng::new(seed);
    let geometry = SceneGeometry::new(width, height);

    backdrop::draw_sky(surface, &geometry);
    backdrop::draw_sun(surface, &mut rng, &geometry);
    backdrop::draw_water(surface, &geometry);
    backdrop::draw_waves(surface, &mut rng, &geometry);
    trace!("backdrop done");

    boat::draw(surface, &geometry);
    reflection::draw(surface, seed, &geometry);
    trace!("boat and reflection done");

    details::draw_birds(surface, &mut rng, &geometry);
    details::draw_sparkles(surface, &mut rng, &geometry);
    debug!("seed {} rendered, main stream ended at state {:#010x}", seed, rng.state());
}

/// Render `seed` on a fresh standard-size raster surface and return the pixels.
pub fn render_frame(seed: Seed, options: &RenderOptions) -> Result<RenderFrame> {
    let mut surface = RasterSurface::new(options.pixel_ratio)?;
    render(&mut surface, seed);
    Ok(surface.into_render_frame())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{Command, DrawCall, DrawKind};
    use crate::surface::{Paint, RecordingSurface};
    use crate::utils::render2d::{Color, HULL, Point, Transform};

    fn record(seed: Seed) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        render(&mut surface, seed);
        surface
    }

    /// Index range of draws issued inside the reflection pass.
    fn reflection_range(draws: &[DrawCall]) -> (usize, usize) {
        let first = draws.iter().position(|d| d.depth == 1).expect("reflection draws");
        let last = draws.iter().rposition(|d| d.depth == 1).expect("reflection draws");
        (first, last)
    }

    #[test]
    fn geometry_matches_canvas_proportions() {
        let g = SceneGeometry::new(960.0, 600.0);
        assert_eq!(g.water_start, 270.0);
        assert!((g.hull_x - 268.8).abs() < 1e-9);
        assert!((g.hull_width - 307.2).abs() < 1e-9);
        assert!((g.hull_y - 278.64).abs() < 1e-9);
        assert!((g.mast_y - (g.hull_y - 252.0)).abs() < 1e-9);
        assert!((g.water_depth() - 330.0).abs() < 1e-9);
    }

    #[test]
    fn seed_42_sky_gradient_stops() {
        let s = record(42);
        let sky = &s.draws()[0];
        assert_eq!(sky.kind, DrawKind::FillRect);
        match sky.paint() {
            Paint::Linear(g) => {
                let offsets: Vec<f64> = g.stops.iter().map(|s| s.offset).collect();
                assert_eq!(offsets, vec![0.0, 0.35, 1.0]);
            }
            other => panic!("expected linear sky gradient, got {:?}", other),
        }
    }

    #[test]
    fn seed_42_sun_radius_uses_first_draw() {
        let s = record(42);
        let expected = 80.0 + SceneRng::new(42).next_f64() * 20.0;
        match s.draws()[1].paint() {
            Paint::Radial(g) => {
                assert_eq!(g.outer_radius, expected);
                assert_eq!(g.inner_radius, expected * 0.2);
            }
            other => panic!("expected radial sun gradient, got {:?}", other),
        }
    }

    #[test]
    fn seed_42_draws_four_wave_layers_with_fading_opacity() {
        let s = record(42);
        let waves: Vec<&DrawCall> = s
            .draws()
            .iter()
            .filter(|d| d.kind == DrawKind::Fill && matches!(d.paint(), Paint::Solid(Color(41, 109, 180, _))))
            .collect();
        assert_eq!(waves.len(), 4);
        let alphas: Vec<u8> = waves
            .iter()
            .map(|d| match d.paint() { Paint::Solid(c) => c.3, _ => unreachable!() })
            .collect();
        assert!(alphas.windows(2).all(|w| w[0] > w[1]));
        // moveTo + 241 samples + two bottom corners + close
        assert!(waves.iter().all(|d| d.path.len() == 245));
    }

    #[test]
    fn seed_42_draws_four_birds_and_forty_sparkles() {
        let s = record(42);
        let (_, last) = reflection_range(s.draws());
        let after = &s.draws()[last + 1..];
        let birds = after.iter().filter(|d| d.kind == DrawKind::Stroke).count();
        let sparkles = after
            .iter()
            .filter(|d| d.kind == DrawKind::Fill && matches!(d.path.first(), Some(Command::Arc { .. })))
            .count();
        assert_eq!(birds, 4);
        assert_eq!(sparkles, 40);
        assert_eq!(after.len(), 44);
    }

    #[test]
    fn seed_42_draws_eight_ripple_bands_inside_reflection() {
        let s = record(42);
        let ripples: Vec<&DrawCall> = s.draws().iter().filter(|d| d.kind == DrawKind::FillRect && d.depth == 1).collect();
        assert_eq!(ripples.len(), 8);

        let g = SceneGeometry::new(960.0, 600.0);
        let r = SceneRng::for_reflection(42).next_f64();
        let first_height = g.water_depth() * 0.02 * (0.5 + r);
        let Some(Command::MoveTo(p)) = ripples[0].path.first() else { panic!("ripple path") };
        assert_eq!(*p, Point::new(g.hull_x - 20.0, g.hull_y));
        let Some(Command::LineTo(corner)) = ripples[0].path.get(2) else { panic!("ripple path") };
        assert_eq!(corner.y, g.hull_y + first_height);
    }

    #[test]
    fn reflection_reuses_main_pass_geometry() {
        let s = record(42);
        let is_hull = |d: &&DrawCall| {
            d.kind == DrawKind::Fill && matches!(d.path.get(1), Some(Command::QuadraticCurveTo { .. }))
        };
        let main_hull = s.draws().iter().filter(|d| d.depth == 0).find(is_hull).expect("hull");
        let mirrored_hull = s.draws().iter().filter(|d| d.depth == 1).find(is_hull).expect("reflected hull");
        assert_eq!(main_hull.paint(), &Paint::Solid(HULL));
        assert_eq!(main_hull.path, mirrored_hull.path);

        let g = SceneGeometry::new(960.0, 600.0);
        let expected = Transform::IDENTITY
            .translated(0.0, g.hull_y * 2.0 + g.hull_height * reflection::REFLECTION_HULL_OFFSET)
            .scaled(1.0, -1.0);
        assert_eq!(mirrored_hull.state.transform, expected);
        assert_eq!(mirrored_hull.state.global_alpha, reflection::REFLECTION_ALPHA);
    }

    #[test]
    fn reflection_state_is_restored() {
        let s = record(42);
        let (_, last) = reflection_range(s.draws());
        let next = &s.draws()[last + 1];
        assert!(next.state.transform.is_identity());
        assert_eq!(next.state.global_alpha, 1.0);
        assert_eq!(s.depth(), 0);
        assert!(s.transform().is_identity());
        assert_eq!(s.global_alpha(), 1.0);
    }

    #[test]
    fn last_sparkle_consumes_the_final_draws() {
        let s = record(42);
        let g = SceneGeometry::new(960.0, 600.0);
        let mut rng = SceneRng::new(42);
        for _ in 0..1141 {
            rng.next_f64();
        }
        let x = g.width * rng.next_f64();
        let y = g.water_start + g.water_depth() * rng.next_f64();
        let radius = rng.next_f64() * 2.5;
        let last = s.draws().last().expect("sparkle");
        assert_eq!(last.path.first(), Some(&Command::Arc { center: Point::new(x, y), radius, start: 0.0, end: std::f64::consts::TAU }));
    }

    #[test]
    fn same_seed_same_commands() {
        assert_eq!(record(7).into_commands(), record(7).into_commands());
        assert_ne!(record(7).into_commands(), record(8).into_commands());
    }

    #[test]
    fn render_starts_with_clear() {
        let s = record(1);
        assert_eq!(s.commands().first(), Some(&Command::Clear));
    }
}
