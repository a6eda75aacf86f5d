//! Mirrored, faded echo of the boat below the waterline.

use log::trace;

use super::SceneGeometry;
use super::boat::{HIGHLIGHT_WIDTH, MAST_WIDTH, trace_highlight, trace_hull, trace_mast, trace_sail};
use crate::core::Seed;
use crate::surface::{DrawingSurface, LineCap, StateGuard};
use crate::utils::render2d::Color;
use crate::utils::rng::SceneRng;

/// Global alpha for everything drawn in the mirrored space.
pub const REFLECTION_ALPHA: f64 = 0.28;
/// Mirror line below the hull top, as a fraction of the hull height. Tuned by eye.
pub const REFLECTION_HULL_OFFSET: f64 = 0.4;
pub const RIPPLE_SLICES: usize = 8;
/// How far ripple bands overhang the hull on each side.
const RIPPLE_OVERHANG: f64 = 20.0;

/// Translation applied before the vertical flip; maps `y` to `t - y`, so the boat is
/// mirrored across `y = t / 2`.
pub fn mirror_translation(g: &SceneGeometry) -> f64 {
    g.hull_y * 2.0 + g.hull_height * REFLECTION_HULL_OFFSET
}

/// Draw the reflection with its own stream derived from `seed`. The transform and
/// alpha changes are scoped to this call.
pub fn draw<S: DrawingSurface + ?Sized>(surface: &mut S, seed: Seed, g: &SceneGeometry) {
    let mut rng = SceneRng::for_reflection(seed);
    let mut ctx = StateGuard::new(surface);
    ctx.translate(0.0, mirror_translation(g));
    ctx.scale(1.0, -1.0);
    ctx.set_global_alpha(REFLECTION_ALPHA);

    trace_hull(&mut *ctx, g);
    ctx.set_fill_style(Color::rgba(86, 36, 3, 0.3).into());
    ctx.fill();

    trace_highlight(&mut *ctx, g);
    ctx.set_stroke_style(Color::rgba(255, 255, 255, 0.12).into());
    ctx.set_line_width(HIGHLIGHT_WIDTH);
    ctx.stroke();

    trace_mast(&mut *ctx, g);
    ctx.set_stroke_style(Color::rgba(112, 66, 20, 0.25).into());
    ctx.set_line_width(MAST_WIDTH);
    ctx.set_line_cap(LineCap::Round);
    ctx.stroke();

    trace_sail(&mut *ctx, g);
    ctx.set_fill_style(Color::rgba(255, 255, 255, 0.15).into());
    ctx.fill();

    for i in 0..RIPPLE_SLICES {
        let slice_height = (g.height - g.water_start) * 0.02 * (0.5 + rng.next_f64());
        let slice_y = g.hull_y + i as f64 * slice_height * 0.9;
        ctx.set_fill_style(Color::rgba(20, 90, 160, 0.08 + rng.next_f64() * 0.08).into());
        ctx.fill_rect(g.hull_x - RIPPLE_OVERHANG, slice_y, g.hull_width + RIPPLE_OVERHANG * 2.0, slice_height);
    }
    trace!("reflection drew {} ripples, stream at {:#010x}", RIPPLE_SLICES, rng.state());
}
