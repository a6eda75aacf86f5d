//! Hull, mast, sail and flag. The `trace_*` helpers only build paths so the
//! reflection pass can replay the exact same outlines.

use super::SceneGeometry;
use crate::surface::{DrawingSurface, LineCap, LinearGradient};
use crate::utils::render2d::{Color, FLAG, HULL, MAST, SAIL_BRIGHT, SAIL_MID, SAIL_PALE};

pub const HIGHLIGHT_WIDTH: f64 = 6.0;
pub const MAST_WIDTH: f64 = 12.0;
/// Flag triangle size along the mast.
const FLAG_SIZE: f64 = 40.0;

/// Boat-bottom silhouette: two quadratic curves meeting under the mast.
pub fn trace_hull<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    let (x, y, w, h) = (g.hull_x, g.hull_y, g.hull_width, g.hull_height);
    surface.begin_path();
    surface.move_to(x, y);
    surface.quadratic_curve_to(x + w * 0.12, y + h * 1.2, x + w * 0.5, y + h * 1.3);
    surface.quadratic_curve_to(x + w * 0.88, y + h * 1.2, x + w, y);
    surface.line_to(x, y);
}

pub fn trace_highlight<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    let (x, y, w, h) = (g.hull_x, g.hull_y, g.hull_width, g.hull_height);
    surface.begin_path();
    surface.move_to(x + w * 0.08, y + h * 0.2);
    surface.quadratic_curve_to(x + w * 0.5, y + h * 0.9, x + w * 0.92, y + h * 0.2);
}

pub fn trace_mast<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    surface.begin_path();
    surface.move_to(g.mast_x, g.hull_y);
    surface.line_to(g.mast_x, g.mast_y);
}

/// Sail triangle; `reach` scales how far the free corner swings away from the mast.
fn trace_sail_triangle<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry, reach: f64, lift: f64) {
    surface.begin_path();
    surface.move_to(g.mast_x, g.sail_top);
    surface.line_to(g.mast_x, g.sail_bottom);
    surface.line_to(g.mast_x - g.sail_width * reach, g.sail_bottom - g.sail_width * lift);
    surface.close_path();
}

pub fn trace_sail<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    trace_sail_triangle(surface, g, 0.9, 0.35);
}

pub fn draw<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    trace_hull(surface, g);
    surface.set_fill_style(HULL.into());
    surface.fill();

    trace_highlight(surface, g);
    surface.set_stroke_style(Color::rgba(255, 255, 255, 0.25).into());
    surface.set_line_width(HIGHLIGHT_WIDTH);
    surface.stroke();

    // The round cap stays set for everything stroked afterwards.
    trace_mast(surface, g);
    surface.set_stroke_style(MAST.into());
    surface.set_line_width(MAST_WIDTH);
    surface.set_line_cap(LineCap::Round);
    surface.stroke();

    trace_sail(surface, g);
    let sail = LinearGradient::new(g.mast_x, g.sail_top, g.mast_x - g.sail_width, g.sail_bottom)
        .with_stop(0.0, SAIL_BRIGHT)
        .with_stop(0.6, SAIL_MID)
        .with_stop(1.0, SAIL_PALE);
    surface.set_fill_style(sail.into());
    surface.fill();

    trace_sail_triangle(surface, g, 0.55, 0.2);
    surface.set_fill_style(Color::rgba(0, 0, 0, 0.08).into());
    surface.fill();

    surface.begin_path();
    surface.move_to(g.mast_x, g.mast_y);
    surface.line_to(g.mast_x + FLAG_SIZE, g.mast_y + FLAG_SIZE * 0.5);
    surface.line_to(g.mast_x, g.mast_y + FLAG_SIZE);
    surface.close_path();
    surface.set_fill_style(FLAG.into());
    surface.fill();
}
