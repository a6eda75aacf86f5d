//! Birds in the sky and sparkles on the water, drawn last and on top of everything.

use std::f64::consts::TAU;

use super::SceneGeometry;
use crate::surface::DrawingSurface;
use crate::utils::render2d::Color;
use crate::utils::rng::SceneRng;

pub const BIRD_COUNT: usize = 4;
pub const SPARKLE_COUNT: usize = 40;

pub fn draw_birds<S: DrawingSurface + ?Sized>(surface: &mut S, rng: &mut SceneRng, g: &SceneGeometry) {
    surface.set_stroke_style(Color::rgba(255, 255, 255, 0.7).into());
    surface.set_line_width(3.0);
    for _ in 0..BIRD_COUNT {
        let x = g.width * (0.1 + rng.next_f64() * 0.35);
        let y = g.height * (0.1 + rng.next_f64() * 0.2);
        let wing_span = 26.0 + rng.next_f64() * 18.0;
        surface.begin_path();
        surface.move_to(x - wing_span * 0.5, y);
        surface.quadratic_curve_to(x, y + 10.0, x + wing_span * 0.5, y);
        surface.stroke();
    }
}

pub fn draw_sparkles<S: DrawingSurface + ?Sized>(surface: &mut S, rng: &mut SceneRng, g: &SceneGeometry) {
    for _ in 0..SPARKLE_COUNT {
        let x = g.width * rng.next_f64();
        let y = g.water_start + (g.height - g.water_start) * rng.next_f64();
        let radius = rng.next_f64() * 2.5;
        surface.set_fill_style(Color::rgba(255, 255, 255, 0.35 + rng.next_f64() * 0.35).into());
        surface.begin_path();
        surface.arc(x, y, radius, 0.0, TAU);
        surface.fill();
    }
}
