//! Sky, sun, water and wave layers.

use std::f64::consts::{PI, TAU};

use super::SceneGeometry;
use crate::surface::{DrawingSurface, LinearGradient, RadialGradient};
use crate::utils::render2d::{Color, SKY_HIGH, SKY_LOW, SKY_MID, WATER_DEEP, WATER_MID, WATER_TOP};
use crate::utils::rng::SceneRng;

pub const WAVE_LAYERS: usize = 4;
/// Horizontal distance between wave samples.
pub const WAVE_SAMPLE_STEP: f64 = 4.0;

pub fn draw_sky<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    let sky = LinearGradient::new(0.0, 0.0, 0.0, g.height)
        .with_stop(0.0, SKY_HIGH)
        .with_stop(0.35, SKY_MID)
        .with_stop(1.0, SKY_LOW);
    surface.set_fill_style(sky.into());
    surface.fill_rect(0.0, 0.0, g.width, g.height);
}

pub fn draw_sun<S: DrawingSurface + ?Sized>(surface: &mut S, rng: &mut SceneRng, g: &SceneGeometry) {
    let x = g.width * 0.8;
    let y = g.height * 0.2;
    let radius = 80.0 + rng.next_f64() * 20.0;
    let sun = RadialGradient::new(x, y, radius * 0.2, x, y, radius)
        .with_stop(0.0, Color::rgba(255, 255, 220, 0.95))
        .with_stop(1.0, Color::rgba(255, 200, 90, 0.0));
    surface.set_fill_style(sun.into());
    surface.begin_path();
    surface.arc(x, y, radius, 0.0, TAU);
    surface.fill();
}

pub fn draw_water<S: DrawingSurface + ?Sized>(surface: &mut S, g: &SceneGeometry) {
    let water = LinearGradient::new(0.0, g.water_start, 0.0, g.height)
        .with_stop(0.0, WATER_TOP)
        .with_stop(0.6, WATER_MID)
        .with_stop(1.0, WATER_DEEP);
    surface.set_fill_style(water.into());
    surface.fill_rect(0.0, g.water_start, g.width, g.water_depth());
}

/// Layered sine bands. Upper layers are calm and long; lower layers grow taller,
/// shorter and less noisy.
pub fn draw_waves<S: DrawingSurface + ?Sized>(surface: &mut S, rng: &mut SceneRng, g: &SceneGeometry) {
    let samples = (g.width / WAVE_SAMPLE_STEP).floor() as usize;
    for layer in 0..WAVE_LAYERS {
        let l = layer as f64;
        let amplitude = 10.0 + l * 8.0;
        let wavelength = 120.0 - l * 15.0;
        let phase = rng.next_f64() * 0.5 + 0.5;
        let offset_y = g.water_start + l * 35.0 + rng.next_f64() * 10.0;
        let noise_scale = 1.0 - l * 0.15;

        surface.begin_path();
        surface.move_to(0.0, offset_y);
        for i in 0..=samples {
            let x = i as f64 * WAVE_SAMPLE_STEP;
            let noise = (rng.next_f64() - 0.5) * 8.0;
            let y = offset_y + ((x / wavelength) * PI * 2.0 + phase).sin() * amplitude + noise * noise_scale;
            surface.line_to(x, y);
        }
        surface.line_to(g.width, g.height);
        surface.line_to(0.0, g.height);
        surface.close_path();
        surface.set_fill_style(Color::rgba(41, 109, 180, 0.38 - l * 0.07).into());
        surface.fill();
    }
}
