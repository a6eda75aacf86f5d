use minifb::{Key, KeyRepeat, Window, WindowOptions};
use seascape::{RandomSeeds, RenderFrame, RenderOptions, SeedSource, export_filename, render_frame, save_png};

fn rgba_to_u32(a: u8, r: u8, g: u8, b: u8) -> u32 {
    // Minifb expects ARGB on most platforms; construct accordingly.
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

fn to_buffer(frame: &RenderFrame, buffer: &mut Vec<u32>) {
    let RenderFrame::Pixels { width, height, data } = frame;
    buffer.resize(*width as usize * *height as usize, 0);
    for (i, px) in data.chunks_exact(4).enumerate() {
        buffer[i] = rgba_to_u32(px[3], px[0], px[1], px[2]);
    }
}

fn main() {
    env_logger::init();
    let mut seeds = RandomSeeds::new(rand::thread_rng());
    let options = RenderOptions::default();

    let mut seed = seeds.next_seed();
    let mut frame = render_frame(seed, &options).expect("render should succeed on the standard canvas");
    let (width, height) = (frame.width() as usize, frame.height() as usize);

    let mut window = Window::new(
        "seascape: Space = new scene, S = save PNG",
        width,
        height,
        WindowOptions::default(),
    ).expect("Unable to open window");

    let mut buffer: Vec<u32> = Vec::new();
    to_buffer(&frame, &mut buffer);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            seed = seeds.next_seed();
            frame = render_frame(seed, &options).expect("render should succeed on the standard canvas");
            to_buffer(&frame, &mut buffer);
            log::info!("showing seed {}", seed);
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            if let Err(e) = save_png(export_filename(seed), &frame) {
                eprintln!("Failed to save seed {}: {}", seed, e);
            }
        }
        window.update_with_buffer(&buffer, width, height)
            .expect("Failed to update window buffer");
    }
}
