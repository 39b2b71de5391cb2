/// Example: render a few frames without taking over the terminal and print
/// the last one
///
/// Usage: cargo run --example snapshot -- [frames] [model]

use dice_core::{Camera, LightModel, RotationChannel, Scene};
use dice_terminal::AsciiRenderer;
use std::env;
use std::io::{self, Write};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let frames: usize = args.get(1).and_then(|n| n.parse().ok()).unwrap_or(60);
    let model = match args.get(2).map(String::as_str) {
        Some("phong") => LightModel::Phong,
        Some("cel") => LightModel::CelShaded,
        _ => LightModel::Lambert,
    };

    let (width, height) = (96, 32);
    let mut renderer = AsciiRenderer::new(width, height);
    let projection = Camera::with_aspect(width as f32 * 0.5 / height as f32).projection_matrix();

    let mut scene = Scene::default();
    scene.light.model = model;
    scene.animation.set_channel_speed(RotationChannel::SelfSpin, 0.015);

    for _ in 0..frames {
        match scene.render_frame(&mut renderer, &projection) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    let mut stdout = io::stdout();
    for y in 0..height {
        let row: String = (0..width)
            .filter_map(|x| renderer.cell(x, y).map(|cell| cell.glyph))
            .collect();
        writeln!(stdout, "{row}")?;
    }
    writeln!(stdout, "{frames} frames, {:?}, angles {:?}", model, scene.animation.angles())?;
    Ok(())
}
