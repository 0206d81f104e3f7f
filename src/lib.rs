//! Analytic sphere ray tracer.
//!
//! The per-pixel kernel lives in [`prism`]: ray generation, sine-hash jitter,
//! closed-form sphere intersection and a bounded mirror bounce loop. The
//! [`prism::Prism`] renderer runs it over a whole frame with rayon.

use std::time::Instant;

use clap::Parser;
use log::info;
use nalgebra::Vector4;

pub mod config;
pub mod error;
pub mod prism;
mod util;

pub use config::{validate_config, Args, RenderConfig};
pub use error::{Error, Result};
pub use prism::camera::{Camera, Time};
pub use prism::scene::{Scene, Sphere};
pub use prism::trace::TraceSettings;
pub use prism::{shade_pixel, Frame, Prism};

/// Packs a linear color into RGBA8, clamping each channel to `[0, 1]`.
///
/// Byte order in memory is always r, g, b, a.
pub fn vec4_to_rgba(color: &Vector4<f32>) -> u32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    u32::from_ne_bytes([
        channel(color.x),
        channel(color.y),
        channel(color.z),
        channel(color.w),
    ])
}

/// Renders every frame described by `config` and saves the accumulated image.
pub fn render(config: &RenderConfig) -> Result<Prism> {
    validate_config(config)?;

    let settings = config.settings();
    settings.trace.validate()?;

    let scene = Scene::load(&config.scene, config.seed)?;
    let camera = Camera::new(config.width, config.height)?;
    let mut prism = Prism::with_settings(config.width, config.height, settings);

    for index in 0..config.frames {
        let frame = Frame {
            camera,
            time: Time::from_millis(config.elapsed_ms + index as f32 * config.frame_interval_ms),
            spheres: &scene.spheres,
        };

        let started = Instant::now();
        prism.render(&frame)?;

        info!(
            "[{}/{}] Rendered {} spheres at {}x{} (t = {} ms) in {} ms",
            index + 1,
            config.frames,
            scene.spheres.len(),
            config.width,
            config.height,
            frame.time.elapsed_ms,
            started.elapsed().as_millis()
        );
    }

    prism.final_image.save(&config.output)?;
    info!("Saved {}", config.output);

    Ok(prism)
}

pub fn run() -> Result<()> {
    env_logger::init();

    let config = Args::parse().into_config()?;
    render(&config)?;
    println!("{}", config.output);

    Ok(())
}
