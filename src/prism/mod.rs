use bytemuck::cast_slice;
use nalgebra::{Vector2, Vector4};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::prism::camera::{Camera, Time};
use crate::prism::jitter::jitter_scaled;
use crate::prism::ray::{ray_through, view_plane_coord};
use crate::prism::scene::Sphere;
use crate::prism::texture::Image;
use crate::prism::trace::{trace_ray, TraceSettings};
use crate::vec4_to_rgba;

pub mod camera;
pub mod intersect;
pub mod jitter;
pub mod ray;
pub mod scene;
pub mod texture;
pub mod trace;
pub mod uniform;

/// Read-only inputs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub camera: Camera,
    pub time: Time,
    pub spheres: &'a [Sphere],
}

/// Color seen through `screen_uv`: `samples` jittered rays, averaged.
///
/// Pure function of its inputs, safe to call from any number of threads.
pub fn shade_pixel(screen_uv: Vector2<f32>, frame: &Frame, settings: &TraceSettings) -> Vector4<f32> {
    let samples = settings.samples.max(1);
    let seed = frame.time.seed();
    let coord = view_plane_coord(screen_uv, &frame.camera);

    let mut color = Vector4::zeros();
    for sample in 0..samples {
        let mut sample_coord = coord;
        if settings.jitter {
            sample_coord += jitter_scaled(coord, seed + sample as f32, settings.jitter_scale);
        }
        color += trace_ray(ray_through(sample_coord), frame.spheres, settings);
    }

    color / samples as f32
}

/// Pixel center of `(x, y)` in uv space; row 0 is the top of the image.
pub fn pixel_uv(camera: &Camera, x: u32, y: u32) -> Vector2<f32> {
    Vector2::new(
        (x as f32 + 0.5) / camera.width() as f32,
        1.0 - (y as f32 + 0.5) / camera.height() as f32,
    )
}

pub struct Settings {
    /// Average successive frames instead of showing only the latest one
    pub should_accumulate: bool,
    pub trace: TraceSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            should_accumulate: true,
            trace: TraceSettings::default(),
        }
    }
}

pub struct Prism {
    pub final_image: Image,
    pub final_image_data: Vec<u32>,
    path_acc: Vec<Vector4<f32>>,
    acc_counter: u32,
    pub settings: Settings,
}

impl Prism {
    pub fn new(width: u32, height: u32) -> Self {
        let final_image = Image::new(width, height, "Prism Output");
        let final_image_data = vec![0; (width * height) as usize];
        let path_acc = vec![Vector4::zeros(); (width * height) as usize];

        Self {
            final_image,
            final_image_data,
            path_acc,
            acc_counter: 1,
            settings: Default::default(),
        }
    }

    pub fn with_settings(width: u32, height: u32, settings: Settings) -> Self {
        Self {
            settings,
            ..Self::new(width, height)
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.final_image.size() == (width, height) {
            return;
        }

        self.final_image.resize(width, height);
        self.final_image_data = vec![0; (width * height) as usize];
        self.path_acc = vec![Vector4::zeros(); (width * height) as usize];
        self.reset_counter();
    }

    /// Frames averaged into the current image.
    pub fn accumulated_frames(&self) -> u32 {
        self.acc_counter - 1
    }

    pub fn reset_counter(&mut self) {
        self.acc_counter = 1;
    }

    /// Traces every pixel of `frame` in parallel, one rayon task per row.
    pub fn render(&mut self, frame: &Frame) -> Result<()> {
        let (width, height) = self.final_image.size();
        if (frame.camera.width(), frame.camera.height()) != (width, height) {
            return Err(Error::SizeMismatch {
                expected_width: width,
                expected_height: height,
                actual_width: frame.camera.width(),
                actual_height: frame.camera.height(),
            });
        }

        if self.acc_counter == 1 {
            self.path_acc.fill(Vector4::zeros());
        }

        let trace = &self.settings.trace;
        let counter = self.acc_counter as f32;

        self.path_acc
            .par_chunks_mut(width as usize)
            .zip(self.final_image_data.par_chunks_mut(width as usize))
            .enumerate()
            .for_each(|(y, (path_row, image_row))| {
                for (x, (path, pixel)) in path_row.iter_mut().zip(image_row.iter_mut()).enumerate() {
                    let color = Self::per_pixel(frame, trace, x as u32, y as u32);

                    *path += color;
                    *pixel = vec4_to_rgba(&(*path / counter));
                }
            });

        self.final_image.load_image(cast_slice(&self.final_image_data));

        if self.settings.should_accumulate {
            self.acc_counter += 1;
        } else {
            self.acc_counter = 1;
        }

        Ok(())
    }

    pub fn per_pixel(frame: &Frame, settings: &TraceSettings, x: u32, y: u32) -> Vector4<f32> {
        shade_pixel(pixel_uv(&frame.camera, x, y), frame, settings)
    }
}
