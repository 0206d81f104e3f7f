use nalgebra::{Point3, Unit, Vector2, Vector3};

use crate::prism::camera::Camera;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: Unit::new_normalize(direction),
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.as_ref() * t
    }
}

/// Fixed eye position, looking down +z at the view plane z = 0.
pub const CAMERA_ORIGIN: Point3<f32> = Point3::new(0.0, 0.0, -2.0);

/// Vertical half-extent of the view plane.
pub const VIEWPORT_SCALE: f32 = 1.0;

/// Maps `uv` in `[0, 1]^2` onto the view plane, x stretched by the aspect ratio.
pub fn view_plane_coord(screen_uv: Vector2<f32>, camera: &Camera) -> Vector2<f32> {
    let centered = (screen_uv - Vector2::new(0.5, 0.5)) * 2.0 * VIEWPORT_SCALE;
    Vector2::new(centered.x * camera.aspect_ratio(), centered.y)
}

/// Ray from the eye through `coord` on the view plane.
pub fn ray_through(coord: Vector2<f32>) -> Ray {
    let target = Point3::new(coord.x, coord.y, 0.0);
    Ray::new(CAMERA_ORIGIN, target - CAMERA_ORIGIN)
}

pub fn generate_ray(screen_uv: Vector2<f32>, camera: &Camera) -> Ray {
    ray_through(view_plane_coord(screen_uv, camera))
}
