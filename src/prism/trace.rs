use log::debug;
use nalgebra::{Unit, Vector3, Vector4};

use crate::error::{Error, Result};
use crate::prism::intersect::closest_hit;
use crate::prism::jitter::JITTER_SCALE;
use crate::prism::ray::Ray;
use crate::prism::scene::Sphere;

/// Color returned for rays that hit nothing.
pub const BACKGROUND: Vector4<f32> = Vector4::new(0.0, 0.0, 0.0, 1.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceSettings {
    /// Jittered rays averaged per pixel
    pub samples: u32,
    /// Reflections after the primary hit; the loop runs `max_bounces + 1` times
    pub max_bounces: u32,
    pub attenuation_factor: f32,
    /// Tracing stops once the contribution weight drops below this
    pub attenuation_floor: f32,
    /// Direction towards the single light
    pub light_direction: Unit<Vector3<f32>>,
    /// Hits nearer than this are ignored, which also keeps reflected rays
    /// from re-hitting the surface they leave
    pub min_distance: f32,
    pub jitter: bool,
    pub jitter_scale: f32,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            samples: 8,
            max_bounces: 4,
            attenuation_factor: 0.5,
            attenuation_floor: 0.01,
            light_direction: Unit::new_normalize(Vector3::new(1.0, 1.0, -1.0)),
            min_distance: 1e-4,
            jitter: true,
            jitter_scale: JITTER_SCALE,
        }
    }
}

impl TraceSettings {
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(Error::InvalidSettings("samples must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.attenuation_factor) {
            return Err(Error::InvalidSettings(format!(
                "attenuation factor {} must be in [0, 1)",
                self.attenuation_factor
            )));
        }
        if !self.attenuation_floor.is_finite() || !self.jitter_scale.is_finite() {
            return Err(Error::InvalidSettings(
                "attenuation floor and jitter scale must be finite".into(),
            ));
        }
        if self.min_distance.is_nan() {
            return Err(Error::InvalidSettings("min distance must not be NaN".into()));
        }

        debug!("{self:?}");
        Ok(())
    }
}

pub fn reflect(direction: &Vector3<f32>, normal: &Vector3<f32>) -> Vector3<f32> {
    direction - normal * (2.0 * direction.dot(normal))
}

/// Follows `ray` through up to `max_bounces + 1` hits.
///
/// Each hit adds `color * lambert * weight` and halves the weight. Alpha stays 1.
pub fn trace_ray(ray: Ray, spheres: &[Sphere], settings: &TraceSettings) -> Vector4<f32> {
    trace_ray_counted(ray, spheres, settings).0
}

/// [`trace_ray`] that also reports how many surfaces were hit.
pub fn trace_ray_counted(
    mut ray: Ray,
    spheres: &[Sphere],
    settings: &TraceSettings,
) -> (Vector4<f32>, u32) {
    let mut color = Vector3::zeros();
    let mut attenuation = 1.0;
    let mut hits = 0;

    for _ in 0..=settings.max_bounces {
        let Some(payload) = closest_hit(&ray, spheres, settings.min_distance) else {
            break;
        };
        hits += 1;

        let normal = payload.hit.normal;
        let light = normal.dot(&settings.light_direction.into_inner()).clamp(0.0, 1.0);
        color += payload.sphere.color.xyz() * (light * attenuation);

        attenuation *= settings.attenuation_factor;
        if attenuation < settings.attenuation_floor {
            break;
        }

        ray = Ray {
            origin: payload.hit.position,
            direction: Unit::new_normalize(reflect(&ray.direction, &normal)),
        };
    }

    (color.push(BACKGROUND.w), hits)
}
