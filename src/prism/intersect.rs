use nalgebra::{Point3, Unit, Vector3};

use crate::prism::ray::Ray;
use crate::prism::scene::Sphere;

/// Result of testing one ray against one sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub intersected: bool,
    pub distance: f32,
    pub normal: Unit<Vector3<f32>>,
    pub position: Point3<f32>,
}

impl Hit {
    pub const MISS: Hit = Hit {
        intersected: false,
        distance: f32::MAX,
        normal: Unit::new_unchecked(Vector3::new(0.0, 0.0, 0.0)),
        position: Point3::new(0.0, 0.0, 0.0),
    };
}

/// Closed-form ray/sphere test, near root only.
///
/// The near root is reported even when it lies behind the origin (negative
/// distance); [`closest_hit`] decides what is close enough to count.
pub fn hit_sphere(ray: &Ray, sphere: &Sphere) -> Hit {
    if sphere.radius <= 0.0 {
        return Hit::MISS;
    }

    // e*t^2 + f*t + g = 0 with the sphere moved to the origin
    let direction = ray.direction.into_inner();
    let a = ray.origin.coords - sphere.position;
    let e = direction.dot(&direction);
    let f = 2.0 * a.dot(&direction);
    let g = a.dot(&a) - sphere.radius * sphere.radius;

    let discriminant = f * f - 4.0 * e * g;
    if discriminant < 0.0 {
        return Hit::MISS;
    }

    let distance = (-f - discriminant.sqrt()) / (2.0 * e);
    let position = ray.at(distance);
    let normal = Unit::new_normalize(position.coords - sphere.position);

    Hit {
        intersected: true,
        distance,
        normal,
        position,
    }
}

/// Nearest hit along a ray together with the sphere it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct HitPayload<'a> {
    pub hit: Hit,
    pub sphere: &'a Sphere,
}

/// Scans every sphere once and keeps the nearest hit at or beyond `min_distance`.
///
/// Ties go to the sphere that comes first in the slice.
pub fn closest_hit<'a>(ray: &Ray, spheres: &'a [Sphere], min_distance: f32) -> Option<HitPayload<'a>> {
    let mut closest: Option<HitPayload<'a>> = None;
    let mut best = f32::MAX;

    for sphere in spheres {
        let hit = hit_sphere(ray, sphere);
        if !hit.intersected || hit.distance < min_distance {
            continue;
        }

        if hit.distance < best {
            best = hit.distance;
            closest = Some(HitPayload { hit, sphere });
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector4;

    use super::*;

    const EPS: f32 = 1e-4;

    fn sphere(x: f32, y: f32, z: f32, radius: f32) -> Sphere {
        Sphere::new(Vector3::new(x, y, z), radius, Vector4::new(1.0, 1.0, 1.0, 1.0))
    }

    #[test]
    fn test_hit_from_outside() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::z());
        let hit = hit_sphere(&ray, &sphere(0.0, 0.0, 0.0, 2.0));

        assert!(hit.intersected);
        assert!((hit.distance - 3.0).abs() < EPS);
        assert!((hit.position - Point3::new(0.0, 0.0, -2.0)).norm() < EPS);
        assert!((hit.normal.into_inner() - Vector3::new(0.0, 0.0, -1.0)).norm() < EPS);
    }

    #[test]
    fn test_offset_sphere() {
        let ray = Ray::new(Point3::new(3.0, 1.0, 0.0), -Vector3::x());
        let hit = hit_sphere(&ray, &sphere(-2.0, 1.0, 0.0, 0.5));

        assert!(hit.intersected);
        assert!((hit.distance - 4.5).abs() < EPS);
        assert!((hit.normal.x - 1.0).abs() < EPS);
    }

    #[test]
    fn test_miss() {
        // Closest approach to the center is 1.5 > radius.
        let ray = Ray::new(Point3::new(1.5, 0.0, -5.0), Vector3::z());
        assert!(!hit_sphere(&ray, &sphere(0.0, 0.0, 0.0, 1.0)).intersected);
    }

    #[test]
    fn test_tangent_ray() {
        let ray = Ray::new(Point3::new(1.0, 0.0, -5.0), Vector3::z());
        let s = sphere(0.0, 0.0, 0.0, 1.0);
        let hit = hit_sphere(&ray, &s);

        assert!(hit.intersected);
        // Near and far roots coincide at the grazing point.
        let a = ray.origin.coords - s.position;
        let f = 2.0 * a.dot(&ray.direction.into_inner());
        let far = -f / 2.0;
        assert!((hit.distance - far).abs() < EPS);
        assert!((hit.distance - 5.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_radius_never_hits() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::z());
        assert!(!hit_sphere(&ray, &sphere(0.0, 0.0, 0.0, 0.0)).intersected);
        assert!(!hit_sphere(&ray, &sphere(0.0, 0.0, 0.0, -1.0)).intersected);
    }

    #[test]
    fn test_inside_reports_negative_near_root() {
        let ray = Ray::new(Point3::origin(), Vector3::z());
        let s = sphere(0.0, 0.0, 0.0, 1.0);
        let hit = hit_sphere(&ray, &s);

        assert!(hit.intersected);
        assert!((hit.distance + 1.0).abs() < EPS);

        assert!(closest_hit(&ray, std::slice::from_ref(&s), 1e-4).is_none());
        assert!(closest_hit(&ray, std::slice::from_ref(&s), f32::NEG_INFINITY).is_some());
    }

    #[test]
    fn test_behind_origin_is_ignored() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::z());
        let spheres = [sphere(0.0, 0.0, 0.0, 1.0)];
        assert!(hit_sphere(&ray, &spheres[0]).distance < 0.0);
        assert!(closest_hit(&ray, &spheres, 1e-4).is_none());
    }

    #[test]
    fn test_nearest_wins_in_either_order() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -10.0), Vector3::z());
        let near = sphere(0.0, 0.0, 0.0, 1.0);
        let far = sphere(0.0, 0.0, 5.0, 2.0);

        let forward = [near, far];
        let backward = [far, near];
        let a = closest_hit(&ray, &forward, 1e-4).unwrap();
        let b = closest_hit(&ray, &backward, 1e-4).unwrap();

        assert!((a.hit.distance - 9.0).abs() < EPS);
        assert_eq!(a.hit, b.hit);
        assert_eq!(a.sphere, &near);
        assert_eq!(b.sphere, &near);
    }

    #[test]
    fn test_tie_goes_to_first_sphere() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -10.0), Vector3::z());
        let mut red = sphere(0.0, 0.0, 0.0, 1.0);
        red.color = Vector4::new(1.0, 0.0, 0.0, 1.0);
        let mut blue = red;
        blue.color = Vector4::new(0.0, 0.0, 1.0, 1.0);

        let spheres = [red, blue];
        let payload = closest_hit(&ray, &spheres, 1e-4).unwrap();
        assert_eq!(payload.sphere.color, red.color);
    }

    #[test]
    fn test_reduction_stays_inside_slice() {
        // The element right after the slice is nearer; it must never be visited.
        let backing = [sphere(0.0, 0.0, 5.0, 1.0), sphere(0.0, 0.0, 0.0, 1.0)];
        let ray = Ray::new(Point3::new(0.0, 0.0, -10.0), Vector3::z());

        let visible = &backing[..1];
        let payload = closest_hit(&ray, visible, 1e-4).unwrap();
        assert!((payload.hit.distance - 14.0).abs() < EPS);
        assert_eq!(payload.sphere, &backing[0]);

        assert!(closest_hit(&ray, &backing[..0], 1e-4).is_none());
    }
}
