//! Byte layouts shared with a GPU host.
//!
//! These mirror the uniform and storage buffers a host binds per frame. The
//! CPU renderer converts them into the validated types before tracing.

use bytemuck::{Pod, Zeroable};
use nalgebra::{Vector3, Vector4};

use crate::error::{Error, Result};
use crate::prism::camera::{Camera, Time};
use crate::prism::scene::Sphere;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TimeUniform {
    pub elapsed_ms: f32,
    pub _padding: u32,
}

/// One element of the sphere storage buffer, 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereUniform {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

pub const SPHERE_SIZE: usize = std::mem::size_of::<SphereUniform>();

impl From<Camera> for CameraUniform {
    fn from(camera: Camera) -> Self {
        Self {
            width: camera.width(),
            height: camera.height(),
        }
    }
}

impl TryFrom<CameraUniform> for Camera {
    type Error = Error;

    fn try_from(uniform: CameraUniform) -> Result<Self> {
        Camera::new(uniform.width, uniform.height)
    }
}

impl From<Time> for TimeUniform {
    fn from(time: Time) -> Self {
        Self {
            elapsed_ms: time.elapsed_ms,
            _padding: 0,
        }
    }
}

impl From<TimeUniform> for Time {
    fn from(uniform: TimeUniform) -> Self {
        Time::from_millis(uniform.elapsed_ms)
    }
}

impl From<&Sphere> for SphereUniform {
    fn from(sphere: &Sphere) -> Self {
        Self {
            position: sphere.position.into(),
            radius: sphere.radius,
            color: sphere.color.into(),
        }
    }
}

impl From<SphereUniform> for Sphere {
    fn from(uniform: SphereUniform) -> Self {
        Sphere {
            position: Vector3::from(uniform.position),
            radius: uniform.radius,
            color: Vector4::from(uniform.color),
        }
    }
}

/// Packs spheres into the storage buffer layout.
pub fn spheres_to_bytes(spheres: &[Sphere]) -> Vec<u8> {
    let records: Vec<SphereUniform> = spheres.iter().map(SphereUniform::from).collect();
    bytemuck::cast_slice(&records).to_vec()
}

/// Reads a storage buffer back. The length must be a whole number of records.
pub fn spheres_from_bytes(bytes: &[u8]) -> Result<Vec<Sphere>> {
    if bytes.len() % SPHERE_SIZE != 0 {
        return Err(Error::InvalidScene(format!(
            "sphere buffer is {} bytes, not a multiple of {SPHERE_SIZE}",
            bytes.len()
        )));
    }

    // Copy first: the input slice carries no alignment guarantee.
    let records: Vec<SphereUniform> = bytemuck::pod_collect_to_vec(bytes);
    Ok(records.into_iter().map(Sphere::from).collect())
}
