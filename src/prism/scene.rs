use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use nalgebra::{Vector3, Vector4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prism::uniform;
use crate::util::random_vec;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub position: Vector3<f32>,
    /// Zero or negative radius is allowed and never intersects.
    pub radius: f32,
    pub color: Vector4<f32>,
}

impl Sphere {
    pub fn new(position: Vector3<f32>, radius: f32, color: Vector4<f32>) -> Self {
        Self {
            position,
            radius,
            color,
        }
    }

    fn is_finite(&self) -> bool {
        self.position.iter().chain(self.color.iter()).all(|v| v.is_finite())
            && self.radius.is_finite()
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            radius: 1.0,
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub spheres: Vec<Sphere>,
}

pub const PRESETS: &[&str] = &["single", "mirrors", "showcase", "random"];

impl Scene {
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Red unit sphere at the origin, straight in front of the eye.
    pub fn single() -> Self {
        Self::new(vec![Sphere::new(
            Vector3::zeros(),
            1.0,
            Vector4::new(1.0, 0.0, 0.0, 1.0),
        )])
    }

    /// Two spheres facing each other across the x axis.
    pub fn mirrors() -> Self {
        Self::new(vec![
            Sphere::new(Vector3::new(-1.1, 0.0, 0.0), 1.0, Vector4::new(0.9, 0.9, 0.9, 1.0)),
            Sphere::new(Vector3::new(1.1, 0.0, 0.0), 1.0, Vector4::new(0.2, 0.4, 0.9, 1.0)),
        ])
    }

    pub fn showcase() -> Self {
        Self::new(vec![
            Sphere::new(Vector3::new(0.0, 0.0, 1.0), 0.8, Vector4::new(1.0, 0.3, 0.2, 1.0)),
            Sphere::new(Vector3::new(-1.4, 0.2, 1.6), 0.6, Vector4::new(0.2, 0.8, 0.3, 1.0)),
            Sphere::new(Vector3::new(1.4, -0.1, 1.4), 0.5, Vector4::new(0.2, 0.4, 1.0, 1.0)),
            Sphere::new(Vector3::new(0.0, -101.0, 1.0), 100.0, Vector4::new(0.6, 0.6, 0.6, 1.0)),
        ])
    }

    /// `count` spheres scattered in front of the eye, reproducible from `seed`.
    pub fn random(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let spheres = (0..count)
            .map(|_| {
                let mut position = random_vec(&mut rng, -2.0..2.0);
                position.z = rng.gen_range(0.0..4.0);
                let radius = rng.gen_range(0.15..0.6);
                let albedo = random_vec(&mut rng, 0.1..1.0);
                Sphere::new(position, radius, albedo.push(1.0))
            })
            .collect();
        Self::new(spheres)
    }

    pub fn preset(name: &str, seed: u64) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::single()),
            "mirrors" => Ok(Self::mirrors()),
            "showcase" => Ok(Self::showcase()),
            "random" => Ok(Self::random(12, seed)),
            _ => Err(Error::UnknownPreset(name.to_owned())),
        }
    }

    /// Preset name, or a `.json` / `.bin` scene file.
    pub fn load(source: &str, seed: u64) -> Result<Self> {
        let path = Path::new(source);
        let scene = match path.extension().and_then(OsStr::to_str) {
            None => Self::preset(source, seed)?,
            Some(extension) if extension.eq_ignore_ascii_case("json") => {
                Self::from_json(&fs::read_to_string(path)?)?
            }
            Some(extension) if extension.eq_ignore_ascii_case("bin") => {
                Self::from_bytes(&fs::read(path)?)?
            }
            Some(extension) => return Err(Error::UnsupportedFormat(extension.to_owned())),
        };

        debug!("Loaded scene '{}' with {} spheres", source, scene.spheres.len());
        scene.check()?;
        Ok(scene)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SceneFile = serde_json::from_str(raw)?;
        Ok(Self::new(file.spheres.into_iter().map(Sphere::from).collect()))
    }

    pub fn to_json(&self) -> Result<String> {
        let file = SceneFile {
            spheres: self.spheres.iter().map(SphereDesc::from).collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(uniform::spheres_from_bytes(bytes)?))
    }

    /// Storage buffer contents for a GPU host; empty for an empty scene.
    pub fn to_buffer_bytes(&self) -> Vec<u8> {
        uniform::spheres_to_bytes(&self.spheres)
    }

    /// Rejects non-finite data; degenerate spheres only produce a warning.
    pub fn check(&self) -> Result<()> {
        if self.spheres.is_empty() {
            warn!("Scene has no spheres, every pixel will be background");
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.is_finite() {
                return Err(Error::InvalidScene(format!(
                    "sphere {index} has non-finite values"
                )));
            }
            if sphere.radius <= 0.0 {
                warn!("Sphere {index} has radius {} and will never be hit", sphere.radius);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    spheres: Vec<SphereDesc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SphereDesc {
    position: [f32; 3],
    radius: f32,
    #[serde(default = "default_color")]
    color: [f32; 4],
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

impl From<SphereDesc> for Sphere {
    fn from(desc: SphereDesc) -> Self {
        Sphere::new(desc.position.into(), desc.radius, desc.color.into())
    }
}

impl From<&Sphere> for SphereDesc {
    fn from(sphere: &Sphere) -> Self {
        Self {
            position: sphere.position.into(),
            radius: sphere.radius,
            color: sphere.color.into(),
        }
    }
}
