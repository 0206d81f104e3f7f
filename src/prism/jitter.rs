//! Sine-hash jitter for stochastic supersampling.
//!
//! Not random in any statistical sense, only decorrelated enough that
//! neighbouring pixels do not share a sample pattern. Pure functions, so the
//! same `(coord, seed)` always gives the same offset.

use nalgebra::Vector2;

const HASH_DIRECTION: Vector2<f32> = Vector2::new(50.0, 161.0);
const HASH_SCALE: f32 = 43758.5453;

/// Default jitter magnitude in view-plane units.
pub const JITTER_SCALE: f32 = 0.005;

fn fract(v: f32) -> f32 {
    v - v.floor()
}

/// `fract(sin(dot(p, (50, 161)) + seed * 43758.5453) * 43758.5453)`, in `[0, 1]`.
pub fn hash12(p: Vector2<f32>, seed: f32) -> f32 {
    fract((p.dot(&HASH_DIRECTION) + seed * HASH_SCALE).sin() * HASH_SCALE)
}

/// Offset in `[-scale, scale]^2` for the view-plane coordinate `coord`.
pub fn jitter_scaled(coord: Vector2<f32>, seed: f32, scale: f32) -> Vector2<f32> {
    let x = hash12(coord + Vector2::new(1.0, 0.0), seed);
    let y = hash12(coord + Vector2::new(0.0, 1.0), seed);
    (Vector2::new(x, y) * 2.0 - Vector2::new(1.0, 1.0)) * scale
}

pub fn jitter(coord: Vector2<f32>, seed: f32) -> Vector2<f32> {
    jitter_scaled(coord, seed, JITTER_SCALE)
}
