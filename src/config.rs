use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::prism::texture::is_supported_path;
use crate::prism::trace::TraceSettings;
use crate::prism::Settings;

/// Render spheres with an analytic ray tracer and write the result to an image.
#[derive(Parser, Debug)]
#[command(name = "prism", version)]
pub struct Args {
    /// JSON render configuration; overrides every other flag
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    pub width: u32,

    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Preset name (single, mirrors, showcase, random) or a .json / .bin scene file
    #[arg(short, long, default_value = "showcase")]
    pub scene: String,

    /// Output image, .png or .jpg
    #[arg(short, long, default_value = "prism.png")]
    pub output: String,

    #[arg(long, default_value_t = 8)]
    pub samples: u32,

    #[arg(long, default_value_t = 4)]
    pub max_bounces: u32,

    /// Frames to accumulate into the output
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    #[arg(long, default_value_t = 16.0)]
    pub frame_interval_ms: f32,

    /// Clock value of the first frame
    #[arg(long, default_value_t = 0.0)]
    pub elapsed_ms: f32,

    #[arg(long)]
    pub no_jitter: bool,

    /// Seed for the random scene preset
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

impl Args {
    pub fn into_config(self) -> Result<RenderConfig> {
        if let Some(path) = self.config {
            return RenderConfig::from_json(&fs::read_to_string(path)?);
        }

        Ok(RenderConfig {
            width: self.width,
            height: self.height,
            output: self.output,
            scene: self.scene,
            samples: self.samples,
            max_bounces: self.max_bounces,
            frames: self.frames,
            frame_interval_ms: self.frame_interval_ms,
            elapsed_ms: self.elapsed_ms,
            jitter: !self.no_jitter,
            seed: self.seed,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub output: String,
    pub scene: String,
    #[serde(default = "default_samples")]
    pub samples: u32,
    #[serde(default = "default_max_bounces")]
    pub max_bounces: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: f32,
    #[serde(default)]
    pub elapsed_ms: f32,
    #[serde(default = "default_jitter")]
    pub jitter: bool,
    #[serde(default)]
    pub seed: u64,
}

const fn default_samples() -> u32 {
    8
}

const fn default_max_bounces() -> u32 {
    4
}

const fn default_frames() -> u32 {
    1
}

const fn default_frame_interval_ms() -> f32 {
    16.0
}

const fn default_jitter() -> bool {
    true
}

impl RenderConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            should_accumulate: true,
            trace: TraceSettings {
                samples: self.samples,
                max_bounces: self.max_bounces,
                jitter: self.jitter,
                ..Default::default()
            },
        }
    }
}

pub fn validate_config(config: &RenderConfig) -> Result<()> {
    if config.width == 0 || config.height == 0 {
        return Err(Error::InvalidSettings("width and height must be positive".into()));
    }

    if config.samples == 0 {
        return Err(Error::InvalidSettings("samples must be at least 1".into()));
    }

    if config.frames == 0 {
        return Err(Error::InvalidSettings("frames must be at least 1".into()));
    }

    if !config.frame_interval_ms.is_finite() || !config.elapsed_ms.is_finite() {
        return Err(Error::InvalidSettings("times must be finite".into()));
    }

    if config.scene.trim().is_empty() {
        return Err(Error::InvalidSettings("scene must be a non-empty identifier".into()));
    }

    if !is_supported_path(&config.output) {
        return Err(Error::UnsupportedFormat(format!(
            "output '{}' must end in .png, .jpg or .jpeg",
            config.output
        )));
    }

    Ok(())
}
