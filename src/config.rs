use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glium::glutin::dpi::LogicalSize;
use serde::Deserialize;

use crate::float::*;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Initial width of the window in logical pixels
    pub width: u32,
    /// Initial height of the window in logical pixels
    pub height: u32,
    /// Title of the window
    pub title: String,
    /// Side length of the square trace image in pixels
    pub resolution: u32,
    /// Local size of the compute shader along x and y.
    /// Has to match the layout declared in the compute shader.
    pub workgroup_size: u32,
    /// Directory containing the shader sources
    pub shader_dir: PathBuf,
    pub vertex_shader: String,
    pub fragment_shader: String,
    pub compute_shader: String,
    /// Name of the image2D the compute shader writes to
    pub image_uniform: String,
    /// Initial movement speed of the camera in units per second
    pub speed: Float,
    /// Mouse sensitivity in degrees per pixel
    pub sensitivity: Float,
    pub clear_color: (f32, f32, f32, f32),
    pub vsync: bool,
    /// Directory where screenshots are written
    pub screenshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            title: "Raytracer".to_string(),
            resolution: 1 << 10,
            workgroup_size: 8,
            shader_dir: PathBuf::from("shaders"),
            vertex_shader: "vert.glsl".to_string(),
            fragment_shader: "frag.glsl".to_string(),
            compute_shader: "comp.glsl".to_string(),
            image_uniform: "img".to_string(),
            speed: 1.0,
            sensitivity: 0.1,
            clear_color: (1.0, 1.0, 1.0, 1.0),
            vsync: true,
            screenshot_dir: PathBuf::from("screenshots"),
        }
    }
}

impl Config {
    /// Load a config from a RON file. Missing fields fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        Ok(config)
    }

    pub fn dimensions(&self) -> LogicalSize<u32> {
        LogicalSize::new(self.width, self.height)
    }

    pub fn vertex_path(&self) -> PathBuf {
        self.shader_dir.join(&self.vertex_shader)
    }

    pub fn fragment_path(&self) -> PathBuf {
        self.shader_dir.join(&self.fragment_shader)
    }

    pub fn compute_path(&self) -> PathBuf {
        self.shader_dir.join(&self.compute_shader)
    }
}
