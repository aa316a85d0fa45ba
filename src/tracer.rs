use anyhow::{Context, Result};
use glium::backend::Facade;
use glium::program::ComputeShader;
use glium::texture::{MipmapsOption, Texture2d, UncompressedFloatFormat};
use glium::uniforms::{
    AsUniformValue, ImageUnit, ImageUnitAccess, ImageUnitFormat, MagnifySamplerFilter,
    MinifySamplerFilter, Sampler, SamplerWrapFunction, UniformValue, Uniforms,
};
use log::{debug, error};

use crate::camera::CameraUniforms;
use crate::config::Config;

/// Number of work groups needed to cover size pixels along one axis
pub fn dispatch_size(size: u32, workgroup_size: u32) -> u32 {
    let local = workgroup_size.max(1);
    if size == 0 {
        return 0;
    }
    (size - 1) / local + 1
}

/// Owns the image the compute shader writes into
pub struct Tracer {
    image: Texture2d,
    image_uniform: String,
    groups: u32,
}

impl Tracer {
    pub fn new<F: Facade>(facade: &F, config: &Config) -> Result<Tracer> {
        let image = Texture2d::empty_with_format(
            facade,
            UncompressedFloatFormat::F32F32F32F32,
            MipmapsOption::NoMipmap,
            config.resolution,
            config.resolution,
        )
        .context("Failed to create trace image")?;
        let groups = dispatch_size(config.resolution, config.workgroup_size);
        debug!(
            "Trace image {0}x{0}, dispatching {1}x{1} groups",
            config.resolution, groups
        );
        Ok(Tracer {
            image,
            image_uniform: config.image_uniform.clone(),
            groups,
        })
    }

    /// Run the compute shader once over the whole image
    pub fn trace(&self, program: &ComputeShader, camera: &CameraUniforms) {
        let image_unit = match self.image.image_unit(ImageUnitFormat::RGBA32F) {
            Ok(unit) => unit.set_access(ImageUnitAccess::Write),
            Err(err) => {
                error!("Failed to bind trace image: {:?}", err);
                return;
            }
        };
        let uniforms = TraceUniforms {
            camera,
            image_name: &self.image_uniform,
            image: image_unit,
        };
        program.execute(uniforms, self.groups, self.groups, 1);
    }

    /// The trace image prepared for sampling in the render program
    pub fn sampled(&self) -> Sampler<'_, Texture2d> {
        self.image
            .sampled()
            .magnify_filter(MagnifySamplerFilter::Nearest)
            .minify_filter(MinifySamplerFilter::Nearest)
            .wrap_function(SamplerWrapFunction::Repeat)
    }

    pub fn image(&self) -> &Texture2d {
        &self.image
    }
}

/// Uniforms of the compute program. The image uniform name is only known at runtime,
/// which rules out the uniform! macro.
struct TraceUniforms<'a> {
    camera: &'a CameraUniforms,
    image_name: &'a str,
    image: ImageUnit<'a, Texture2d>,
}

impl Uniforms for TraceUniforms<'_> {
    fn visit_values<'a, F: FnMut(&str, UniformValue<'a>)>(&'a self, mut visit: F) {
        visit("eye", UniformValue::Vec3(self.camera.eye));
        visit("dir", UniformValue::Vec3(self.camera.dir));
        visit("up", UniformValue::Vec3(self.camera.up));
        visit(self.image_name, self.image.as_uniform_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_covers_the_image() {
        assert_eq!(dispatch_size(1024, 8), 128);
        assert_eq!(dispatch_size(1000, 16), 63);
        assert_eq!(dispatch_size(1024, 1), 1024);
        assert_eq!(dispatch_size(7, 8), 1);
    }

    #[test]
    fn zero_workgroup_size_acts_as_one() {
        assert_eq!(dispatch_size(64, 0), 64);
    }

    #[test]
    fn empty_image_needs_no_groups() {
        assert_eq!(dispatch_size(0, 8), 0);
    }

    #[test]
    fn huge_sizes_do_not_overflow() {
        assert_eq!(dispatch_size(u32::MAX, u32::MAX), 1);
        assert_eq!(dispatch_size(1024, u32::MAX), 1);
        assert_eq!(dispatch_size(u32::MAX, 8), 1 << 29);
        assert_eq!(dispatch_size(u32::MAX, 1), u32::MAX);
    }
}
