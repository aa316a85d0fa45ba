use std::path::Path;

use anyhow::{bail, Context, Result};
use glium::backend::Facade;
use glium::program::{ComputeShader, ProgramCreationError};
use glium::Program;
use log::{error, info, warn};

use crate::config::Config;

/// Read a whole shader source file
pub fn load_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read shader source {}", path.display()))
}

/// Print the driver info log of a failed compilation or link
fn report(err: &ProgramCreationError, name: &str) {
    match err {
        ProgramCreationError::CompilationError(info_log, ..) => {
            error!("Shader compilation failed ({})", name);
            error!("{}", info_log);
        }
        ProgramCreationError::LinkingError(info_log) => {
            error!("Shader program linking failed ({})", name);
            error!("{}", info_log);
        }
        other => error!("Failed to create shader program {}: {}", name, other),
    }
}

/// Compile and link the program that draws the trace image on screen
pub fn render_program<F: Facade>(facade: &F, config: &Config) -> Result<Program> {
    let vertex_path = config.vertex_path();
    let fragment_path = config.fragment_path();
    let vertex_src = load_source(&vertex_path)?;
    let fragment_src = load_source(&fragment_path)?;
    let name = format!("{} + {}", vertex_path.display(), fragment_path.display());
    Program::from_source(facade, &vertex_src, &fragment_src, None)
        .map_err(|err| {
            report(&err, &name);
            err
        })
        .with_context(|| format!("Failed to build render program from {}", name))
}

/// Name of the macro carrying the configured local size into the compute shader
pub const WORKGROUP_SIZE: &str = "WORKGROUP_SIZE";

/// Define the workgroup size right after the `#version` directive, or at the top if there is none.
/// A `#line` directive keeps the driver's error line numbers pointing at the file.
pub fn with_workgroup_size(src: &str, size: u32) -> String {
    let mut offset = 0;
    for (i, line) in src.split_inclusive('\n').enumerate() {
        offset += line.len();
        if line.trim_start().starts_with("#version") {
            let (head, tail) = src.split_at(offset);
            let newline = if head.ends_with('\n') { "" } else { "\n" };
            return format!(
                "{}{}#define {} {}\n#line {}\n{}",
                head,
                newline,
                WORKGROUP_SIZE,
                size,
                i + 2,
                tail
            );
        }
    }
    format!("#define {} {}\n#line 1\n{}", WORKGROUP_SIZE, size, src)
}

/// Compile and link the ray tracing compute program
pub fn compute_program<F: Facade>(facade: &F, config: &Config) -> Result<ComputeShader> {
    if !ComputeShader::is_supported(&**facade.get_context()) {
        bail!("Compute shaders are not supported by the OpenGL context");
    }
    let path = config.compute_path();
    let name = path.display().to_string();
    let src = load_source(&path)?;
    let size = config.workgroup_size.max(1);
    if !src.contains(WORKGROUP_SIZE) {
        warn!(
            "{} does not use {}, its local size must match workgroup_size {}",
            name, WORKGROUP_SIZE, size
        );
    }
    let src = with_workgroup_size(&src, size);
    ComputeShader::from_source(facade, &src)
        .map_err(|err| {
            report(&err, &name);
            err
        })
        .with_context(|| format!("Failed to build compute program from {}", name))
}

/// Programs used every frame
pub struct ShaderSet {
    pub render: Program,
    pub compute: ComputeShader,
}

impl ShaderSet {
    pub fn new<F: Facade>(facade: &F, config: &Config) -> Result<ShaderSet> {
        let render = render_program(facade, config)?;
        let compute = compute_program(facade, config)?;
        Ok(ShaderSet { render, compute })
    }

    /// Rebuild both programs from disk. The old programs stay in use if either fails.
    pub fn reload<F: Facade>(&mut self, facade: &F, config: &Config) {
        match ShaderSet::new(facade, config) {
            Ok(shaders) => {
                *self = shaders;
                info!("Reloaded shaders from {}", config.shader_dir.display());
            }
            Err(err) => error!("Shader reload failed, keeping previous programs: {:#}", err),
        }
    }
}
