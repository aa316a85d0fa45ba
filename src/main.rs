mod app;
mod camera;
mod config;
mod consts;
mod float;
mod input;
mod quad;
mod screenshot;
mod shader;
mod stats;
mod tracer;

use std::path::Path;

use anyhow::{bail, Result};
use log::{error, LevelFilter};

use crate::config::Config;

fn load_config() -> Result<Config> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => Ok(Config::default()),
        [path] => Config::load(Path::new(path)),
        _ => bail!("Usage: raytracer [config.ron]"),
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("raytracer", LevelFilter::Info)
        .parse_default_env()
        .init();

    let result = load_config().and_then(app::run);
    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
