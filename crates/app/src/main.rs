//! Entry point for Tessera: load OBJ meshes and report what the GPU would receive.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{DEFAULT_RES_DIR, ModelData};

/// What to load, gathered from the command line.
#[derive(Debug, Default, PartialEq)]
struct Options {
    paths: Vec<PathBuf>,
    res_dir: Option<PathBuf>,
    models: Vec<String>,
    dump_indices: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Options {
    // Accept: <file.obj>... --res-dir=<dir> --model=<name> --dump-indices
    let mut opts = Options::default();
    for arg in args {
        if let Some(val) = arg.strip_prefix("--res-dir=") {
            opts.res_dir = Some(PathBuf::from(val));
        } else if let Some(val) = arg.strip_prefix("--model=") {
            opts.models.push(val.to_owned());
        } else if arg == "--dump-indices" {
            opts.dump_indices = true;
        } else if arg.starts_with("--") {
            log::warn!("Unknown flag '{}', ignoring.", arg);
        } else {
            opts.paths.push(PathBuf::from(arg));
        }
    }
    opts
}

fn report(label: &str, data: &ModelData, dump_indices: bool) {
    log::info!(
        "{}: {} vertices, {} triangles, bounding radius {:.4}, {} bytes interleaved",
        label,
        data.vertex_count(),
        data.face_count(),
        data.bounding_radius,
        data.interleaved_bytes().len()
    );
    if dump_indices {
        log::info!("{} indices: {:?}", label, data.indices);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = parse_args(std::env::args().skip(1));
    if opts.paths.is_empty() && opts.models.is_empty() {
        log::warn!("Nothing to load. Usage: tessera <file.obj>... [--res-dir=<dir>] [--model=<name>] [--dump-indices]");
        return Ok(());
    }

    for path in &opts.paths {
        let data = asset::load_obj_from_path(path)
            .with_context(|| format!("Failed to load mesh {}", path.display()))?;
        report(&path.display().to_string(), &data, opts.dump_indices);
    }

    let res_dir = opts
        .res_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RES_DIR));
    for name in &opts.models {
        let data = asset::load_obj_resource(&res_dir, name)
            .with_context(|| format!("Failed to load model '{}' from {}", name, res_dir.display()))?;
        report(name, &data, opts.dump_indices);
    }

    Ok(())
}
