//! `pentatope`: render a JSON task (or the builtin cornell tesseract) to PNG,
//! optionally keeping the linear radiance as Radiance HDR.

mod cli;
mod logger;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::codecs::hdr::HdrEncoder;
use penta_loader::{build_render_task, cornell_task, load_render_task, RenderTask};
use penta_renderer::{tonemap, ImageBuffer, Sampler};

use crate::cli::Args;
use crate::logger::init_logger;

/// Samples per pixel for --cornell when -s is not given.
const CORNELL_SAMPLES: u32 = 16;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let start = Instant::now();
    let mut task = load_task(args)?;
    apply_overrides(&mut task, args);
    log::info!(
        "Loaded task in {:.2?}: {}x{}, {} spp, depth {}, seed {}",
        start.elapsed(),
        task.camera.width,
        task.camera.height,
        task.config.samples_per_pixel,
        task.config.max_depth,
        task.seed
    );

    let mut sampler = Sampler::new(task.seed);
    let hdr = task
        .camera
        .render(&task.scene, &mut sampler, &task.config)
        .context("render failed")?;

    let ldr = tonemap(&hdr);
    ldr.save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    log::info!("Wrote {}", args.output.display());

    if let Some(path) = &args.hdr {
        write_hdr(path, &hdr)?;
        log::info!("Wrote {}", path.display());
    }

    log::info!("Total time: {:.2?}", start.elapsed());
    Ok(())
}

fn load_task(args: &Args) -> Result<RenderTask> {
    if args.cornell {
        let desc = cornell_task(args.width, args.height, args.samples.unwrap_or(CORNELL_SAMPLES));
        return build_render_task(&desc).context("failed to build the cornell tesseract");
    }
    // clap guarantees a task path whenever --cornell is absent
    let path = args.task.as_deref().context("no render task given")?;
    load_render_task(path).with_context(|| format!("failed to load render task {}", path.display()))
}

fn apply_overrides(task: &mut RenderTask, args: &Args) {
    if let Some(samples) = args.samples {
        task.config.samples_per_pixel = samples;
    }
    if let Some(depth) = args.max_depth {
        task.config.max_depth = depth;
    }
    if let Some(threads) = args.threads {
        task.config.n_threads = threads;
    }
    if let Some(seed) = args.seed {
        task.seed = seed;
    }
}

fn write_hdr(path: &Path, image: &ImageBuffer) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let pixels: Vec<_> = image.to_rgb32f().pixels().copied().collect();
    HdrEncoder::new(BufWriter::new(file))
        .encode(&pixels, image.width as usize, image.height as usize)
        .with_context(|| format!("failed to encode {}", path.display()))
}
