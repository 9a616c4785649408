use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pentatope")]
#[command(about = "Render a four-dimensional scene to a 2D image")]
pub struct Args {
    /// JSON render task
    #[arg(required_unless_present = "cornell", conflicts_with = "cornell")]
    pub task: Option<PathBuf>,

    /// Render the builtin cornell tesseract instead of a task file
    #[arg(long)]
    pub cornell: bool,

    /// Image width for --cornell
    #[arg(long, default_value = "200")]
    pub width: u32,

    /// Image height for --cornell
    #[arg(long, default_value = "200")]
    pub height: u32,

    /// Samples per pixel; overrides the task
    #[arg(long, short = 's', value_parser = clap::value_parser!(u32).range(1..))]
    pub samples: Option<u32>,

    /// Maximum path depth; overrides the task
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_depth: Option<u32>,

    /// Tonemapped 8-bit output
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Also write the linear radiance as a Radiance HDR file
    #[arg(long)]
    pub hdr: Option<PathBuf>,

    /// Worker threads (defaults to available parallelism)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// Random seed; overrides the task
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,
}
