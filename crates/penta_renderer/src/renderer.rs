//! Multithreaded tile renderer.
//!
//! The image is cut into buckets and each bucket gets its own random stream
//! split off the caller's sampler before any work starts. Which thread
//! renders which bucket therefore has no effect on the result: a render is
//! reproducible from its seed for any thread count.

use crate::bucket::{generate_buckets, BucketResult, TileQueue, DEFAULT_BUCKET_SIZE};
use crate::error::RenderError;
use crate::{Camera, Sampler, Scene, Spectrum};
use rayon::ThreadPoolBuilder;
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel, stratified over the whole pixel
    pub samples_per_pixel: u32,
    /// Maximum number of bounces or scattering events per path
    pub max_depth: u32,
    /// Worker threads; 1 renders on the calling thread
    pub n_threads: usize,
    /// Edge length of the square buckets
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            max_depth: 5,
            n_threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

/// Mean radiance over a pixel.
///
/// Samples are jittered inside the cells of a sub-pixel grid that always
/// covers the full pixel; see [`sub_pixel_offset`].
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    sampler: &mut Sampler,
) -> Spectrum {
    let samples = config.samples_per_pixel.max(1);
    let mut pixel = Spectrum::ZERO;
    for i in 0..samples {
        let (sub_x, sub_y) = sub_pixel_offset(i, samples, sampler);
        let ray = camera.ray_at(x as f32 + sub_x, y as f32 + sub_y);
        pixel += scene.trace(&ray, sampler, config.max_depth);
    }
    pixel / samples as f32
}

/// Jittered position in `[0, 1)²` of sample `i` out of `samples`.
///
/// The grid has `ceil(sqrt(samples))` columns and just enough rows to hold
/// every sample. A short last row gets wider cells, so the rows together
/// span the pixel whatever the sample count.
fn sub_pixel_offset(i: u32, samples: u32, sampler: &mut Sampler) -> (f32, f32) {
    let cols = (samples as f32).sqrt().ceil() as u32;
    let rows = samples.div_ceil(cols);
    let row = i / cols;
    let in_row = if row + 1 == rows { samples - row * cols } else { cols };

    let sub_x = ((i % cols) as f32 + sampler.uniform(0.0, 1.0)) / in_row as f32;
    let sub_y = (row as f32 + sampler.uniform(0.0, 1.0)) / rows as f32;
    (sub_x, sub_y)
}

/// Linear radiance image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Spectrum>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Spectrum::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Spectrum {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Spectrum) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(bucket.x + i % bucket.width, bucket.y + i / bucket.width, *color);
        }
    }

    /// Floating point RGB copy for HDR encoders.
    pub fn to_rgb32f(&self) -> image::Rgb32FImage {
        image::Rgb32FImage::from_fn(self.width, self.height, |x, y| {
            let c = self.get(x, y);
            image::Rgb([c.x, c.y, c.z])
        })
    }
}

impl Camera {
    /// Render the scene into a linear radiance image.
    ///
    /// The scene must be finalized. `sampler` advances by one split.
    pub fn render(&self, scene: &Scene, sampler: &mut Sampler, config: &RenderConfig) -> Result<ImageBuffer, RenderError> {
        if config.n_threads == 0 {
            return Err(RenderError::NoThreads);
        }
        if config.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }

        let start = Instant::now();
        let queue = TileQueue::new(generate_buckets(self.width, self.height, config.bucket_size), sampler);
        log::info!("Distributing {} tiles into {} threads", queue.len(), config.n_threads);

        let results: Vec<BucketResult> = if config.n_threads == 1 {
            queue.drain(self, scene, config)
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.n_threads)
                .thread_name(|i| format!("penta-render-{i}"))
                .build()
                .map_err(|source| RenderError::ThreadPool {
                    threads: config.n_threads,
                    source,
                })?;
            pool.broadcast(|_| queue.drain(self, scene, config))
                .into_iter()
                .flatten()
                .collect()
        };

        let mut image = ImageBuffer::new(self.width, self.height);
        for result in &results {
            image.write_bucket(result);
        }

        log::info!(
            "Rendered {}x{} at {} spp in {:.2?}",
            self.width,
            self.height,
            config.samples_per_pixel,
            start.elapsed()
        );
        Ok(image)
    }
}
