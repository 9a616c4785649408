//! Image tiles ("buckets") and the queue that hands them to render threads.
//!
//! Every bucket owns a random stream split off the render's sampler before
//! any work starts, so a bucket renders the same pixels whichever thread
//! picks it up.

use crate::renderer::render_pixel;
use crate::{Camera, RenderConfig, Sampler, Scene, Spectrum};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Edge length of a full bucket.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Pixel rectangle `[x, x + width) × [y, y + height)`; `index` is its
/// position in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Image coordinates of every pixel, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height).flat_map(move |py| (self.x..self.x + self.width).map(move |px| (px, py)))
    }

    fn center_distance_sq(&self, image_width: u32, image_height: u32) -> f32 {
        let dx = (self.x as f32 + self.width as f32 * 0.5) - image_width as f32 * 0.5;
        let dy = (self.y as f32 + self.height as f32 * 0.5) - image_height as f32 * 0.5;
        dx * dx + dy * dy
    }
}

/// Cover the image with `bucket_size` squares, clipping the last row and
/// column, ordered from the image center outwards.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    assert!(bucket_size > 0, "bucket size must be positive");

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(bucket_size as usize)
        .flat_map(|y| {
            (0..width).step_by(bucket_size as usize).map(move |x| {
                Bucket::new(x, y, bucket_size.min(width - x), bucket_size.min(height - y), 0)
            })
        })
        .collect();

    // Stable: equidistant buckets keep row-major order.
    buckets.sort_by(|a, b| {
        a.center_distance_sq(width, height)
            .total_cmp(&b.center_distance_sq(width, height))
    });
    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Radiance of every pixel in `bucket`, row-major.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    sampler: &mut Sampler,
) -> Vec<Spectrum> {
    bucket
        .pixels()
        .map(|(px, py)| render_pixel(camera, scene, px, py, config, sampler))
        .collect()
}

/// A finished bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Row-major, `bucket.pixel_count()` entries
    pub pixels: Vec<Spectrum>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Spectrum>) -> Self {
        Self { bucket, pixels }
    }
}

/// A bucket paired with the random stream reserved for it.
#[derive(Debug, Clone)]
pub struct TileJob {
    pub bucket: Bucket,
    pub sampler: Sampler,
}

/// Lock-free multi-consumer queue over a fixed list of jobs.
///
/// Jobs are handed out in order by an atomic cursor; each is taken exactly once.
#[derive(Debug)]
pub struct TileQueue {
    jobs: Vec<TileJob>,
    next: AtomicUsize,
}

impl TileQueue {
    /// Pairs each bucket with one stream split off `sampler`.
    pub fn new(buckets: Vec<Bucket>, sampler: &mut Sampler) -> Self {
        let samplers = sampler.split(buckets.len());
        let jobs = buckets
            .into_iter()
            .zip(samplers)
            .map(|(bucket, sampler)| TileJob { bucket, sampler })
            .collect();
        Self {
            jobs,
            next: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Take the next job, or `None` once every job has been handed out.
    pub fn pop(&self) -> Option<TileJob> {
        let index = self.next.fetch_add(1, Ordering::Relaxed);
        self.jobs.get(index).cloned()
    }

    /// Render jobs until the queue is drained.
    pub fn drain(&self, camera: &Camera, scene: &Scene, config: &RenderConfig) -> Vec<BucketResult> {
        let mut results = Vec::new();
        while let Some(mut job) = self.pop() {
            let pixels = render_bucket(&job.bucket, camera, scene, config, &mut job.sampler);
            results.push(BucketResult::new(job.bucket, pixels));
        }
        results
    }
}
