//! Linear radiance to 8-bit sRGB-ish output.

use crate::renderer::ImageBuffer;
use image::{Rgb, RgbImage};

/// Gamma applied after exposure normalization.
const GAMMA: f32 = 2.2;

/// Pixels brighter than this fraction of the image are clipped to white.
const REFERENCE_PERCENTILE: f64 = 0.99;

/// Map a radiance image to 8-bit RGB.
///
/// Exposure is set so the 99th percentile of per-pixel peak channel maps to
/// full white. An image whose reference is zero or not finite comes out black.
pub fn tonemap(hdr: &ImageBuffer) -> RgbImage {
    let mut peaks: Vec<f32> = hdr.pixels.iter().map(|c| c.max_element()).collect();
    if peaks.is_empty() {
        return RgbImage::new(hdr.width, hdr.height);
    }
    peaks.sort_unstable_by(f32::total_cmp);

    let index = ((peaks.len() as f64 * REFERENCE_PERCENTILE) as usize).min(peaks.len() - 1);
    let reference = peaks[index];
    log::info!("Tonemap: min={} 99%={}", peaks[0], reference);

    let scale = if reference > 0.0 && reference.is_finite() {
        reference.recip()
    } else {
        0.0
    };
    RgbImage::from_fn(hdr.width, hdr.height, |x, y| {
        let c = hdr.get(x, y) * scale;
        Rgb([encode(c.x), encode(c.y), encode(c.z)])
    })
}

fn encode(value: f32) -> u8 {
    // Also rejects NaN
    if !(value > 0.0) {
        return 0;
    }
    (value.powf(GAMMA.recip()) * 255.0).round().min(255.0) as u8
}
