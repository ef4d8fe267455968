//! Fragment stage: per-sample depth testing, pixel shading and merging into the targets.
//!
//! The depth test always runs before the pixel shader, so hidden fragments are never shaded.

use crate::framebuffer::TargetBand;
use crate::pipeline::DrawState;
use crate::shader::{FragmentInput, FragmentOutput};
use crate::stats::RenderStats;
use crate::MSAA_SAMPLES;

use super::rasterization::Triangle;

/// Offset of the single sample of a pixel
pub const PIXEL_CENTER: (f64, f64) = (0.5, 0.5);

/// Offsets of the 4x MSAA samples within a pixel, in a rotated grid
pub const MSAA_SAMPLE_POSITIONS: [(f64, f64); MSAA_SAMPLES] = [
    (0.375, 0.125),
    (0.875, 0.375),
    (0.125, 0.625),
    (0.625, 0.875),
];

/// How often the pixel shader runs for multi-sampled pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsaaShading {
    /// Once for every sample that passes the depth test, at that sample's position
    PerSample,
    /// Once per pixel, with the result written to every sample that passed the depth test.
    ///
    /// Attributes are taken at the pixel center, or at the first passing sample if the center is not covered.
    PerPixel,
}

impl Default for MsaaShading {
    fn default() -> MsaaShading { MsaaShading::PerSample }
}

#[inline(always)]
fn sample_position(x: u32, y: u32, offset: (f64, f64)) -> (f64, f64) {
    (x as f64 + offset.0, y as f64 + offset.1)
}

/// Interpolates the depth at a covered sample and runs the depth test on it
#[inline]
fn test_sample(triangle: &Triangle, band: &mut TargetBand, x: u32, y: u32, sample: u32, weights: &[f32; 3], stats: &mut RenderStats) -> bool {
    let depth = triangle.depth(weights);

    // outside the depth range
    if !(0.0..=1.0).contains(&depth) {
        return false;
    }

    stats.samples_tested += 1;

    if band.depth_test_and_override(x, y, sample, depth) {
        stats.depth_passes += 1;
        true
    } else {
        false
    }
}

#[inline]
fn shade(triangle: &Triangle, state: &DrawState, weights: &[f32; 3], stats: &mut RenderStats) -> FragmentOutput {
    stats.pixel_shader_invocations += 1;

    let fragment = FragmentInput { attributes: triangle.attributes(weights) };

    state.pixel_shader.shade(&fragment, state.uniforms)
}

/// Shades a single-sample pixel at its center
pub fn shade_pixel(triangle: &Triangle, band: &mut TargetBand, state: &DrawState, x: u32, y: u32, stats: &mut RenderStats) {
    if let Some(values) = triangle.coverage(sample_position(x, y, PIXEL_CENTER)) {
        let weights = triangle.perspective_weights(values);

        if test_sample(triangle, band, x, y, 0, &weights, stats) {
            let output = shade(triangle, state, &weights, stats);

            band.output_and_merge_color(x, y, &output, 1);
        }
    }
}

/// Shades a 4x multi-sampled pixel, testing coverage and depth for each sample
pub fn shade_msaa_pixel(triangle: &Triangle, band: &mut TargetBand, state: &DrawState, x: u32, y: u32, stats: &mut RenderStats) {
    let mut mask = 0u32;
    let mut first_weights = None;

    for (sample, &offset) in MSAA_SAMPLE_POSITIONS.iter().enumerate() {
        let sample = sample as u32;

        let values = match triangle.coverage(sample_position(x, y, offset)) {
            Some(values) => values,
            None => continue,
        };

        let weights = triangle.perspective_weights(values);

        if !test_sample(triangle, band, x, y, sample, &weights, stats) {
            continue;
        }

        match state.msaa_shading {
            MsaaShading::PerSample => {
                let output = shade(triangle, state, &weights, stats);

                band.output_and_merge_color(x, y, &output, 1 << sample);
            }
            MsaaShading::PerPixel => {
                mask |= 1 << sample;
                first_weights.get_or_insert(weights);
            }
        }
    }

    if let Some(fallback) = first_weights {
        let weights = triangle.coverage(sample_position(x, y, PIXEL_CENTER))
            .map(|values| triangle.perspective_weights(values))
            .unwrap_or(fallback);

        let output = shade(triangle, state, &weights, stats);

        band.output_and_merge_color(x, y, &output, mask);
    }
}
