//! Render targets and the per-pixel depth test and color merge primitives

use std::ops::Range;

use nalgebra::Vector4;
use smallvec::SmallVec;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Dimensions, HasDimensions};
use crate::pixels::{Buffer2D, BufferBand, PixelBuffer, PixelFormat, PixelRead, PixelWrite};
use crate::shader::FragmentOutput;
use crate::{FAR_DEPTH, MAX_MRT_COUNT, MSAA_SAMPLES};

/// Storage format of every color target
pub const COLOR_FORMAT: PixelFormat = PixelFormat::RgbaF32;

/// Storage format of every depth buffer
pub const DEPTH_FORMAT: PixelFormat = PixelFormat::F32;

/// The set of buffers draws write into.
///
/// There is always a single-sample depth buffer and `1..=MAX_MRT_COUNT` single-sample color buffers.
/// With MSAA enabled a parallel set of 4-sample buffers is allocated, and those become the only
/// buffers written by draws until they are resolved.
#[derive(Debug, Clone)]
pub struct RenderTargets {
    dimensions: Dimensions,
    depth: Buffer2D,
    colors: SmallVec<[Buffer2D; MAX_MRT_COUNT]>,
    msaa_depth: Option<Buffer2D>,
    msaa_colors: SmallVec<[Buffer2D; MAX_MRT_COUNT]>,
}

impl RenderTargets {
    /// Allocates the depth buffer and `color_count` color buffers, plus their 4-sample variants if `msaa` is set.
    ///
    /// Every depth sample starts at the far plane and every color sample at transparent black.
    pub fn new(width: u32, height: u32, color_count: usize, msaa: bool) -> RenderResult<RenderTargets> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions(width, height));
        }

        if color_count == 0 || color_count > MAX_MRT_COUNT {
            return Err(RenderError::InvalidTargetCount(color_count, MAX_MRT_COUNT));
        }

        debug!("Allocating {}x{} render target with {} color buffer(s), msaa: {}", width, height, color_count, msaa);

        let samples = MSAA_SAMPLES as u32;

        let mut targets = RenderTargets {
            dimensions: Dimensions::new(width, height),
            depth: Buffer2D::new(width, height, DEPTH_FORMAT),
            colors: (0..color_count).map(|_| Buffer2D::new(width, height, COLOR_FORMAT)).collect(),
            msaa_depth: if msaa { Some(Buffer2D::with_samples(width, height, DEPTH_FORMAT, samples)) } else { None },
            msaa_colors: if msaa {
                (0..color_count).map(|_| Buffer2D::with_samples(width, height, COLOR_FORMAT, samples)).collect()
            } else {
                SmallVec::new()
            },
        };

        targets.clear(Vector4::zeros());

        Ok(targets)
    }

    #[inline]
    pub fn color_count(&self) -> usize { self.colors.len() }

    /// True if multi-sample buffers are allocated
    #[inline]
    pub fn is_msaa(&self) -> bool { self.msaa_depth.is_some() }

    /// Resets every color buffer to `color` and every depth buffer to the far plane,
    /// single and multi-sample storage alike.
    pub fn clear(&mut self, color: Vector4<f32>) {
        let far = Vector4::new(FAR_DEPTH, 0.0, 0.0, 0.0);

        self.depth.clear(far);

        if let Some(ref mut depth) = self.msaa_depth {
            depth.clear(far);
        }

        for buffer in self.colors.iter_mut().chain(self.msaa_colors.iter_mut()) {
            buffer.clear(color);
        }
    }

    /// Single-sample color buffer `index`
    pub fn color(&self, index: usize) -> RenderResult<&Buffer2D> {
        self.colors.get(index).ok_or(RenderError::InvalidTargetIndex(index))
    }

    /// Single-sample depth buffer
    #[inline]
    pub fn depth(&self) -> &Buffer2D { &self.depth }

    /// Multi-sample color buffer `index`
    pub fn msaa_color(&self, index: usize) -> RenderResult<&Buffer2D> {
        if !self.is_msaa() {
            return Err(RenderError::MsaaDisabled);
        }

        self.msaa_colors.get(index).ok_or(RenderError::InvalidTargetIndex(index))
    }

    /// Multi-sample depth buffer
    pub fn msaa_depth(&self) -> RenderResult<&Buffer2D> {
        self.msaa_depth.as_ref().ok_or(RenderError::MsaaDisabled)
    }

    /// Borrows all single-sample buffers as one band
    pub fn single_band_mut(&mut self) -> TargetBand<'_> {
        TargetBand::new(&mut self.depth, &mut self.colors)
    }

    /// Borrows all multi-sample buffers as one band
    pub fn msaa_band_mut(&mut self) -> RenderResult<TargetBand<'_>> {
        match self.msaa_depth {
            Some(ref mut depth) => Ok(TargetBand::new(depth, &mut self.msaa_colors)),
            None => Err(RenderError::MsaaDisabled),
        }
    }

    fn draw_buffers(&mut self) -> (&mut Buffer2D, &mut [Buffer2D]) {
        match self.msaa_depth {
            Some(ref mut depth) => (depth, &mut self.msaa_colors[..]),
            None => (&mut self.depth, &mut self.colors[..]),
        }
    }

    /// Borrows the buffers draws write into, the multi-sample ones if allocated.
    pub fn draw_band_mut(&mut self) -> TargetBand<'_> {
        let (depth, colors) = self.draw_buffers();

        TargetBand::new(depth, colors)
    }

    /// Splits the buffers draws write into into disjoint bands of `rows` rows each, bottom first.
    pub fn draw_bands_mut(&mut self, rows: u32) -> Vec<TargetBand<'_>> {
        let (depth, colors) = self.draw_buffers();

        let mut color_bands: SmallVec<[_; MAX_MRT_COUNT]> = colors.iter_mut()
            .map(|buffer| buffer.bands_mut(rows).into_iter())
            .collect();

        depth.bands_mut(rows).into_iter().map(|depth| {
            TargetBand {
                depth,
                colors: color_bands.iter_mut().filter_map(Iterator::next).collect(),
            }
        }).collect()
    }

    /// Reduces the multi-sample buffers into the single-sample ones.
    ///
    /// Colors are the mean of the 4 samples and depth the nearest sample.
    /// Does nothing without MSAA, and resolving again without drawing gives the same result.
    pub fn resolve(&mut self) {
        let RenderTargets { ref mut depth, ref mut colors, ref msaa_depth, ref msaa_colors, .. } = *self;

        let msaa_depth = match *msaa_depth {
            Some(ref msaa_depth) => msaa_depth,
            None => return,
        };

        debug!("Resolving {}x{} MSAA buffers", depth.width(), depth.height());

        resolve_buffer(msaa_depth, depth, |samples| {
            let nearest = samples.iter().fold(FAR_DEPTH, |nearest, sample| nearest.min(sample.x));

            Vector4::new(nearest, 0.0, 0.0, 0.0)
        });

        for (source, target) in msaa_colors.iter().zip(colors.iter_mut()) {
            resolve_buffer(source, target, |samples| {
                samples.iter().fold(Vector4::zeros(), |sum, sample| sum + sample) / MSAA_SAMPLES as f32
            });
        }
    }
}

impl HasDimensions for RenderTargets {
    #[inline]
    fn dimensions(&self) -> Dimensions { self.dimensions }
}

fn resolve_buffer<F>(source: &Buffer2D, target: &mut Buffer2D, reduce: F)
    where F: Fn(&[Vector4<f32>; MSAA_SAMPLES]) -> Vector4<f32> {
    debug_assert_eq!(source.dimensions(), target.dimensions());

    for index in 0..target.dimensions().area() {
        let mut samples = [Vector4::zeros(); MSAA_SAMPLES];

        for (sample, value) in samples.iter_mut().enumerate() {
            *value = source.get_sample(index, sample as u32);
        }

        target.set_sample(index, 0, &reduce(&samples));
    }
}

/// Exclusive view of the same rows of a depth buffer and its color buffers.
///
/// Coordinates are those of the whole target, and must fall inside `row_range`.
#[derive(Debug)]
pub struct TargetBand<'a> {
    depth: BufferBand<'a>,
    colors: SmallVec<[BufferBand<'a>; MAX_MRT_COUNT]>,
}

impl<'a> TargetBand<'a> {
    fn new(depth: &'a mut Buffer2D, colors: &'a mut [Buffer2D]) -> TargetBand<'a> {
        TargetBand {
            depth: depth.band_mut(),
            colors: colors.iter_mut().map(Buffer2D::band_mut).collect(),
        }
    }

    /// Samples per pixel of every buffer in the band
    #[inline]
    pub fn samples(&self) -> u32 { self.depth.samples() }

    #[inline]
    pub fn row_range(&self) -> Range<u32> { self.depth.row_range() }

    /// Passes if `depth` is nearer than the stored sample, in which case it replaces it.
    #[inline]
    pub fn depth_test_and_override(&mut self, x: u32, y: u32, sample: u32, depth: f32) -> bool {
        let stored = self.depth.scalar_at(x, y, sample);

        if depth < stored {
            self.depth.set_sample_at(x, y, sample, &Vector4::new(depth, 0.0, 0.0, 0.0));
            true
        } else {
            false
        }
    }

    /// Replaces the samples selected by `mask` in each bound color buffer with the matching fragment output.
    ///
    /// Outputs beyond the number of bound buffers are ignored.
    pub fn output_and_merge_color(&mut self, x: u32, y: u32, output: &FragmentOutput, mask: u32) {
        let samples = self.samples();

        for (band, color) in self.colors.iter_mut().zip(output.iter()) {
            for sample in (0..samples).filter(|sample| mask & (1u32 << *sample) != 0) {
                band.set_sample_at(x, y, sample, color);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use nalgebra::Vector4;

    use crate::error::RenderError;
    use crate::shader::FragmentOutput;

    use super::*;

    fn output(color: Vector4<f32>) -> FragmentOutput {
        let mut output = FragmentOutput::new();
        output.push(color).unwrap();
        output
    }

    #[test]
    fn test_invalid_configurations() {
        assert_eq!(RenderTargets::new(0, 10, 1, false).unwrap_err(), RenderError::InvalidDimensions(0, 10));
        assert_eq!(RenderTargets::new(10, 10, 0, false).unwrap_err(), RenderError::InvalidTargetCount(0, MAX_MRT_COUNT));
        assert_eq!(RenderTargets::new(10, 10, 5, true).unwrap_err(), RenderError::InvalidTargetCount(5, MAX_MRT_COUNT));
    }

    #[test]
    fn test_depth_test_is_less() {
        let mut targets = RenderTargets::new(4, 4, 1, false).unwrap();
        let mut band = targets.single_band_mut();

        assert!(band.depth_test_and_override(1, 1, 0, 0.5));
        assert!(!band.depth_test_and_override(1, 1, 0, 0.5));
        assert!(!band.depth_test_and_override(1, 1, 0, 0.75));
        assert!(band.depth_test_and_override(1, 1, 0, 0.25));
        assert!(!band.depth_test_and_override(2, 2, 0, FAR_DEPTH));
        drop(band);

        assert_eq!(targets.depth().read(1, 1).unwrap().x, 0.25);
    }

    #[test]
    fn test_masked_merge() {
        let mut targets = RenderTargets::new(2, 2, 2, true).unwrap();
        let white = Vector4::new(1.0, 1.0, 1.0, 1.0);

        targets.msaa_band_mut().unwrap().output_and_merge_color(0, 0, &output(white), 0b0101);

        let msaa = targets.msaa_color(0).unwrap();

        assert_eq!(msaa.read_sample(0, 0, 0).unwrap(), white);
        assert_eq!(msaa.read_sample(0, 0, 1).unwrap(), Vector4::zeros());
        assert_eq!(msaa.read_sample(0, 0, 2).unwrap(), white);

        // only one output, so the second target is untouched
        assert_eq!(targets.msaa_color(1).unwrap().read_sample(0, 0, 0).unwrap(), Vector4::zeros());
    }

    #[test]
    fn test_resolve_averages_color_and_keeps_nearest_depth() {
        let mut targets = RenderTargets::new(1, 1, 1, true).unwrap();
        let red = Vector4::new(1.0, 0.0, 0.0, 1.0);

        {
            let mut band = targets.msaa_band_mut().unwrap();

            band.output_and_merge_color(0, 0, &output(red), 0b0011);
            band.depth_test_and_override(0, 0, 1, 0.5);
            band.depth_test_and_override(0, 0, 3, 0.25);
        }

        targets.resolve();

        let resolved = targets.color(0).unwrap().read(0, 0).unwrap();

        assert_eq!(resolved, Vector4::new(0.5, 0.0, 0.0, 0.5));
        assert_eq!(targets.depth().read(0, 0).unwrap().x, 0.25);

        targets.resolve();

        assert_eq!(targets.color(0).unwrap().read(0, 0).unwrap(), resolved);
    }

    #[test]
    fn test_draw_bands_split_every_buffer() {
        let mut targets = RenderTargets::new(3, 5, 2, false).unwrap();

        let bands = targets.draw_bands_mut(2);

        assert_eq!(bands.len(), 3);
        assert!(bands.iter().all(|band| band.colors.len() == 2));
        assert_eq!(bands[2].row_range(), 4..5);
    }

    #[test]
    fn test_clear_resets_msaa_storage() {
        let mut targets = RenderTargets::new(2, 2, 1, true).unwrap();
        let red = Vector4::new(1.0, 0.0, 0.0, 1.0);
        let blue = Vector4::new(0.0, 0.0, 1.0, 1.0);

        {
            let mut band = targets.draw_band_mut();

            band.depth_test_and_override(1, 1, 2, 0.5);
            band.output_and_merge_color(1, 1, &output(red), 0b1111);
        }

        targets.clear(blue);

        for sample in 0..MSAA_SAMPLES as u32 {
            assert_eq!(targets.msaa_depth().unwrap().read_sample(1, 1, sample).unwrap().x, FAR_DEPTH);
            assert_eq!(targets.msaa_color(0).unwrap().read_sample(1, 1, sample).unwrap(), blue);
        }

        let single = RenderTargets::new(2, 2, 1, false).unwrap();

        assert_eq!(single.msaa_depth().unwrap_err(), RenderError::MsaaDisabled);
    }
}
