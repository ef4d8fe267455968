//! Typed 2D sample storage and pixel accessor structures

use nalgebra::Vector4;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Coordinate, HasDimensions};

pub mod format;
pub mod buffer;
pub mod band;

pub use self::format::PixelFormat;
pub use self::buffer::Buffer2D;
pub use self::band::BufferBand;

/// Generic buffer type trait, which defines how samples are stored
pub trait PixelBuffer: Sized + HasDimensions {
    /// Storage format of every sample
    fn format(&self) -> PixelFormat;

    /// Number of samples per pixel, `1` or `MSAA_SAMPLES`
    fn samples(&self) -> u32;
}

/// Defines methods for reading sample values.
pub trait PixelRead: PixelBuffer {
    /// Reads a sample at a pixel index local to this buffer.
    ///
    /// Panics if the index or sample is out of range. Please use
    /// `pixel_ref` to access pixel values with bounds checking.
    fn get_sample(&self, index: usize, sample: u32) -> Vector4<f32>;

    /// Get a "reference" to the pixel at the given coordinate.
    ///
    /// Returns `RenderError::InvalidBuffer` for empty buffers and
    /// `RenderError::InvalidPixelCoordinate` on invalid pixel coordinates.
    fn pixel_ref(&self, coord: Coordinate) -> RenderResult<PixelRef<'_, Self>> {
        let dim = self.dimensions();

        if dim.is_empty() {
            Err(RenderError::InvalidBuffer)
        } else if dim.in_bounds(coord) {
            Ok(PixelRef::new(coord.into_index(dim), self))
        } else {
            Err(RenderError::InvalidPixelCoordinate)
        }
    }
}

/// Defines methods for writing sample values.
pub trait PixelWrite: PixelRead {
    /// Writes a sample at a pixel index local to this buffer, panicking when out of range.
    fn set_sample(&mut self, index: usize, sample: u32, color: &Vector4<f32>);

    /// Get a mutable "reference" to the pixel at the given coordinate.
    ///
    /// Returns the same errors as `pixel_ref`.
    fn pixel_mut(&mut self, coord: Coordinate) -> RenderResult<PixelMut<'_, Self>> {
        let dim = self.dimensions();

        if dim.is_empty() {
            Err(RenderError::InvalidBuffer)
        } else if dim.in_bounds(coord) {
            Ok(PixelMut::new(coord.into_index(dim), self))
        } else {
            Err(RenderError::InvalidPixelCoordinate)
        }
    }
}

/// Immutable reference to a pixel.
///
/// Provides a read-only accessor for the pixel at the coordinates given at creation.
pub struct PixelRef<'a, T: 'a>(usize, &'a T) where T: PixelRead;

/// Mutable reference to a pixel
///
/// Provides a writable accessor for the pixel at the coordinates given at creation.
pub struct PixelMut<'a, T: 'a>(usize, &'a mut T) where T: PixelWrite;

impl<'a, T: 'a> PixelRef<'a, T> where T: PixelRead {
    #[inline(always)]
    pub(crate) fn new(index: usize, buffer: &'a T) -> PixelRef<'a, T> {
        PixelRef(index, buffer)
    }

    /// Get the first sample of the pixel
    #[inline]
    pub fn get(&self) -> Vector4<f32> {
        self.1.get_sample(self.0, 0)
    }

    /// Get a single sample of the pixel
    pub fn sample(&self, sample: u32) -> RenderResult<Vector4<f32>> {
        check_sample(self.1.samples(), sample)?;

        Ok(self.1.get_sample(self.0, sample))
    }
}

impl<'a, T: 'a> PixelMut<'a, T> where T: PixelWrite {
    #[inline(always)]
    pub(crate) fn new(index: usize, buffer: &'a mut T) -> PixelMut<'a, T> {
        PixelMut(index, buffer)
    }

    /// Get the first sample of the pixel
    #[inline]
    pub fn get(&self) -> Vector4<f32> {
        self.1.get_sample(self.0, 0)
    }

    /// Set every sample of the pixel
    pub fn set(&mut self, color: Vector4<f32>) {
        for sample in 0..self.1.samples() {
            self.1.set_sample(self.0, sample, &color);
        }
    }

    /// Set a single sample of the pixel
    pub fn set_sample(&mut self, sample: u32, color: Vector4<f32>) -> RenderResult<()> {
        check_sample(self.1.samples(), sample)?;

        self.1.set_sample(self.0, sample, &color);

        Ok(())
    }
}

#[inline]
fn check_sample(samples: u32, sample: u32) -> RenderResult<()> {
    if sample < samples { Ok(()) } else { Err(RenderError::InvalidSampleIndex(sample, samples)) }
}

/// Byte offset of a sample within row-major, sample-interleaved storage
#[inline(always)]
pub(crate) fn sample_offset(index: usize, sample: u32, samples: u32, bytes: usize) -> usize {
    (index * samples as usize + sample as usize) * bytes
}
