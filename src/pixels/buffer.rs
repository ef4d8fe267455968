//! Owned 2D sample storage

use nalgebra::Vector4;

use crate::error::RenderResult;
use crate::geometry::{Coordinate, Dimensions, HasDimensions};

use super::{sample_offset, BufferBand, PixelBuffer, PixelFormat, PixelRead, PixelWrite};

/// Contiguous 2D storage of samples in a fixed pixel format.
///
/// Pixels are row-major with row `0` at the bottom of the image,
/// and the samples of a multi-sampled pixel are stored next to each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer2D {
    dimensions: Dimensions,
    format: PixelFormat,
    samples: u32,
    data: Vec<u8>,
}

impl Buffer2D {
    /// Create a single-sample buffer with every byte zeroed
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Buffer2D {
        Buffer2D::with_samples(width, height, format, 1)
    }

    /// Create a buffer holding `samples` samples per pixel
    pub fn with_samples(width: u32, height: u32, format: PixelFormat, samples: u32) -> Buffer2D {
        let dimensions = Dimensions::new(width, height);

        Buffer2D {
            dimensions,
            format,
            samples,
            data: vec![0; dimensions.area() * samples as usize * format.bytes()],
        }
    }

    /// True if the buffer holds any pixels at all
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.dimensions.is_empty() && self.samples > 0
    }

    #[inline]
    pub fn width(&self) -> u32 { self.dimensions.width }

    #[inline]
    pub fn height(&self) -> u32 { self.dimensions.height }

    /// Raw sample bytes, laid out as described on the type
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { &self.data }

    /// Number of bytes in one row of pixels
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.dimensions.width as usize * self.samples as usize * self.format.bytes()
    }

    /// Reads the first sample of the pixel at `(x, y)` as RGBA
    pub fn read(&self, x: u32, y: u32) -> RenderResult<Vector4<f32>> {
        Ok(self.pixel_ref(Coordinate::new(x, y))?.get())
    }

    /// Reads a single sample of the pixel at `(x, y)` as RGBA
    pub fn read_sample(&self, x: u32, y: u32, sample: u32) -> RenderResult<Vector4<f32>> {
        self.pixel_ref(Coordinate::new(x, y))?.sample(sample)
    }

    /// Writes every sample of the pixel at `(x, y)`
    pub fn write(&mut self, x: u32, y: u32, color: Vector4<f32>) -> RenderResult<()> {
        self.pixel_mut(Coordinate::new(x, y))?.set(color);

        Ok(())
    }

    /// Sets every sample to the same value
    pub fn clear(&mut self, value: Vector4<f32>) {
        let bytes = self.format.bytes();

        if self.data.is_empty() {
            return;
        }

        let (first, rest) = self.data.split_at_mut(bytes);

        self.format.encode(&value, first);

        for chunk in rest.chunks_exact_mut(bytes) {
            chunk.copy_from_slice(first);
        }
    }

    /// Borrows the whole buffer as a single band
    pub fn band_mut(&mut self) -> BufferBand<'_> {
        let height = self.dimensions.height;

        BufferBand::new(&mut self.data, self.format, self.dimensions.width, self.samples, 0, height)
    }

    /// Splits the buffer into disjoint horizontal bands of `rows` rows each, bottom band first.
    /// The last band may be shorter.
    pub fn bands_mut(&mut self, rows: u32) -> Vec<BufferBand<'_>> {
        let stride = self.row_stride();

        if stride == 0 || self.dimensions.height == 0 {
            return Vec::new();
        }

        let rows = rows.max(1);

        let Buffer2D { ref mut data, format, samples, dimensions } = *self;

        data.chunks_mut(stride * rows as usize).enumerate().map(|(i, chunk)| {
            let band_rows = (chunk.len() / stride) as u32;

            BufferBand::new(chunk, format, dimensions.width, samples, i as u32 * rows, band_rows)
        }).collect()
    }
}

impl HasDimensions for Buffer2D {
    #[inline]
    fn dimensions(&self) -> Dimensions { self.dimensions }
}

impl PixelBuffer for Buffer2D {
    #[inline]
    fn format(&self) -> PixelFormat { self.format }

    #[inline]
    fn samples(&self) -> u32 { self.samples }
}

impl PixelRead for Buffer2D {
    #[inline]
    fn get_sample(&self, index: usize, sample: u32) -> Vector4<f32> {
        let bytes = self.format.bytes();
        let offset = sample_offset(index, sample, self.samples, bytes);

        self.format.decode(&self.data[offset..offset + bytes])
    }
}

impl PixelWrite for Buffer2D {
    #[inline]
    fn set_sample(&mut self, index: usize, sample: u32, color: &Vector4<f32>) {
        let bytes = self.format.bytes();
        let offset = sample_offset(index, sample, self.samples, bytes);

        self.format.encode(color, &mut self.data[offset..offset + bytes]);
    }
}

#[cfg(test)]
mod test {
    use nalgebra::Vector4;

    use crate::error::RenderError;

    use super::*;

    #[test]
    fn test_read_write() {
        let mut buffer = Buffer2D::new(4, 3, PixelFormat::RgbaF32);
        let red = Vector4::new(1.0, 0.0, 0.0, 1.0);

        buffer.write(3, 2, red).unwrap();

        assert_eq!(buffer.read(3, 2).unwrap(), red);
        assert_eq!(buffer.read(0, 0).unwrap(), Vector4::zeros());
        assert_eq!(buffer.read(4, 0).unwrap_err(), RenderError::InvalidPixelCoordinate);
    }

    #[test]
    fn test_empty_buffer_is_invalid() {
        let buffer = Buffer2D::new(0, 0, PixelFormat::Rgba8888);

        assert!(!buffer.is_valid());
        assert_eq!(buffer.read(0, 0).unwrap_err(), RenderError::InvalidBuffer);
    }

    #[test]
    fn test_clear_fills_every_sample() {
        let mut buffer = Buffer2D::with_samples(2, 2, PixelFormat::F32, 4);

        buffer.clear(Vector4::new(1.0, 0.0, 0.0, 0.0));

        for sample in 0..4 {
            assert_eq!(buffer.read_sample(1, 1, sample).unwrap().x, 1.0);
        }

        assert_eq!(buffer.read_sample(0, 0, 4).unwrap_err(), RenderError::InvalidSampleIndex(4, 4));
    }

    #[test]
    fn test_bands_cover_every_row() {
        let mut buffer = Buffer2D::new(3, 10, PixelFormat::Rgba8888);

        let bands = buffer.bands_mut(4);

        assert_eq!(bands.len(), 3);
        assert_eq!(bands.iter().map(|band| band.rows()).collect::<Vec<_>>(), vec![4, 4, 2]);
        assert_eq!(bands[2].first_row(), 8);
    }
}
