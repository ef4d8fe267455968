//! Borrowed horizontal slices of a buffer

use std::ops::Range;

use nalgebra::Vector4;

use crate::geometry::{Dimensions, HasDimensions};

use super::{sample_offset, PixelBuffer, PixelFormat, PixelRead, PixelWrite};

/// A mutable view of consecutive rows of a [`Buffer2D`](struct.Buffer2D.html).
///
/// Bands of the same buffer never overlap, so each can be handed to a different thread.
/// The `*_at` accessors take coordinates of the parent buffer.
#[derive(Debug)]
pub struct BufferBand<'a> {
    data: &'a mut [u8],
    format: PixelFormat,
    width: u32,
    samples: u32,
    first_row: u32,
    rows: u32,
}

impl<'a> BufferBand<'a> {
    pub(crate) fn new(data: &'a mut [u8], format: PixelFormat, width: u32, samples: u32, first_row: u32, rows: u32) -> BufferBand<'a> {
        debug_assert_eq!(data.len(), width as usize * rows as usize * samples as usize * format.bytes());

        BufferBand { data, format, width, samples, first_row, rows }
    }

    /// First row of the parent buffer covered by this band
    #[inline]
    pub fn first_row(&self) -> u32 { self.first_row }

    #[inline]
    pub fn rows(&self) -> u32 { self.rows }

    /// Rows of the parent buffer covered by this band
    #[inline]
    pub fn row_range(&self) -> Range<u32> { self.first_row..self.first_row + self.rows }

    #[inline]
    fn local_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && self.row_range().contains(&y));

        (y - self.first_row) as usize * self.width as usize + x as usize
    }

    #[inline]
    fn bytes_at(&self, x: u32, y: u32, sample: u32) -> &[u8] {
        let bytes = self.format.bytes();
        let offset = sample_offset(self.local_index(x, y), sample, self.samples, bytes);

        &self.data[offset..offset + bytes]
    }

    /// Reads the first channel of a sample, at parent buffer coordinates
    #[inline]
    pub fn scalar_at(&self, x: u32, y: u32, sample: u32) -> f32 {
        self.format.decode_scalar(self.bytes_at(x, y, sample))
    }

    /// Reads a sample, at parent buffer coordinates
    #[inline]
    pub fn sample_at(&self, x: u32, y: u32, sample: u32) -> Vector4<f32> {
        self.format.decode(self.bytes_at(x, y, sample))
    }

    /// Writes a sample, at parent buffer coordinates
    #[inline]
    pub fn set_sample_at(&mut self, x: u32, y: u32, sample: u32, value: &Vector4<f32>) {
        let index = self.local_index(x, y);

        self.set_sample(index, sample, value);
    }
}

impl<'a> HasDimensions for BufferBand<'a> {
    #[inline]
    fn dimensions(&self) -> Dimensions { Dimensions::new(self.width, self.rows) }
}

impl<'a> PixelBuffer for BufferBand<'a> {
    #[inline]
    fn format(&self) -> PixelFormat { self.format }

    #[inline]
    fn samples(&self) -> u32 { self.samples }
}

impl<'a> PixelRead for BufferBand<'a> {
    #[inline]
    fn get_sample(&self, index: usize, sample: u32) -> Vector4<f32> {
        let bytes = self.format.bytes();
        let offset = sample_offset(index, sample, self.samples, bytes);

        self.format.decode(&self.data[offset..offset + bytes])
    }
}

impl<'a> PixelWrite for BufferBand<'a> {
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

    use crate::pixels::{Buffer2D, PixelFormat};

    #[test]
    fn test_band_writes_land_in_parent() {
        let mut buffer = Buffer2D::new(2, 4, PixelFormat::RgbaF32);
        let green = Vector4::new(0.0, 1.0, 0.0, 1.0);

        {
            let mut bands = buffer.bands_mut(2);
            let upper = &mut bands[1];

            assert_eq!(upper.row_range(), 2..4);

            upper.set_sample_at(1, 3, 0, &green);

            assert_eq!(upper.sample_at(1, 3, 0), green);
        }

        assert_eq!(buffer.read(1, 3).unwrap(), green);
        assert_eq!(buffer.read(1, 1).unwrap(), Vector4::zeros());
    }
}
