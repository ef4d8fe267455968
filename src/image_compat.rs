//! Conversion of color buffers into `image` crate images

use image::RgbaImage;

use crate::pixels::format::unorm8;
use crate::pixels::{Buffer2D, PixelRead};

impl Buffer2D {
    /// Copies the first sample of every pixel into an 8-bit RGBA image, clamping each channel.
    ///
    /// Image rows go top to bottom, so the buffer is flipped vertically.
    /// Returns `None` for buffers without any pixels.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        if !self.is_valid() {
            return None;
        }

        let (width, height) = (self.width(), self.height());

        let mut res = Vec::with_capacity(width as usize * height as usize * 4);

        for y in (0..height).rev() {
            for x in 0..width {
                let color = self.get_sample(y as usize * width as usize + x as usize, 0);

                res.extend(color.iter().cloned().map(unorm8));
            }
        }

        RgbaImage::from_raw(width, height, res)
    }
}

#[cfg(test)]
mod test {
    use nalgebra::Vector4;

    use crate::pixels::{Buffer2D, PixelFormat};

    #[test]
    fn test_image_is_flipped() {
        let mut buffer = Buffer2D::new(2, 2, PixelFormat::RgbaF32);

        buffer.write(0, 0, Vector4::new(1.0, 0.0, 0.0, 1.0)).unwrap();

        let image = buffer.to_rgba_image().unwrap();

        assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_image_channels_are_clamped() {
        let mut buffer = Buffer2D::new(1, 1, PixelFormat::RgbaF32);

        buffer.write(0, 0, Vector4::new(2.0, -1.0, 0.5, 1.0)).unwrap();

        assert_eq!(buffer.to_rgba_image().unwrap().get_pixel(0, 0).0, [255, 0, 128, 255]);
    }
}
