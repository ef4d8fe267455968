//! Pixel formats and their encoding

use nalgebra::Vector4;
use num_traits::clamp;

/// Storage format of a buffer's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 16-bit unsigned normalized channel
    U16,
    /// Single 32-bit float channel, used for depth
    F32,
    /// 8-bit unsigned normalized red, green and blue
    Rgb888,
    /// 8-bit unsigned normalized red, green, blue and alpha
    Rgba8888,
    /// 32-bit float red, green and blue
    RgbF32,
    /// 32-bit float red, green, blue and alpha
    RgbaF32,
}

impl PixelFormat {
    /// Number of bytes taken by a single sample
    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            PixelFormat::U16 => 2,
            PixelFormat::F32 => 4,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Rgba8888 => 4,
            PixelFormat::RgbF32 => 12,
            PixelFormat::RgbaF32 => 16,
        }
    }

    /// Number of channels stored
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::U16 | PixelFormat::F32 => 1,
            PixelFormat::Rgb888 | PixelFormat::RgbF32 => 3,
            PixelFormat::Rgba8888 | PixelFormat::RgbaF32 => 4,
        }
    }

    /// Writes `value` into `out`, which must be exactly `bytes()` long.
    ///
    /// Single channel formats store `value.x`, formats without alpha drop `value.w`,
    /// and normalized integer formats clamp to `[0, 1]` first.
    pub fn encode(self, value: &Vector4<f32>, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.bytes());

        match self {
            PixelFormat::U16 => {
                let v = (clamp(value.x, 0.0, 1.0) * 65535.0).round() as u16;
                out.copy_from_slice(&v.to_ne_bytes());
            }
            PixelFormat::F32 => write_f32s(&[value.x], out),
            PixelFormat::Rgb888 | PixelFormat::Rgba8888 => {
                for (byte, channel) in out.iter_mut().zip(value.iter()) {
                    *byte = unorm8(*channel);
                }
            }
            PixelFormat::RgbF32 => write_f32s(&[value.x, value.y, value.z], out),
            PixelFormat::RgbaF32 => write_f32s(value.as_slice(), out),
        }
    }

    /// Reads a sample back as an RGBA float color.
    ///
    /// Single channel formats are replicated into red, green and blue,
    /// and formats without alpha read back as opaque.
    pub fn decode(self, bytes: &[u8]) -> Vector4<f32> {
        debug_assert_eq!(bytes.len(), self.bytes());

        match self {
            PixelFormat::U16 => {
                let v = u16::from_ne_bytes([bytes[0], bytes[1]]) as f32 / 65535.0;
                Vector4::new(v, v, v, 1.0)
            }
            PixelFormat::F32 => {
                let v = read_f32(bytes, 0);
                Vector4::new(v, v, v, 1.0)
            }
            PixelFormat::Rgb888 => Vector4::new(bytes[0] as f32 / 255.0,
                                                 bytes[1] as f32 / 255.0,
                                                 bytes[2] as f32 / 255.0,
                                                 1.0),
            PixelFormat::Rgba8888 => Vector4::new(bytes[0] as f32 / 255.0,
                                                   bytes[1] as f32 / 255.0,
                                                   bytes[2] as f32 / 255.0,
                                                   bytes[3] as f32 / 255.0),
            PixelFormat::RgbF32 => Vector4::new(read_f32(bytes, 0), read_f32(bytes, 1), read_f32(bytes, 2), 1.0),
            PixelFormat::RgbaF32 => Vector4::new(read_f32(bytes, 0), read_f32(bytes, 1), read_f32(bytes, 2), read_f32(bytes, 3)),
        }
    }

    /// Reads only the first channel, which is all a depth test needs
    #[inline]
    pub fn decode_scalar(self, bytes: &[u8]) -> f32 {
        match self {
            PixelFormat::F32 | PixelFormat::RgbF32 | PixelFormat::RgbaF32 => read_f32(bytes, 0),
            _ => self.decode(bytes).x,
        }
    }
}

#[inline]
pub(crate) fn unorm8(channel: f32) -> u8 {
    (clamp(channel, 0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn read_f32(bytes: &[u8], channel: usize) -> f32 {
    let o = channel * 4;
    f32::from_ne_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
}

#[inline]
fn write_f32s(values: &[f32], out: &mut [u8]) {
    for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_ne_bytes());
    }
}
