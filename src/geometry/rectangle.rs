use nalgebra::Vector2;

/// Axis-aligned rectangle in screen space, `min` inclusive and `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub min: Vector2<f32>,
    pub max: Vector2<f32>,
}

impl Default for Rectangle {
    fn default() -> Rectangle {
        Rectangle { min: Vector2::zeros(), max: Vector2::zeros() }
    }
}

impl Rectangle {
    #[inline]
    pub fn new(min: Vector2<f32>, max: Vector2<f32>) -> Rectangle {
        Rectangle { min, max }
    }

    /// Rectangle from an origin and a size in pixels
    pub fn from_origin_size(x: u32, y: u32, width: u32, height: u32) -> Rectangle {
        Rectangle {
            min: Vector2::new(x as f32, y as f32),
            max: Vector2::new(x as f32 + width as f32, y as f32 + height as f32),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 { self.max.x - self.min.x }

    #[inline]
    pub fn height(&self) -> f32 { self.max.y - self.min.y }
}
