use super::Dimensions;

/// Integer pixel coordinate.
///
/// Row `0` is the bottom row of the image, so `y` grows upwards like it does in NDC.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd)]
pub struct Coordinate {
    pub x: u32,
    pub y: u32,
}

impl Coordinate {
    #[inline]
    pub fn new(x: u32, y: u32) -> Coordinate {
        Coordinate { x, y }
    }

    /// Row-major pixel index within a buffer of the given dimensions
    #[inline]
    pub fn into_index(self, dimensions: Dimensions) -> usize {
        let Coordinate { x, y } = self;
        y as usize * dimensions.width as usize + x as usize
    }
}
