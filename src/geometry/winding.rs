//! Polygon face winding definitions

/// Defines face winding variations. These apply to screen-space vertices,
/// so imagine the vertices as they are viewed from the final image, with the y-axis pointing up.
///
/// If all triangles of a mesh have the same face winding,
/// then triangles that are facing away from the screen can be skipped since they
/// will have the opposite winding order, since they are viewed from the back. This is known
/// as backface culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceWinding {
    /// Clockwise face winding, where the vertices are like so:
    ///
    /// ```text
    ///                   1
    ///                  /|
    ///           A    /  |
    ///         /    /    |
    ///       /    /      | |
    ///     /    /        | |
    ///        /          | |
    ///      /            | V
    ///    /              |
    /// 3 *---------------* 2
    ///       <-------
    /// ```
    Clockwise,
    /// Counter-Clockwise face winding, where the vertices are like so:
    ///
    /// ```text
    ///                   1
    ///                  /|
    ///           /    /  |
    ///         /    /    |
    ///       /    /      | A
    ///     V    /        | |
    ///        /          | |
    ///      /            | |
    ///    /              |
    /// 3 *---------------* 2
    ///       ------->
    /// ```
    CounterClockwise,
}

impl FaceWinding {
    /// Winding of a triangle from its doubled signed area in y-up screen space.
    ///
    /// Returns `None` for degenerate triangles.
    #[inline]
    pub fn from_signed_area(area2: f64) -> Option<FaceWinding> {
        if area2 > 0.0 {
            Some(FaceWinding::CounterClockwise)
        } else if area2 < 0.0 {
            Some(FaceWinding::Clockwise)
        } else {
            None
        }
    }

    #[inline]
    pub fn flip(self) -> FaceWinding {
        match self {
            FaceWinding::Clockwise => FaceWinding::CounterClockwise,
            FaceWinding::CounterClockwise => FaceWinding::Clockwise,
        }
    }
}

#[cfg(test)]
mod test {
    use super::FaceWinding;

    #[test]
    fn test_winding_from_area() {
        assert_eq!(FaceWinding::from_signed_area(2.0), Some(FaceWinding::CounterClockwise));
        assert_eq!(FaceWinding::from_signed_area(-0.5), Some(FaceWinding::Clockwise));
        assert_eq!(FaceWinding::from_signed_area(0.0), None);
        assert_eq!(FaceWinding::Clockwise.flip(), FaceWinding::CounterClockwise);
    }
}
