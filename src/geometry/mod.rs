//! Shader geometry structures

pub mod dimension;
pub mod coordinate;
pub mod rectangle;
pub mod winding;
pub mod clipvertex;
pub mod screenvertex;
pub mod clip;

pub use self::dimension::{Dimensions, HasDimensions};
pub use self::coordinate::Coordinate;
pub use self::rectangle::Rectangle;
pub use self::winding::FaceWinding;
pub use self::clipvertex::{ClipVertex, ndc_to_screen};
pub use self::screenvertex::ScreenVertex;
pub use self::clip::{NearPlane, ClippedPolygon, triangulate_fan};
