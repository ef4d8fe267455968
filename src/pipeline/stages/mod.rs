pub mod vertex;
pub mod rasterization;
pub mod fragment;

pub use self::rasterization::{Triangle, Rejection, rasterize_triangle};
pub use self::fragment::{MsaaShading, MSAA_SAMPLE_POSITIONS, PIXEL_CENTER};
