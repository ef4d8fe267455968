//! Triangle setup and traversal

pub mod triangle;

pub use self::triangle::{Triangle, Rejection, rasterize_triangle};
