//! Interpolation utilities

use std::ops::{Add, Mul};

use num_traits::Float;

use nalgebra::{Vector3, Vector4};

/// Describes a type that can be interpolated with barycentric coordinates.
///
/// This is required for any rasterization to occur, and linear interpolation
/// is used to create new vertices when clipping against the near plane.
///
/// See [This document](https://classes.soe.ucsc.edu/cmps160/Fall10/resources/barycentricInterpolation.pdf) for more information.
pub trait Interpolate {
    /// Interpolate the three values with their corresponding barycentric coordinate weight
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self;

    /// Simple linear interpolation
    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self;
}

/// Convenience method for interpolating three values with barycentric coordinates.
#[inline]
pub fn barycentric_interpolate<R: Float, T>(u: R, ux: T, v: R, vx: T, w: R, wx: T) -> T where T: Add<Output=T> + Mul<R, Output=T> {
    ux * u + vx * v + wx * w
}

/// Convenience method for linearly interpolating two values
#[inline]
pub fn linear_interpolate<R: Float, T>(t: R, x1: T, x2: T) -> T where T: Add<Output=T>, T: Mul<R, Output=T> {
    x1 * (R::one() - t) + x2 * t
}

impl Interpolate for f32 {
    #[inline(always)]
    fn barycentric_interpolate(u: f32, ux: &f32, v: f32, vx: &f32, w: f32, wx: &f32) -> f32 {
        barycentric_interpolate(u, *ux, v, *vx, w, *wx)
    }

    #[inline(always)]
    fn linear_interpolate(t: f32, x1: &f32, x2: &f32) -> f32 {
        linear_interpolate(t, *x1, *x2)
    }
}

macro_rules! impl_vector_interpolate {
    ($($t:ident),+) => {
        $(
            impl Interpolate for $t<f32> {
                #[inline]
                fn barycentric_interpolate(u: f32, ux: &Self, v: f32, vx: &Self, w: f32, wx: &Self) -> Self {
                    barycentric_interpolate(u, *ux, v, *vx, w, *wx)
                }

                #[inline]
                fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
                    linear_interpolate(t, *x1, *x2)
                }
            }
        )+
    }
}

impl_vector_interpolate!(Vector3, Vector4);
