//! Bounded per-vertex attribute lists

use std::ops::Index;

use nalgebra::Vector3;
use smallvec::{smallvec, SmallVec};

use crate::error::{RenderError, RenderResult};
use crate::interpolate::Interpolate;

/// Maximum number of attributes a vertex can carry
pub const MAX_ATTRIBUTES_COUNT: usize = 4;

/// Fixed-capacity ordered list of 3-component attributes, such as colors or normals.
///
/// Storage is inline and never spills to the heap, since pushes beyond
/// [`MAX_ATTRIBUTES_COUNT`](constant.MAX_ATTRIBUTES_COUNT.html) are rejected.
/// Cloning only copies the attributes actually in use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributes {
    members: SmallVec<[Vector3<f32>; MAX_ATTRIBUTES_COUNT]>,
}

impl VertexAttributes {
    #[inline]
    pub fn new() -> VertexAttributes {
        VertexAttributes { members: SmallVec::new() }
    }

    /// List holding a single attribute
    #[inline]
    pub(crate) fn single(attribute: Vector3<f32>) -> VertexAttributes {
        VertexAttributes { members: smallvec![attribute] }
    }

    /// Builds an attribute list from a slice, failing if it holds too many attributes
    pub fn from_slice(attributes: &[Vector3<f32>]) -> RenderResult<VertexAttributes> {
        if attributes.len() > MAX_ATTRIBUTES_COUNT {
            return Err(RenderError::AttributeOverflow(MAX_ATTRIBUTES_COUNT));
        }

        Ok(VertexAttributes { members: SmallVec::from_slice(attributes) })
    }

    /// Appends an attribute
    pub fn push(&mut self, attribute: Vector3<f32>) -> RenderResult<()> {
        if self.members.len() == MAX_ATTRIBUTES_COUNT {
            return Err(RenderError::AttributeOverflow(MAX_ATTRIBUTES_COUNT));
        }

        self.members.push(attribute);

        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize { self.members.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Vector3<f32>> {
        self.members.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vector3<f32>] { &self.members }

    #[inline]
    pub fn iter(&self) -> ::std::slice::Iter<'_, Vector3<f32>> { self.members.iter() }
}

impl Index<usize> for VertexAttributes {
    type Output = Vector3<f32>;

    #[inline]
    fn index(&self, index: usize) -> &Vector3<f32> { &self.members[index] }
}

impl<'a> IntoIterator for &'a VertexAttributes {
    type Item = &'a Vector3<f32>;
    type IntoIter = ::std::slice::Iter<'a, Vector3<f32>>;

    fn into_iter(self) -> Self::IntoIter { self.members.iter() }
}

/// Interpolates channel-wise. All three lists must hold the same number of attributes,
/// which the rasterizer checks before any interpolation happens.
impl Interpolate for VertexAttributes {
    fn barycentric_interpolate(u: f32, x1: &Self, v: f32, x2: &Self, w: f32, x3: &Self) -> Self {
        debug_assert!(x1.len() == x2.len() && x2.len() == x3.len());

        VertexAttributes {
            members: x1.iter().zip(x2).zip(x3).map(|((a, b), c)| {
                Interpolate::barycentric_interpolate(u, a, v, b, w, c)
            }).collect()
        }
    }

    fn linear_interpolate(t: f32, x1: &Self, x2: &Self) -> Self {
        debug_assert_eq!(x1.len(), x2.len());

        VertexAttributes {
            members: x1.iter().zip(x2).map(|(a, b)| Interpolate::linear_interpolate(t, a, b)).collect()
        }
    }
}
