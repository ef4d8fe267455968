//! Vertex and indexed mesh structures

use std::fmt::{Debug, Formatter, Result as FmtResult};

use nalgebra::{Point3, Vector3};

use crate::attributes::VertexAttributes;
use crate::error::{RenderError, RenderResult};

/// A single vertex with a required position and up to four attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Position of the vertex in object-space
    pub position: Point3<f32>,
    /// Anything that goes alongside the required position, such as colors or normals.
    pub attributes: VertexAttributes,
}

impl Default for Vertex {
    fn default() -> Vertex {
        Vertex { position: Point3::origin(), attributes: VertexAttributes::new() }
    }
}

impl Vertex {
    #[inline]
    pub fn new(position: Point3<f32>, attributes: VertexAttributes) -> Vertex {
        Vertex { position, attributes }
    }

    /// Vertex with a single attribute, usually a color
    pub fn with_attribute(position: Point3<f32>, attribute: Vector3<f32>) -> Vertex {
        Vertex { position, attributes: VertexAttributes::single(attribute) }
    }
}

/// Mesh structure with indexed vertices.
#[derive(Clone, Default)]
pub struct Mesh {
    /// Vertex indices, three per triangle.
    ///
    /// If you are unfamiliar with vertex indices, it's a way of re-using vertices for multiple primitives.
    ///
    /// For example (in 2D), for a rectangle made of two triangles, you would define the four points for each corner vertex:
    ///
    /// ```text
    /// vertex #: name         = (x,   y)
    /// 0:        bottom_left  = (0.0, 0.0)
    /// 1:        top_left     = (0.0, 1.0)
    /// 2:        bottom_right = (1.0, 0.0)
    /// 3:        top_right    = (1.0, 1.0)
    /// ```
    ///
    /// then you'd have your index list be something like:
    ///
    /// ```text
    /// [0, 2, 1, // bottom half triangle
    ///  1, 2, 3] // top half triangle
    /// ```
    ///
    /// Note that both of those triangles go in a counter-clockwise direction from vertex to vertex.
    pub indices: Vec<u32>,
    /// Vertices with their attributes
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    /// Creates a mesh, checking the indices first
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> RenderResult<Mesh> {
        let mesh = Mesh { indices, vertices };

        mesh.validate()?;

        Ok(mesh)
    }

    /// Creates a mesh where every three consecutive vertices form a triangle
    pub fn from_triangle_list(vertices: Vec<Vertex>) -> RenderResult<Mesh> {
        let indices = (0..vertices.len() as u32).collect();

        Mesh::new(vertices, indices)
    }

    /// Checks that indices form whole triangles and stay in range
    pub fn validate(&self) -> RenderResult<()> {
        if self.indices.len() % 3 != 0 {
            return Err(RenderError::InvalidIndexCount(self.indices.len()));
        }

        let len = self.vertices.len();

        match self.indices.iter().find(|&&index| index as usize >= len) {
            Some(&index) => Err(RenderError::IndexOutOfRange(index, len)),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over triangles as index triples
    pub fn triangle_indices<'a>(&'a self) -> impl Iterator<Item=[usize; 3]> + 'a {
        self.indices.chunks_exact(3).map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Iterates over triangles as vertex references.
    ///
    /// Panics on out of range indices, so call `validate` first on meshes built by hand.
    pub fn triangles<'a>(&'a self) -> impl Iterator<Item=(&'a Vertex, &'a Vertex, &'a Vertex)> + 'a {
        self.triangle_indices().map(move |[a, b, c]| (&self.vertices[a], &self.vertices[b], &self.vertices[c]))
    }
}

impl Debug for Mesh {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "Mesh {{ vertices: {}, triangles: {} }}", self.vertices.len(), self.num_triangles())
    }
}
