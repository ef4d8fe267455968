use nalgebra::base::coordinates::XYZ;

use crate::attributes::VertexAttributes;
use crate::framebuffer::TargetBand;
use crate::geometry::{ClipVertex, Coordinate, Dimensions, FaceWinding, ScreenVertex};
use crate::interpolate::Interpolate;
use crate::pipeline::DrawState;
use crate::stats::RenderStats;
use crate::uniforms::Uniforms;
use crate::SUBPIXEL_STEPS;

use crate::pipeline::stages::fragment::{shade_msaa_pixel, shade_pixel};

/// Reasons triangle setup may throw a triangle away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A vertex with `w <= 0` or a non-finite coordinate
    Invalid,
    /// Zero area after snapping
    Degenerate,
    /// Winding matches the cull mode
    Culled,
    /// No pixel of the viewport can be covered
    Offscreen,
}

/// Snaps a screen-space coordinate to the sub-pixel grid
#[inline(always)]
fn snap(value: f32) -> f64 {
    let steps = SUBPIXEL_STEPS as f64;

    (value as f64 * steps).round() / steps
}

/// Twice the signed area of `(a, b, p)`, positive when `p` lies to the left of `a -> b` with y up
#[inline(always)]
fn edge_function(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> f64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    origin: (f64, f64),
    end: (f64, f64),
    top_left: bool,
}

impl Edge {
    fn new(origin: (f64, f64), end: (f64, f64)) -> Edge {
        let (dx, dy) = (end.0 - origin.0, end.1 - origin.1);

        // y up and counter-clockwise, so a top edge points left and a left edge points down
        let top_left = (dy == 0.0 && dx < 0.0) || dy < 0.0;

        Edge { origin, end, top_left }
    }

    #[inline(always)]
    fn eval(&self, p: (f64, f64)) -> f64 {
        edge_function(self.origin, self.end, p)
    }

    /// Samples exactly on an edge belong to the triangle only if it is a top or left edge
    #[inline(always)]
    fn covers(&self, value: f64) -> bool {
        value > 0.0 || (value == 0.0 && self.top_left)
    }
}

/// A screen-space triangle ready for traversal, always wound counter-clockwise.
///
/// Vertex positions are snapped to a grid of `1 / SUBPIXEL_STEPS` pixels and all edge
/// functions are evaluated in `f64`, which is exact on that grid. Together with the top-left
/// fill rule this makes triangles sharing an edge cover every sample along it exactly once.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [ScreenVertex; 3],
    points: [(f64, f64); 3],
    edges: [Edge; 3],
    inv_area2: f64,
    /// First pixel of the bounding box
    min: Coordinate,
    /// One past the last pixel of the bounding box
    max: Coordinate,
}

impl Triangle {
    /// Projects a clipped triangle onto the screen, then culls it and computes its bounds.
    pub fn setup(a: &ClipVertex, b: &ClipVertex, c: &ClipVertex, uniforms: &Uniforms, dimensions: Dimensions) -> Result<Triangle, Rejection> {
        let valid = |v: &ClipVertex| v.position.w > 0.0 && v.position.iter().all(|c| c.is_finite());

        if !(valid(a) && valid(b) && valid(c)) {
            return Err(Rejection::Invalid);
        }

        let viewport = uniforms.viewport();

        let mut vertices = [a.clone().normalize(viewport), b.clone().normalize(viewport), c.clone().normalize(viewport)];

        let mut points = [(0.0, 0.0); 3];

        for (point, vertex) in points.iter_mut().zip(vertices.iter()) {
            let XYZ { x, y, z } = *vertex.position;

            if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                return Err(Rejection::Invalid);
            }

            *point = (snap(x), snap(y));
        }

        let area2 = edge_function(points[0], points[1], points[2]);

        let winding = FaceWinding::from_signed_area(area2).ok_or(Rejection::Degenerate)?;

        if Some(winding) == uniforms.cull_face() {
            return Err(Rejection::Culled);
        }

        if winding == FaceWinding::Clockwise {
            vertices.swap(1, 2);
            points.swap(1, 2);
        }

        let (min, max) = bounds(&points, viewport.min.x, viewport.min.y, viewport.max.x, viewport.max.y, dimensions)
            .ok_or(Rejection::Offscreen)?;

        Ok(Triangle {
            edges: [
                Edge::new(points[1], points[2]),
                Edge::new(points[2], points[0]),
                Edge::new(points[0], points[1]),
            ],
            vertices,
            points,
            inv_area2: 1.0 / area2.abs(),
            min,
            max,
        })
    }

    /// Snapped screen-space positions, counter-clockwise
    #[inline]
    pub fn points(&self) -> &[(f64, f64); 3] { &self.points }

    /// First pixel row of the bounding box, and one past its last row
    #[inline]
    pub fn rows(&self) -> (u32, u32) { (self.min.y, self.max.y) }

    /// Unnormalized barycentric weights of a screen-space point, covered or not
    #[inline]
    pub fn edge_values(&self, p: (f64, f64)) -> [f64; 3] {
        [self.edges[0].eval(p), self.edges[1].eval(p), self.edges[2].eval(p)]
    }

    /// Edge function values at `p` if the triangle covers it
    #[inline]
    pub fn coverage(&self, p: (f64, f64)) -> Option<[f64; 3]> {
        let values = self.edge_values(p);

        if self.edges.iter().zip(values.iter()).all(|(edge, &value)| edge.covers(value)) {
            Some(values)
        } else {
            None
        }
    }

    /// Perspective-correct interpolation weights from edge function values.
    ///
    /// Each barycentric weight is multiplied by the reciprocal `w` of its vertex,
    /// and the result normalized so the weights sum to one.
    pub fn perspective_weights(&self, values: [f64; 3]) -> [f32; 3] {
        let mut weights = [0.0f64; 3];
        let mut sum = 0.0;

        for ((weight, value), vertex) in weights.iter_mut().zip(values.iter()).zip(self.vertices.iter()) {
            *weight = value * self.inv_area2 * vertex.inv_w as f64;
            sum += *weight;
        }

        [(weights[0] / sum) as f32, (weights[1] / sum) as f32, (weights[2] / sum) as f32]
    }

    /// Interpolated depth in `[0, 1]` for points inside the clipped volume
    #[inline]
    pub fn depth(&self, weights: &[f32; 3]) -> f32 {
        let [a, b, c] = &self.vertices;

        Interpolate::barycentric_interpolate(weights[0], &a.position.z, weights[1], &b.position.z, weights[2], &c.position.z)
    }

    /// Interpolated vertex attributes
    #[inline]
    pub fn attributes(&self, weights: &[f32; 3]) -> VertexAttributes {
        let [a, b, c] = &self.vertices;

        Interpolate::barycentric_interpolate(weights[0], &a.attributes, weights[1], &b.attributes, weights[2], &c.attributes)
    }
}

/// Integer pixel bounds of the snapped points, intersected with the viewport and the target
fn bounds(points: &[(f64, f64); 3], vx0: f32, vy0: f32, vx1: f32, vy1: f32, dimensions: Dimensions) -> Option<(Coordinate, Coordinate)> {
    let min_x = points.iter().fold(::std::f64::INFINITY, |m, p| m.min(p.0));
    let min_y = points.iter().fold(::std::f64::INFINITY, |m, p| m.min(p.1));
    let max_x = points.iter().fold(::std::f64::NEG_INFINITY, |m, p| m.max(p.0));
    let max_y = points.iter().fold(::std::f64::NEG_INFINITY, |m, p| m.max(p.1));

    let x0 = min_x.floor().max((vx0 as f64).floor()).max(0.0);
    let y0 = min_y.floor().max((vy0 as f64).floor()).max(0.0);
    let x1 = max_x.ceil().min((vx1 as f64).ceil()).min(dimensions.width as f64);
    let y1 = max_y.ceil().min((vy1 as f64).ceil()).min(dimensions.height as f64);

    if x0 < x1 && y0 < y1 {
        Some((Coordinate::new(x0 as u32, y0 as u32), Coordinate::new(x1 as u32, y1 as u32)))
    } else {
        None
    }
}

/// Visits every pixel of the triangle's bounding box that lies in `band`,
/// testing, shading and merging each covered sample.
pub fn rasterize_triangle(triangle: &Triangle, band: &mut TargetBand, state: &DrawState, stats: &mut RenderStats) {
    let rows = band.row_range();

    let y0 = triangle.min.y.max(rows.start);
    let y1 = triangle.max.y.min(rows.end);

    let msaa = band.samples() > 1;

    for y in y0..y1 {
        for x in triangle.min.x..triangle.max.x {
            if msaa {
                shade_msaa_pixel(triangle, band, state, x, y, stats);
            } else {
                shade_pixel(triangle, band, state, x, y, stats);
            }
        }
    }
}
