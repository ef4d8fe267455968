//! Renders four colored cubes and writes the image to stdout as a plain PPM.
//!
//! ```text
//! cargo run --example cubes -- [--msaa] [--parallel] > cubes.ppm
//! ```

extern crate env_logger;
extern crate nalgebra;
extern crate softraster;

use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use softraster::{Buffer2D, Mesh, ParallelRenderer, PassThroughPixelShader, PassThroughVertexShader, RenderContext, RenderResult, Vertex};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

const CUBE_VERTICES: [[f32; 3]; 8] = [
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
];

const FACE_COLORS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
];

/// 6 faces * 2 triangles * 3 vertices, all counter-clockwise seen from outside
const CUBE_INDICES: [usize; 36] = [
    1, 3, 0,
    7, 5, 4,
    4, 1, 0,
    5, 2, 1,
    2, 7, 3,
    0, 7, 4,
    1, 2, 3,
    7, 6, 5,
    4, 5, 1,
    5, 6, 2,
    2, 6, 7,
    0, 3, 7,
];

/// Unrolls the cube into a triangle list, colored by the first vertex of each triangle
fn cube_mesh() -> RenderResult<Mesh> {
    let mut vertices = Vec::with_capacity(CUBE_INDICES.len());

    for triangle in CUBE_INDICES.chunks(3) {
        let [r, g, b] = FACE_COLORS[triangle[0] % FACE_COLORS.len()];

        for &index in triangle {
            let [x, y, z] = CUBE_VERTICES[index];

            vertices.push(Vertex::with_attribute(Point3::new(x, y, z), Vector3::new(r, g, b)));
        }
    }

    Mesh::from_triangle_list(vertices)
}

/// Model matrices of the cubes, translated then rotated
fn scene_objects() -> Vec<Matrix4<f32>> {
    let place = |translation: Vector3<f32>, degrees: f32, axis: Vector3<f32>| {
        Matrix4::new_translation(&translation) * Matrix4::new_rotation(axis * degrees.to_radians())
    };

    vec![
        place(Vector3::new(0.0, 0.0, 2.0), 45.0, Vector3::y()),
        place(Vector3::new(-3.75, 0.0, 0.0), 30.0, Vector3::x()),
        place(Vector3::new(3.75, 0.0, 0.0), 60.0, Vector3::y()),
        place(Vector3::new(0.0, 0.0, -2.0), 90.0, Vector3::z()),
    ]
}

fn write_ppm<W: Write>(out: &mut W, buffer: &Buffer2D) -> io::Result<()> {
    writeln!(out, "P3\n{} {}\n255", buffer.width(), buffer.height())?;

    // PPM rows go top to bottom, buffer rows bottom to top
    for y in (0..buffer.height()).rev() {
        for x in 0..buffer.width() {
            let color = buffer.read(x, y).map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

            let channel = |c: f32| if c.is_nan() { 0 } else { (256.0 * c.max(0.0).min(0.999)) as u32 };

            writeln!(out, "{} {} {}", channel(color.x), channel(color.y), channel(color.z))?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let msaa = std::env::args().any(|arg| arg == "--msaa");
    let parallel = std::env::args().any(|arg| arg == "--parallel");

    let mut context = RenderContext::new();

    context.set_render_target(WIDTH, HEIGHT, 1, msaa)?;
    context.set_shader(Arc::new(PassThroughVertexShader), Arc::new(PassThroughPixelShader));
    context.clear_render_target(Vector4::new(0.0, 0.0, 0.0, 0.0))?;

    let view = Matrix4::look_at_rh(&Point3::new(0.0, 3.75, 6.5), &Point3::origin(), &Vector3::y());
    let projection = Matrix4::new_perspective(WIDTH as f32 / HEIGHT as f32, 60.0f32.to_radians(), 0.1, 100.0);

    context.set_projection_matrix(projection);

    let mesh = cube_mesh()?;
    let mut renderer = if parallel { Some(ParallelRenderer::new()) } else { None };

    for model in scene_objects() {
        context.set_model_view_matrix(view * model);

        match renderer {
            Some(ref mut renderer) => renderer.draw_mesh(&mut context, &mesh)?,
            None => context.draw_mesh(&mesh)?,
        }
    }

    context.resolve_msaa_buffer()?;

    eprintln!("{:?}", context.stats());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    write_ppm(&mut out, context.color_buffer(0)?)?;

    Ok(())
}
