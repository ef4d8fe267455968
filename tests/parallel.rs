extern crate env_logger;
extern crate nalgebra;
extern crate softraster;

use std::sync::Arc;

use nalgebra::{Point3, Vector3, Vector4};

use softraster::*;

/// Small deterministic generator, so both renders see the same triangles
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> f32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 40) as f32) / (1u64 << 24) as f32
    }

    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next()
    }
}

fn random_mesh(triangles: usize) -> Mesh {
    let mut rng = Lcg(0x5eed);

    let vertices = (0..triangles * 3).map(|_| {
        Vertex::with_attribute(Point3::new(rng.range(-1.2, 1.2), rng.range(-1.2, 1.2), rng.range(-0.9, 0.9)),
                               Vector3::new(rng.next(), rng.next(), rng.next()))
    }).collect();

    Mesh::from_triangle_list(vertices).unwrap()
}

fn context(msaa: bool) -> RenderContext {
    let mut context = RenderContext::new();

    context.set_render_target(97, 61, 1, msaa).unwrap();
    context.set_shader(Arc::new(PassThroughVertexShader), Arc::new(PassThroughPixelShader));
    context.set_cull_face_mode(None);
    context.clear_render_target(Vector4::new(0.1, 0.1, 0.1, 1.0)).unwrap();

    context
}

fn assert_same_output(mut serial: RenderContext, mut parallel: RenderContext) {
    serial.resolve_msaa_buffer().unwrap();
    parallel.resolve_msaa_buffer().unwrap();

    assert_eq!(serial.color_buffer(0).unwrap().as_bytes(), parallel.color_buffer(0).unwrap().as_bytes());
    assert_eq!(serial.depth_buffer().unwrap().as_bytes(), parallel.depth_buffer().unwrap().as_bytes());
    assert_eq!(serial.stats(), parallel.stats());
}

#[test]
fn test_parallel_matches_serial() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mesh = random_mesh(200);

    let mut serial = context(false);
    serial.draw_mesh(&mesh).unwrap();

    let mut parallel = context(false);
    let mut renderer = ParallelRenderer::with_threads(4);
    renderer.set_band_height(7);
    renderer.draw_mesh(&mut parallel, &mesh).unwrap();

    assert!(serial.stats().pixel_shader_invocations > 0);

    assert_same_output(serial, parallel);
}

#[test]
fn test_parallel_matches_serial_with_msaa() {
    let mesh = random_mesh(100);

    let mut serial = context(true);
    serial.draw_mesh(&mesh).unwrap();

    let mut parallel = context(true);
    ParallelRenderer::with_threads(3).draw_mesh(&mut parallel, &mesh).unwrap();

    assert_same_output(serial, parallel);
}

#[test]
fn test_parallel_rejects_bad_input_before_drawing() {
    let mut context = context(false);
    let mut renderer = ParallelRenderer::with_threads(2);

    let mut mesh = random_mesh(2);
    mesh.vertices[4].attributes = VertexAttributes::new();

    assert_eq!(renderer.draw_mesh(&mut context, &mesh).unwrap_err(), RenderError::AttributeCountMismatch(1, 0, 1));
    assert_eq!(context.stats().samples_tested, 0);

    mesh.indices.push(0);

    assert_eq!(renderer.draw_mesh(&mut context, &mesh).unwrap_err(), RenderError::InvalidIndexCount(7));
}

#[test]
fn test_serial_rejects_bad_attributes_before_drawing() {
    let mut context = context(false);

    // only the second triangle is malformed
    let mut mesh = random_mesh(2);
    mesh.vertices[4].attributes = VertexAttributes::new();

    assert_eq!(context.draw_mesh(&mesh).unwrap_err(), RenderError::AttributeCountMismatch(1, 0, 1));
    assert_eq!(context.stats().triangles_submitted, 0);
    assert_eq!(context.stats().samples_tested, 0);
}

#[test]
fn test_band_height_is_at_least_one() {
    let mut renderer = ParallelRenderer::with_threads(1);

    assert_eq!(renderer.band_height(), DEFAULT_BAND_HEIGHT);

    renderer.set_band_height(0);

    assert_eq!(renderer.band_height(), 1);
}
