//! Error types

use thiserror::Error;

/// Errors reported by the rendering pipeline.
///
/// All of these are programmer errors, like drawing before a render target exists.
/// Degenerate geometry is never an error, it is silently skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("No render target bound, call set_render_target first")]
    NoRenderTarget,
    #[error("No vertex/pixel shader pair bound, call set_shader first")]
    NoShader,
    #[error("Invalid render target dimensions {0}x{1}")]
    InvalidDimensions(u32, u32),
    #[error("{0} color targets is invalid, expected 1..={1}")]
    InvalidTargetCount(usize, usize),
    #[error("Color target {0} is not bound")]
    InvalidTargetIndex(usize),
    #[error("The bound render target has no multi-sample storage")]
    MsaaDisabled,
    #[error("Attribute capacity of {0} exceeded")]
    AttributeOverflow(usize),
    #[error("Color output capacity of {0} exceeded")]
    ColorOutputOverflow(usize),
    #[error("Mismatched attribute counts across triangle vertices: {0}, {1}, {2}")]
    AttributeCountMismatch(usize, usize, usize),
    #[error("{0} indices is invalid for triangle indexing")]
    InvalidIndexCount(usize),
    #[error("Index {0} is out of range for {1} vertices")]
    IndexOutOfRange(u32, usize),
    #[error("Invalid buffer, it holds no pixels")]
    InvalidBuffer,
    #[error("Invalid pixel coordinate")]
    InvalidPixelCoordinate,
    #[error("Sample index {0} is out of range for {1} samples")]
    InvalidSampleIndex(u32, u32),
}

pub type RenderResult<T> = Result<T, RenderError>;
