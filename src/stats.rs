//! Performance counters

use std::ops::AddAssign;

/// Counters accumulated by every draw, until `RenderContext::reset_stats` is called.
///
/// Triangles produced by near plane clipping are counted individually, so a single submitted
/// triangle may be counted as rasterized twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderStats {
    /// Triangles given to a draw call
    pub triangles_submitted: u64,
    /// Triangles entirely behind the near plane, with invalid coordinates or outside the viewport
    pub triangles_clipped: u64,
    /// Triangles discarded by face culling
    pub triangles_culled: u64,
    /// Triangles with zero screen-space area
    pub triangles_degenerate: u64,
    /// Triangles that reached pixel traversal
    pub triangles_rasterized: u64,
    /// Covered samples that went through the depth test
    pub samples_tested: u64,
    /// Samples that passed the depth test
    pub depth_passes: u64,
    pub pixel_shader_invocations: u64,
}

impl RenderStats {
    /// Adds all counters of `other` to `self`
    pub fn merge(&mut self, other: &RenderStats) {
        self.triangles_submitted += other.triangles_submitted;
        self.triangles_clipped += other.triangles_clipped;
        self.triangles_culled += other.triangles_culled;
        self.triangles_degenerate += other.triangles_degenerate;
        self.triangles_rasterized += other.triangles_rasterized;
        self.samples_tested += other.samples_tested;
        self.depth_passes += other.depth_passes;
        self.pixel_shader_invocations += other.pixel_shader_invocations;
    }
}

impl AddAssign for RenderStats {
    #[inline]
    fn add_assign(&mut self, other: RenderStats) {
        self.merge(&other)
    }
}
