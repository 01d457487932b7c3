//! Statistics value types reported by the analyzers

use serde::{Deserialize, Serialize};

/// Post-transform vertex cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostTransformStatistics {
    /// Number of vertices that missed the FIFO cache and had to be transformed.
    pub vertices_transformed: u32,
    /// Transformed vertices per triangle; best case 0.5, worst case 3.0.
    pub acmr: f32,
    /// Transformed vertices per unique vertex; best case 1.0 (each vertex is
    /// transformed exactly once).
    pub atvr: f32,
}

/// Overdraw statistics aggregated across the canonical views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverdrawStatistics {
    /// Pixels touched by at least one fragment.
    pub pixels_covered: u32,
    /// Fragments that passed the early depth test.
    pub pixels_shaded: u32,
    /// Shaded fragments per covered pixel; best case 1.0.
    pub overdraw: f32,
}

/// Pre-transform vertex fetch statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreTransformStatistics {
    /// Bytes read through the modeled fetch cache.
    pub bytes_fetched: u32,
    /// Fetched bytes per vertex buffer byte; best case 1.0 (each byte is
    /// fetched exactly once).
    pub overfetch: f32,
}
