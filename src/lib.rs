//! # meshtune
//!
//! Mesh-ordering primitives for GPU rendering pipelines.
//!
//! This is the umbrella crate that provides convenient access to the whole
//! workspace. Given indexed or unindexed triangle meshes, meshtune reorders
//! indices and vertices to improve GPU cache behavior (post-transform vertex
//! cache, pre-transform vertex fetch) and to reduce overdraw, and it exposes
//! analyzers that quantify those metrics in a hardware-agnostic way.
//!
//! ## Features
//!
//! - **Core**: buffer views, index-width abstraction, statistics types, and
//!   scalar quantization helpers (always enabled)
//! - **Analysis**: FIFO vertex cache, software rasterizer, and direct-mapped
//!   fetch cache analyzers
//! - **Optimization**: index/vertex buffer generation plus the three
//!   reordering optimizers (Tipsify, overdraw, vertex fetch)
//!
//! ## Quick Start
//!
//! ```rust
//! use meshtune::prelude::*;
//!
//! // a quad: two triangles sharing one edge
//! let indices: Vec<u32> = vec![0, 1, 2, 0, 2, 3];
//!
//! let (optimized, _clusters) = optimize_post_transform_clusters(&indices, 4, 16)?;
//! let stats = analyze_post_transform(&optimized, 4, 32)?;
//! assert_eq!(stats.vertices_transformed, 4);
//! # Ok::<(), meshtune::Error>(())
//! ```
//!
//! A typical full sequence runs `generate_index_buffer` /
//! `generate_vertex_buffer` over a raw vertex stream, then
//! `optimize_post_transform_clusters`, `optimize_overdraw`, and finally
//! `optimize_pre_transform`. Analyzers can be invoked independently at any
//! stage.

// Re-export core functionality
pub use meshtune_core::*;

// Re-export sub-crates
#[cfg(feature = "analysis")]
pub use meshtune_analysis as analysis;

#[cfg(feature = "optimization")]
pub use meshtune_optimization as optimization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshtune_core::*;

    #[cfg(feature = "analysis")]
    pub use meshtune_analysis::*;

    #[cfg(feature = "optimization")]
    pub use meshtune_optimization::*;
}
