//! # meshtune optimization
//!
//! Reordering optimizers for GPU mesh rendering.
//!
//! This crate rewrites index and vertex buffers to make them cheaper to
//! render: deduplicating unindexed streams, reordering triangles for the
//! post-transform vertex cache (Tipsify), reordering clusters to cut
//! overdraw, and reordering vertices for fetch locality. Every routine is a
//! pure function over caller data and produces bit-identical output for
//! identical input.

pub mod indexing;
pub mod overdraw;
pub mod post_transform;
pub mod pre_transform;

pub use indexing::*;
pub use overdraw::*;
pub use post_transform::*;
pub use pre_transform::*;
