//! Core data structures and traits for meshtune
//!
//! This crate provides the fundamental types shared by the analyzers and
//! optimizers: borrowed views over caller-owned vertex buffers, the
//! index-width abstraction, statistics value types, and scalar quantization
//! helpers for vertex attribute packing.

pub mod error;
pub mod index;
pub mod quantize;
pub mod stats;
pub mod stream;

pub use error::*;
pub use index::*;
pub use quantize::*;
pub use stats::*;
pub use stream::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;
