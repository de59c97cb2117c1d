//! # Meridian Worldgen
//!
//! Deterministic terrain generation for Project Meridian:
//! - [`noise::GradientNoise`]: seeded 2D lattice-gradient noise primitive
//! - [`heightfield::HeightField`]: fractal (multi-octave) height and
//!   surface-normal evaluation
//! - [`mesh`]: renderable chunk geometry with altitude-banded surfaces
//!
//! Everything in this crate is a pure function of world coordinates, the
//! seed and the configured parameters; no module holds mutable state.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod heightfield;
pub mod mesh;
pub mod noise;

pub use heightfield::{HeightField, HeightfieldParams};
pub use mesh::{BandThresholds, ChunkGeometry, ChunkMesher, HeightGrid, MeshData, SurfaceBand};
pub use noise::GradientNoise;
