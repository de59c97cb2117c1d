//! # Meridian Common
//!
//! Common types and shared abstractions for Project Meridian.
//!
//! This crate provides the foundational pieces used across the terrain
//! subsystems:
//! - Chunk/world coordinate types and conversions
//! - The terrain error taxonomy
//! - The [`HeightSource`] abstraction shared by generation, streaming and
//!   physics
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod height;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::height::*;
}

pub use prelude::*;
