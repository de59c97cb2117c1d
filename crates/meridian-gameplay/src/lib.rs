//! # Meridian Gameplay
//!
//! Observer-side simulation for Project Meridian. Currently this is the
//! physics integrator that keeps the player/camera on the streamed
//! heightfield: gravity, ground friction, air resistance, jumping and
//! teleportation, all against a [`meridian_common::HeightSource`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod physics;

pub use physics::{MockObserver, Observer, PhysicsConfig, PhysicsIntegrator};
