//! # Meridian Terrain
//!
//! Runtime terrain streaming for Project Meridian. The streamer keeps a
//! square window of generated chunks loaded around a moving observer,
//! spreads generation cost across simulation ticks, retires out-of-range
//! chunks into a bounded reactivation cache, and answers ground-height
//! queries for collision.
//!
//! The rendering side of the world is reached only through the [`scene`]
//! collaborator traits; this crate owns chunk lifetime, the scene does not.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod config;
pub mod scene;
pub mod store;
pub mod streaming;

pub use chunk::{ChunkModel, ModelPart, TerrainChunk};
pub use config::TerrainConfig;
pub use scene::{Entity, RecordingScene, Scene, TextureCatalog, TextureHandle, TextureProvider};
pub use store::{ChunkState, ChunkStore, UnloadDisposition};
pub use streaming::{StreamerConfig, StreamerStats, TerrainStreamer};
