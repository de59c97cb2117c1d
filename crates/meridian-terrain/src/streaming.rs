//! Per-tick chunk streaming around a moving observer.
//!
//! The streamer keeps every chunk within the render distance (Chebyshev,
//! in chunk units) of the observer loaded. Work is spread across ticks:
//! the window scan only runs when the observer crosses a chunk boundary,
//! and at most one chunk is generated per tick so a newly revealed ring
//! fills in over several frames instead of stalling one. Unloads are
//! applied before loads, and chunks generated this tick are committed to
//! the scene before the next tick's streaming decision runs.
//!
//! Everything here is single-threaded and synchronous; the one-per-tick
//! generation budget is the only cost-spreading mechanism.

use std::collections::VecDeque;

use glam::Vec3;
use meridian_common::{ChunkCoord, HeightSource, TerrainError, TerrainResult};
use meridian_worldgen::mesh::DEFAULT_VERTICES_PER_EDGE;
use meridian_worldgen::{ChunkMesher, HeightField, SurfaceBand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::chunk::{ChunkModel, ModelPart, TerrainChunk};
use crate::config::TerrainConfig;
use crate::scene::{Entity, Scene, TextureHandle, TextureProvider};
use crate::store::{ChunkStore, ChunkState, UnloadDisposition};

/// Streaming window, cache and mesh-resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamerConfig {
    /// Edge length of one chunk in world units.
    pub chunk_size: f32,
    /// Chebyshev radius, in chunks, of the loaded window.
    pub render_distance: i32,
    /// Maximum number of unloaded chunks retained for reactivation.
    pub cache_size: usize,
    /// Mesh resolution: vertices along one chunk edge.
    pub vertices_per_edge: usize,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 256.0,
            render_distance: 3,
            cache_size: 50,
            vertices_per_edge: DEFAULT_VERTICES_PER_EDGE,
        }
    }
}

/// Counters for the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamerStats {
    /// Chunks currently loaded (visible).
    pub loaded: usize,
    /// Chunks retained in the reactivation cache.
    pub cached: usize,
    /// Coordinates queued for generation.
    pub pending: usize,
    /// Chunks generated this tick, not yet committed to the scene.
    pub staged: usize,
}

impl std::fmt::Display for StreamerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chunks - loaded: {}, cached: {}, pending: {}, staged: {}",
            self.loaded, self.cached, self.pending, self.staged
        )
    }
}

/// Streams terrain chunks in and out around the observer.
pub struct TerrainStreamer {
    config: StreamerConfig,
    field: HeightField,
    mesher: ChunkMesher,
    store: ChunkStore,
    /// Surface textures per band, resolved once at construction.
    band_textures: [TextureHandle; 3],
    /// Coordinates marked `Loading`, waiting for their generation tick.
    pending: VecDeque<ChunkCoord>,
    /// Generated this tick, committed at the end of the same tick.
    staged: Vec<TerrainChunk>,
    last_center: Option<ChunkCoord>,
}

impl TerrainStreamer {
    /// Creates a streamer from configuration and a texture provider.
    #[must_use]
    pub fn new(config: &TerrainConfig, textures: &dyn TextureProvider) -> Self {
        let streaming = config.streaming.clone();
        assert!(streaming.chunk_size > 0.0, "Chunk size must be positive");
        assert!(
            streaming.render_distance >= 0,
            "Render distance must be non-negative"
        );

        let band_textures =
            SurfaceBand::ALL.map(|band| textures.resolve(band.texture_path()));

        info!(
            "Terrain streamer: chunk_size={}, render_distance={}, cache_size={}, seed={}",
            streaming.chunk_size, streaming.render_distance, streaming.cache_size, config.seed
        );

        Self {
            mesher: ChunkMesher::new(streaming.vertices_per_edge, config.bands.clone()),
            field: HeightField::new(config.seed, config.heightfield.clone()),
            store: ChunkStore::new(streaming.cache_size),
            band_textures,
            pending: VecDeque::new(),
            staged: Vec::new(),
            last_center: None,
            config: streaming,
        }
    }

    /// Streaming configuration.
    #[must_use]
    pub const fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// The chunk store (read access, e.g. for debug tooling).
    #[must_use]
    pub const fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Advances streaming by one simulation tick.
    ///
    /// Recomputes the load/unload sets when the observer entered a new
    /// chunk, generates at most one pending chunk, and commits everything
    /// generated this tick to the scene.
    pub fn update<S: Scene>(&mut self, observer_position: Vec3, scene: &mut S) {
        let center = ChunkCoord::from_world(observer_position, self.config.chunk_size);
        if self.last_center != Some(center) {
            self.last_center = Some(center);
            self.retarget(center, scene);
        }

        self.generate_next();
        self.commit_staged(scene);
    }

    /// Applies the window scan for a new center chunk: unloads first, then
    /// reactivates or queues loads.
    fn retarget<S: Scene>(&mut self, center: ChunkCoord, scene: &mut S) {
        let distance = self.config.render_distance;

        let stale: Vec<ChunkCoord> = self
            .store
            .loaded_coords()
            .into_iter()
            .filter(|coord| coord.chebyshev_distance(center) > distance)
            .collect();
        for coord in stale {
            self.unload_chunk(coord, scene);
        }

        for dz in -distance..=distance {
            for dx in -distance..=distance {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                match self.store.state(coord) {
                    ChunkState::Loaded | ChunkState::Loading => {}
                    ChunkState::Cached => {
                        if let Some(chunk) = self.store.reactivate(coord) {
                            scene.add_entity(chunk.entity());
                            debug!("chunk {coord} reactivated from cache");
                        }
                    }
                    ChunkState::Unloaded => {
                        if self.store.begin_loading(coord) {
                            self.pending.push_back(coord);
                        }
                    }
                }
            }
        }
    }

    /// Generates at most one pending chunk this tick.
    ///
    /// A queued coordinate may have left the window since it was queued;
    /// it is generated anyway and the next window scan unloads it.
    fn generate_next(&mut self) {
        let Some(coord) = self.pending.pop_front() else {
            return;
        };

        match self.generate_chunk(coord) {
            Ok(chunk) => self.staged.push(chunk),
            Err(err) => {
                warn!("{err}");
                self.store.cancel_loading(coord);
            }
        }
    }

    /// Synthesizes geometry, model and entity for one chunk.
    fn generate_chunk(&self, coord: ChunkCoord) -> TerrainResult<TerrainChunk> {
        let origin = coord.world_origin(self.config.chunk_size);
        let geometry = self
            .mesher
            .build(&self.field, origin.x, origin.z, self.config.chunk_size);

        if !geometry.heights.samples().iter().all(|h| h.is_finite()) {
            return Err(TerrainError::Generation {
                coord,
                reason: "non-finite height sample".to_string(),
            });
        }

        let model_id = TerrainChunk::model_id_for(coord);
        let parts = geometry
            .bands
            .into_iter()
            .map(|(band, mesh)| ModelPart {
                band,
                mesh,
                texture: self.band_texture(band),
            })
            .collect();
        let model = ChunkModel {
            id: model_id.clone(),
            parts,
        };
        let entity = Entity {
            id: TerrainChunk::entity_id_for(coord),
            model_id,
            position: origin,
        };

        Ok(TerrainChunk::new(coord, model, entity, geometry.heights))
    }

    /// Commits staged chunks: scene registration, then the loaded state.
    fn commit_staged<S: Scene>(&mut self, scene: &mut S) {
        for chunk in self.staged.drain(..) {
            scene.add_model(chunk.model());
            scene.add_entity(chunk.entity());
            debug!("chunk {} generated and loaded", chunk.coord());
            self.store.insert_loaded(chunk);
        }
    }

    /// Removes a loaded chunk from the scene and retires it.
    fn unload_chunk<S: Scene>(&mut self, coord: ChunkCoord, scene: &mut S) {
        if let Some(chunk) = self.store.loaded(coord) {
            scene.remove_entity(chunk.entity());
        }
        match self.store.unload(coord) {
            Some(UnloadDisposition::Cached) => debug!("chunk {coord} cached"),
            Some(UnloadDisposition::Destroyed) => {
                debug!("chunk {coord} destroyed, cache full");
            }
            None => {}
        }
    }

    /// Ground height at world (x, z).
    ///
    /// Uses the owning chunk's frozen height grid when it is loaded and
    /// falls back to direct procedural evaluation otherwise, so the query
    /// succeeds for any finite coordinate.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let coord = ChunkCoord::from_world_xz(x, z, self.config.chunk_size);
        if let Some(chunk) = self.store.loaded(coord) {
            if let Some(height) = chunk.height_at_world(x, z) {
                return height;
            }
        }
        self.field.height_at(x, z)
    }

    /// Releases all chunks: loaded, cached, staged and pending.
    ///
    /// Deterministic and safe to call more than once; meant for shutdown.
    pub fn cleanup(&mut self) {
        let released = self.store.drain_all() + self.staged.len();
        self.staged.clear();
        self.pending.clear();
        self.last_center = None;
        info!("Terrain streamer cleaned up, {released} chunk(s) released");
    }

    /// Current streaming counters.
    #[must_use]
    pub fn stats(&self) -> StreamerStats {
        StreamerStats {
            loaded: self.store.loaded_len(),
            cached: self.store.cached_len(),
            pending: self.pending.len(),
            staged: self.staged.len(),
        }
    }

    fn band_texture(&self, band: SurfaceBand) -> TextureHandle {
        let index = match band {
            SurfaceBand::Grass => 0,
            SurfaceBand::Rock => 1,
            SurfaceBand::Snow => 2,
        };
        self.band_textures[index]
    }
}

impl HeightSource for TerrainStreamer {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        TerrainStreamer::height_at(self, x, z)
    }
}
