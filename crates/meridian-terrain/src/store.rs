//! Chunk membership store with a bounded reactivation cache.
//!
//! Every chunk coordinate maps to at most one slot, so the "one state per
//! coordinate" invariant holds by construction rather than by keeping
//! several sets consistent manually. The cache is bounded: unloading with
//! a full cache destroys the chunk immediately instead of caching it.

use ahash::AHashMap;
use meridian_common::ChunkCoord;

use crate::chunk::TerrainChunk;

/// Observable lifecycle state of a chunk coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// No record for this coordinate.
    Unloaded,
    /// Scheduled for generation; geometry not yet produced.
    Loading,
    /// Generated and registered with the scene.
    Loaded,
    /// Generated, removed from the scene, retained for reactivation.
    Cached,
}

/// What happened to a chunk when it was unloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDisposition {
    /// The chunk was retained in the cache.
    Cached,
    /// The cache was full; the chunk and its geometry were destroyed.
    Destroyed,
}

/// Slot payload for one chunk coordinate.
#[derive(Debug)]
enum ChunkSlot {
    Loading,
    Loaded(TerrainChunk),
    Cached(TerrainChunk),
}

/// Owner of all chunk objects and their lifecycle.
#[derive(Debug)]
pub struct ChunkStore {
    slots: AHashMap<ChunkCoord, ChunkSlot>,
    cache_size: usize,
    cached_count: usize,
}

impl ChunkStore {
    /// Creates a store with the given cache bound.
    #[must_use]
    pub fn new(cache_size: usize) -> Self {
        Self {
            slots: AHashMap::new(),
            cache_size,
            cached_count: 0,
        }
    }

    /// The maximum number of cached chunks.
    #[must_use]
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// Current lifecycle state of a coordinate.
    #[must_use]
    pub fn state(&self, coord: ChunkCoord) -> ChunkState {
        match self.slots.get(&coord) {
            None => ChunkState::Unloaded,
            Some(ChunkSlot::Loading) => ChunkState::Loading,
            Some(ChunkSlot::Loaded(_)) => ChunkState::Loaded,
            Some(ChunkSlot::Cached(_)) => ChunkState::Cached,
        }
    }

    /// The loaded chunk at a coordinate, if any.
    #[must_use]
    pub fn loaded(&self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Loaded(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// Marks an unloaded coordinate as loading.
    ///
    /// Returns `false` (and changes nothing) if the coordinate already has
    /// a record in any state.
    pub fn begin_loading(&mut self, coord: ChunkCoord) -> bool {
        if self.slots.contains_key(&coord) {
            return false;
        }
        self.slots.insert(coord, ChunkSlot::Loading);
        true
    }

    /// Drops a loading record, e.g. after a generation failure.
    ///
    /// Returns `true` if the coordinate was loading.
    pub fn cancel_loading(&mut self, coord: ChunkCoord) -> bool {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Loading) => {
                self.slots.remove(&coord);
                true
            }
            _ => false,
        }
    }

    /// Commits a generated chunk as loaded.
    ///
    /// The coordinate must be vacant or in the loading state.
    pub fn insert_loaded(&mut self, chunk: TerrainChunk) {
        let coord = chunk.coord();
        debug_assert!(
            matches!(self.slots.get(&coord), None | Some(ChunkSlot::Loading)),
            "chunk {coord} committed over a live slot"
        );
        self.slots.insert(coord, ChunkSlot::Loaded(chunk));
    }

    /// Reactivates a cached chunk, returning it to the loaded state.
    ///
    /// Returns the chunk (for scene re-registration) when the coordinate
    /// was cached, `None` otherwise.
    pub fn reactivate(&mut self, coord: ChunkCoord) -> Option<&TerrainChunk> {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Cached(_)) => {}
            _ => return None,
        }
        if let Some(ChunkSlot::Cached(chunk)) = self.slots.remove(&coord) {
            self.cached_count -= 1;
            self.slots.insert(coord, ChunkSlot::Loaded(chunk));
        }
        match self.slots.get(&coord) {
            Some(ChunkSlot::Loaded(chunk)) => Some(chunk),
            _ => None,
        }
    }

    /// Unloads a loaded chunk: cached if the bound allows, destroyed
    /// otherwise.
    ///
    /// Returns `None` if the coordinate was not loaded.
    pub fn unload(&mut self, coord: ChunkCoord) -> Option<UnloadDisposition> {
        match self.slots.get(&coord) {
            Some(ChunkSlot::Loaded(_)) => {}
            _ => return None,
        }
        let Some(ChunkSlot::Loaded(chunk)) = self.slots.remove(&coord) else {
            return None;
        };

        if self.cached_count < self.cache_size {
            self.cached_count += 1;
            self.slots.insert(coord, ChunkSlot::Cached(chunk));
            Some(UnloadDisposition::Cached)
        } else {
            // Cache full: dropping the chunk releases its geometry.
            Some(UnloadDisposition::Destroyed)
        }
    }

    /// Coordinates of all loaded chunks.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        self.slots
            .iter()
            .filter_map(|(coord, slot)| match slot {
                ChunkSlot::Loaded(_) => Some(*coord),
                _ => None,
            })
            .collect()
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn loaded_len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ChunkSlot::Loaded(_)))
            .count()
    }

    /// Number of cached chunks.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        debug_assert_eq!(
            self.cached_count,
            self.slots
                .values()
                .filter(|slot| matches!(slot, ChunkSlot::Cached(_)))
                .count()
        );
        self.cached_count
    }

    /// Number of coordinates in the loading state.
    #[must_use]
    pub fn loading_len(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ChunkSlot::Loading))
            .count()
    }

    /// Destroys every record, returning how many chunks held geometry.
    pub fn drain_all(&mut self) -> usize {
        let released = self
            .slots
            .values()
            .filter(|slot| matches!(slot, ChunkSlot::Loaded(_) | ChunkSlot::Cached(_)))
            .count();
        self.slots.clear();
        self.cached_count = 0;
        released
    }
}
