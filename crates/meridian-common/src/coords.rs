//! Coordinate types for world and chunk positions.
//!
//! World space is continuous (`glam` vectors, X/Z horizontal, Y up); the
//! chunk grid is discrete. A chunk coordinate identifies a square region of
//! `chunk_size` world units whose minimum corner sits at
//! `coord * chunk_size`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Chunk coordinate (identifies a chunk in the horizontal world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Z coordinate in chunk space
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts a world position to the chunk containing it.
    ///
    /// Uses floor division so negative world coordinates map to the
    /// correct (negative) chunk rather than truncating toward zero.
    #[must_use]
    pub fn from_world(position: Vec3, chunk_size: f32) -> Self {
        Self::from_world_xz(position.x, position.z, chunk_size)
    }

    /// Converts horizontal world coordinates to the chunk containing them.
    #[must_use]
    pub fn from_world_xz(x: f32, z: f32, chunk_size: f32) -> Self {
        Self {
            x: (x / chunk_size).floor() as i32,
            z: (z / chunk_size).floor() as i32,
        }
    }

    /// Returns the world position of this chunk's minimum corner (y = 0).
    #[must_use]
    pub fn world_origin(self, chunk_size: f32) -> Vec3 {
        Vec3::new(
            self.x as f32 * chunk_size,
            0.0,
            self.z as f32 * chunk_size,
        )
    }

    /// Chebyshev distance to another chunk coordinate, in chunk units.
    ///
    /// This is the metric used for the square streaming window: all chunks
    /// within distance `r` form a `(2r+1) x (2r+1)` block.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dz = (self.z - other.z).abs();
        dx.max(dz)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHUNK_SIZE: f32 = 256.0;

    #[test]
    fn test_from_world_origin_boundary() {
        assert_eq!(
            ChunkCoord::from_world_xz(0.0, 0.0, CHUNK_SIZE),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_world_xz(255.9, 0.0, CHUNK_SIZE),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_world_xz(256.0, 0.0, CHUNK_SIZE),
            ChunkCoord::new(1, 0)
        );
    }

    #[test]
    fn test_from_world_negative() {
        // Floor division: -0.5 is inside chunk -1, not chunk 0.
        assert_eq!(
            ChunkCoord::from_world_xz(-0.5, -256.0, CHUNK_SIZE),
            ChunkCoord::new(-1, -1)
        );
        assert_eq!(
            ChunkCoord::from_world_xz(-256.1, 10.0, CHUNK_SIZE),
            ChunkCoord::new(-2, 0)
        );
    }

    #[test]
    fn test_world_origin_is_minimum_corner() {
        let origin = ChunkCoord::new(-1, 2).world_origin(CHUNK_SIZE);
        assert_eq!(origin, Vec3::new(-256.0, 0.0, 512.0));
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, 1)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-2, -2)), 2);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    proptest! {
        /// Round trip: a world position lands in a chunk whose origin is at
        /// most one chunk edge away, on the min side, on both axes.
        #[test]
        fn prop_world_chunk_round_trip(
            x in -100_000.0f32..100_000.0,
            z in -100_000.0f32..100_000.0,
        ) {
            let coord = ChunkCoord::from_world_xz(x, z, CHUNK_SIZE);
            let origin = coord.world_origin(CHUNK_SIZE);

            // f32 floor division can land exactly on the far edge for
            // values near a boundary, so allow a one-ulp slack.
            prop_assert!(x - origin.x >= -1e-2);
            prop_assert!(x - origin.x < CHUNK_SIZE + 1e-2);
            prop_assert!(z - origin.z >= -1e-2);
            prop_assert!(z - origin.z < CHUNK_SIZE + 1e-2);
        }

        #[test]
        fn prop_origin_maps_to_own_chunk(cx in -1000i32..1000, cz in -1000i32..1000) {
            let coord = ChunkCoord::new(cx, cz);
            let origin = coord.world_origin(CHUNK_SIZE);
            prop_assert_eq!(ChunkCoord::from_world(origin, CHUNK_SIZE), coord);
        }
    }
}
