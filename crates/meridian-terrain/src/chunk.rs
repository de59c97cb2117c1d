//! Chunk payload: generated model, scene entity and frozen heights.

use meridian_common::ChunkCoord;
use meridian_worldgen::{HeightGrid, MeshData, SurfaceBand};

use crate::scene::{Entity, TextureHandle};

/// One altitude band of a chunk model: geometry plus its surface texture.
#[derive(Debug, Clone)]
pub struct ModelPart {
    /// Altitude band this part belongs to.
    pub band: SurfaceBand,
    /// Triangle geometry for the band.
    pub mesh: MeshData,
    /// Resolved surface texture.
    pub texture: TextureHandle,
}

/// Renderable model for a chunk, split by altitude band.
#[derive(Debug, Clone)]
pub struct ChunkModel {
    /// Scene-unique model identifier.
    pub id: String,
    /// Non-empty band geometries.
    pub parts: Vec<ModelPart>,
}

/// A generated terrain chunk.
///
/// The chunk owns its model, entity and height grid for its whole
/// lifetime; the scene only ever receives registration calls.
#[derive(Debug, Clone)]
pub struct TerrainChunk {
    coord: ChunkCoord,
    model: ChunkModel,
    entity: Entity,
    heights: HeightGrid,
}

impl TerrainChunk {
    /// Creates a chunk from its generated pieces.
    #[must_use]
    pub fn new(coord: ChunkCoord, model: ChunkModel, entity: Entity, heights: HeightGrid) -> Self {
        Self {
            coord,
            model,
            entity,
            heights,
        }
    }

    /// Deterministic model identifier for a chunk coordinate.
    #[must_use]
    pub fn model_id_for(coord: ChunkCoord) -> String {
        format!("terrain_chunk_{}_{}", coord.x, coord.z)
    }

    /// Deterministic entity identifier for a chunk coordinate.
    #[must_use]
    pub fn entity_id_for(coord: ChunkCoord) -> String {
        format!("entity_terrain_chunk_{}_{}", coord.x, coord.z)
    }

    /// The chunk's grid coordinate.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The chunk's renderable model.
    #[must_use]
    pub fn model(&self) -> &ChunkModel {
        &self.model
    }

    /// The chunk's scene entity.
    #[must_use]
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// The height grid frozen at generation time.
    #[must_use]
    pub fn heights(&self) -> &HeightGrid {
        &self.heights
    }

    /// Interpolated ground height at world (x, z), if inside this chunk.
    #[must_use]
    pub fn height_at_world(&self, x: f32, z: f32) -> Option<f32> {
        self.heights.height_at_world(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_are_deterministic() {
        let coord = ChunkCoord::new(-3, 7);
        assert_eq!(TerrainChunk::model_id_for(coord), "terrain_chunk_-3_7");
        assert_eq!(
            TerrainChunk::entity_id_for(coord),
            "entity_terrain_chunk_-3_7"
        );
    }
}
