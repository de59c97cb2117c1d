//! Chunk mesh synthesis with altitude-banded surfaces.
//!
//! A chunk mesh is built from an `(N+2) x (N+2)` height grid: `N` vertices
//! per edge cover the chunk itself, and the one-sample border lets edge
//! normals use central differences without reaching into a neighboring
//! chunk. Each quad is assigned to an altitude band (grass, rock or snow)
//! by its average corner height and contributes two triangles to that
//! band's geometry, so every band can be drawn with its own texture.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::heightfield::HeightField;

/// Default number of vertices along one chunk edge.
pub const DEFAULT_VERTICES_PER_EDGE: usize = 32;

/// How many quads one texture tile spans.
const TEXTURE_TILE_QUADS: f32 = 4.0;

/// Altitude band of a terrain quad, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceBand {
    /// Low altitude: grassland.
    Grass,
    /// Mid altitude: exposed rock.
    Rock,
    /// High altitude: snow cover.
    Snow,
}

impl SurfaceBand {
    /// All bands, lowest altitude first.
    pub const ALL: [Self; 3] = [Self::Grass, Self::Rock, Self::Snow];

    /// Classifies a height against the configured thresholds.
    #[must_use]
    pub fn for_height(height: f32, thresholds: &BandThresholds) -> Self {
        if height < thresholds.grass_max {
            Self::Grass
        } else if height < thresholds.rock_max {
            Self::Rock
        } else {
            Self::Snow
        }
    }

    /// Path-like identifier of this band's surface texture.
    #[must_use]
    pub const fn texture_path(self) -> &'static str {
        match self {
            Self::Grass => "resources/textures/grass.png",
            Self::Rock => "resources/textures/rock.png",
            Self::Snow => "resources/textures/snow.png",
        }
    }
}

/// Altitude thresholds separating the surface bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BandThresholds {
    /// Heights below this are grass.
    pub grass_max: f32,
    /// Heights below this (and above `grass_max`) are rock; the rest snow.
    pub rock_max: f32,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            grass_max: 50.0,
            rock_max: 100.0,
        }
    }
}

/// Indexed triangle geometry for one surface band of a chunk.
///
/// Positions are relative to the chunk's world origin. Attribute arrays are
/// flat: three floats per position/normal, two per texture coordinate.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions, xyz per vertex.
    pub positions: Vec<f32>,
    /// Vertex normals, xyz per vertex.
    pub normals: Vec<f32>,
    /// Texture coordinates, uv per vertex.
    pub tex_coords: Vec<f32>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices in this mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in this mesh.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh holds no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, u: f32, v: f32) {
        self.positions.extend_from_slice(&[position.x, position.y, position.z]);
        self.normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
        self.tex_coords.extend_from_slice(&[u, v]);
    }
}

/// Height samples frozen at chunk generation time.
///
/// Row-major `(N+2) x (N+2)` grid including the one-sample border; grid
/// index `(1, 1)` sits at the chunk's world origin. Retained by the chunk
/// so height queries over loaded terrain avoid re-evaluating noise.
#[derive(Debug, Clone)]
pub struct HeightGrid {
    samples: Vec<f32>,
    size: usize,
    spacing: f32,
    origin_x: f32,
    origin_z: f32,
}

impl HeightGrid {
    /// Number of vertices along one chunk edge (border excluded).
    #[must_use]
    pub fn vertices_per_edge(&self) -> usize {
        self.size - 2
    }

    /// Distance between adjacent samples, in world units.
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Raw sample at grid indices (column, row), border included.
    #[must_use]
    pub fn sample(&self, col: usize, row: usize) -> f32 {
        self.samples[row * self.size + col]
    }

    /// All samples in row-major order, border included.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Bilinearly interpolated height at world (x, z).
    ///
    /// Returns `None` when the point lies outside the chunk's interior
    /// region; at grid vertices the result equals the frozen sample, which
    /// in turn equals the procedural evaluation at that vertex.
    #[must_use]
    pub fn height_at_world(&self, x: f32, z: f32) -> Option<f32> {
        let n = self.size - 2;
        let edge = (n - 1) as f32 * self.spacing;
        let lx = x - self.origin_x;
        let lz = z - self.origin_z;
        if !(0.0..=edge).contains(&lx) || !(0.0..=edge).contains(&lz) {
            return None;
        }

        let max_cell = (n - 2) as f32;
        let gx = (lx / self.spacing).min(max_cell);
        let gz = (lz / self.spacing).min(max_cell);
        let col = gx.floor() as usize;
        let row = gz.floor() as usize;
        let fx = gx - col as f32;
        let fz = gz - row as f32;

        // +1 shifts from interior indices to bordered grid indices.
        let h00 = self.sample(col + 1, row + 1);
        let h10 = self.sample(col + 2, row + 1);
        let h01 = self.sample(col + 1, row + 2);
        let h11 = self.sample(col + 2, row + 2);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        Some(top + (bottom - top) * fz)
    }

    /// Central-difference normal at grid indices (column, row).
    ///
    /// Valid for interior and edge vertices; the border guarantees all four
    /// neighbors exist.
    #[must_use]
    fn normal(&self, col: usize, row: usize) -> Vec3 {
        let left = self.sample(col - 1, row);
        let right = self.sample(col + 1, row);
        let down = self.sample(col, row - 1);
        let up = self.sample(col, row + 1);
        Vec3::new(left - right, 2.0 * self.spacing, down - up).normalize()
    }
}

/// Generated geometry for one chunk.
#[derive(Debug, Clone)]
pub struct ChunkGeometry {
    /// Non-empty band meshes, lowest altitude first.
    pub bands: Vec<(SurfaceBand, MeshData)>,
    /// The sampled height grid the meshes were built from.
    pub heights: HeightGrid,
}

/// Builds chunk geometry from a heightfield.
#[derive(Debug, Clone)]
pub struct ChunkMesher {
    vertices_per_edge: usize,
    thresholds: BandThresholds,
}

impl ChunkMesher {
    /// Creates a mesher with the given grid resolution and band thresholds.
    #[must_use]
    pub fn new(vertices_per_edge: usize, thresholds: BandThresholds) -> Self {
        assert!(
            vertices_per_edge >= 2,
            "Chunk meshes need at least two vertices per edge"
        );
        Self {
            vertices_per_edge,
            thresholds,
        }
    }

    /// Returns the number of vertices along one chunk edge.
    #[must_use]
    pub const fn vertices_per_edge(&self) -> usize {
        self.vertices_per_edge
    }

    /// Samples the bordered height grid for a chunk.
    fn sample_grid(
        &self,
        field: &HeightField,
        origin_x: f32,
        origin_z: f32,
        chunk_size: f32,
    ) -> HeightGrid {
        let size = self.vertices_per_edge + 2;
        let spacing = chunk_size / (self.vertices_per_edge - 1) as f32;
        let mut samples = Vec::with_capacity(size * size);

        for row in 0..size {
            for col in 0..size {
                let world_x = origin_x + (col as f32 - 1.0) * spacing;
                let world_z = origin_z + (row as f32 - 1.0) * spacing;
                samples.push(field.height_at(world_x, world_z));
            }
        }

        HeightGrid {
            samples,
            size,
            spacing,
            origin_x,
            origin_z,
        }
    }

    /// Builds banded chunk geometry at the given world origin.
    ///
    /// Positions are relative to `(origin_x, 0, origin_z)`; the caller
    /// places the chunk entity at the origin.
    #[must_use]
    pub fn build(
        &self,
        field: &HeightField,
        origin_x: f32,
        origin_z: f32,
        chunk_size: f32,
    ) -> ChunkGeometry {
        let grid = self.sample_grid(field, origin_x, origin_z, chunk_size);
        let spacing = grid.spacing();
        let n = self.vertices_per_edge;

        let mut grass = MeshData::default();
        let mut rock = MeshData::default();
        let mut snow = MeshData::default();

        // Quads span interior grid vertices (indices 1..=n); the border
        // rows 0 and n+1 only feed the normal computation.
        for row in 1..n {
            for col in 1..n {
                let corners = [
                    (col, row),         // top left
                    (col + 1, row),     // top right
                    (col, row + 1),     // bottom left
                    (col + 1, row + 1), // bottom right
                ];

                let average = corners
                    .iter()
                    .map(|&(c, r)| grid.sample(c, r))
                    .sum::<f32>()
                    / 4.0;
                let band = SurfaceBand::for_height(average, &self.thresholds);
                let mesh = match band {
                    SurfaceBand::Grass => &mut grass,
                    SurfaceBand::Rock => &mut rock,
                    SurfaceBand::Snow => &mut snow,
                };

                let base = mesh.vertex_count() as u32;
                for &(c, r) in &corners {
                    let local_x = (c as f32 - 1.0) * spacing;
                    let local_z = (r as f32 - 1.0) * spacing;
                    let position = Vec3::new(local_x, grid.sample(c, r), local_z);
                    let normal = grid.normal(c, r);
                    let u = local_x / spacing / TEXTURE_TILE_QUADS;
                    let v = local_z / spacing / TEXTURE_TILE_QUADS;
                    mesh.push_vertex(position, normal, u, v);
                }

                // Counter-clockwise winding seen from above (+Y).
                mesh.indices
                    .extend_from_slice(&[base, base + 2, base + 1]);
                mesh.indices
                    .extend_from_slice(&[base + 1, base + 2, base + 3]);
            }
        }

        let bands: Vec<(SurfaceBand, MeshData)> = [
            (SurfaceBand::Grass, grass),
            (SurfaceBand::Rock, rock),
            (SurfaceBand::Snow, snow),
        ]
        .into_iter()
        .filter(|(_, mesh)| !mesh.is_empty())
        .collect();

        trace!(
            "meshed chunk at ({origin_x}, {origin_z}): {} band(s), {} triangles",
            bands.len(),
            bands.iter().map(|(_, m)| m.triangle_count()).sum::<usize>()
        );

        ChunkGeometry {
            bands,
            heights: grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::HeightfieldParams;

    const CHUNK_SIZE: f32 = 256.0;

    fn field() -> HeightField {
        HeightField::new(42, HeightfieldParams::default())
    }

    fn flat_field() -> HeightField {
        HeightField::new(
            0,
            HeightfieldParams {
                octaves: 0,
                ..HeightfieldParams::default()
            },
        )
    }

    #[test]
    fn test_band_classification() {
        let thresholds = BandThresholds::default();
        assert_eq!(
            SurfaceBand::for_height(-20.0, &thresholds),
            SurfaceBand::Grass
        );
        assert_eq!(
            SurfaceBand::for_height(49.9, &thresholds),
            SurfaceBand::Grass
        );
        assert_eq!(
            SurfaceBand::for_height(75.0, &thresholds),
            SurfaceBand::Rock
        );
        assert_eq!(
            SurfaceBand::for_height(250.0, &thresholds),
            SurfaceBand::Snow
        );
    }

    #[test]
    fn test_quad_and_vertex_counts() {
        let mesher = ChunkMesher::new(4, BandThresholds::default());
        let geometry = mesher.build(&flat_field(), 0.0, 0.0, CHUNK_SIZE);

        // Flat terrain is entirely grass: (n-1)^2 quads, 4 vertices and
        // 6 indices each.
        assert_eq!(geometry.bands.len(), 1);
        let (band, mesh) = &geometry.bands[0];
        assert_eq!(*band, SurfaceBand::Grass);
        assert_eq!(mesh.vertex_count(), 9 * 4);
        assert_eq!(mesh.triangle_count(), 9 * 2);
        assert_eq!(mesh.tex_coords.len(), mesh.vertex_count() * 2);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
    }

    #[test]
    fn test_flat_mesh_winding_faces_up() {
        let mesher = ChunkMesher::new(4, BandThresholds::default());
        let geometry = mesher.build(&flat_field(), 0.0, 0.0, CHUNK_SIZE);
        let mesh = &geometry.bands[0].1;

        let vertex = |i: u32| {
            let i = i as usize * 3;
            Vec3::new(
                mesh.positions[i],
                mesh.positions[i + 1],
                mesh.positions[i + 2],
            )
        };
        for triangle in mesh.indices.chunks(3) {
            let (a, b, c) = (vertex(triangle[0]), vertex(triangle[1]), vertex(triangle[2]));
            let face = (b - a).cross(c - a);
            assert!(face.y > 0.0, "triangle winding flipped: {triangle:?}");
        }
    }

    #[test]
    fn test_mesh_spans_full_chunk() {
        let mesher = ChunkMesher::new(8, BandThresholds::default());
        let geometry = mesher.build(&flat_field(), 0.0, 0.0, CHUNK_SIZE);
        let mesh = &geometry.bands[0].1;

        let xs: Vec<f32> = mesh.positions.chunks(3).map(|p| p[0]).collect();
        let min = xs.iter().copied().fold(f32::INFINITY, f32::min);
        let max = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert!((max - CHUNK_SIZE).abs() < 1e-3);
    }

    #[test]
    fn test_adjacent_chunks_share_edge_heights() {
        let field = field();
        let mesher = ChunkMesher::new(16, BandThresholds::default());

        let left = mesher.build(&field, 0.0, 0.0, CHUNK_SIZE);
        let right = mesher.build(&field, CHUNK_SIZE, 0.0, CHUNK_SIZE);

        let n = 16;
        for row in 1..=n {
            // Left chunk's last interior column and right chunk's first
            // interior column sample the same world coordinates.
            let a = left.heights.sample(n, row);
            let b = right.heights.sample(1, row);
            assert!(
                (a - b).abs() < 1e-3,
                "edge heights diverge at row {row}: {a} vs {b}"
            );
        }
    }

    #[test]
    fn test_height_grid_matches_procedural_at_vertices() {
        let field = field();
        let mesher = ChunkMesher::new(8, BandThresholds::default());
        let geometry = mesher.build(&field, 512.0, -256.0, CHUNK_SIZE);
        let spacing = geometry.heights.spacing();

        for i in 0..8 {
            let x = 512.0 + i as f32 * spacing;
            let cached = geometry
                .heights
                .height_at_world(x, -256.0)
                .expect("vertex inside chunk");
            let direct = field.height_at(x, -256.0);
            assert!(
                (cached - direct).abs() < 1e-2,
                "grid and procedural heights diverge: {cached} vs {direct}"
            );
        }
    }

    #[test]
    fn test_height_grid_rejects_outside_queries() {
        let mesher = ChunkMesher::new(8, BandThresholds::default());
        let geometry = mesher.build(&flat_field(), 0.0, 0.0, CHUNK_SIZE);

        assert!(geometry.heights.height_at_world(-1.0, 10.0).is_none());
        assert!(geometry
            .heights
            .height_at_world(10.0, CHUNK_SIZE + 1.0)
            .is_none());
        assert!(geometry.heights.height_at_world(10.0, 10.0).is_some());
    }

    #[test]
    fn test_band_split_produces_multiple_meshes() {
        // A steep, large-amplitude field crosses both thresholds within one
        // chunk, so geometry should land in more than one band.
        let field = HeightField::new(
            42,
            HeightfieldParams {
                height_scale: 400.0,
                frequency: 0.01,
                ..HeightfieldParams::default()
            },
        );
        let mesher = ChunkMesher::new(32, BandThresholds::default());
        let mut max_bands = 0;
        for i in 0..8 {
            let geometry = mesher.build(&field, i as f32 * CHUNK_SIZE, 0.0, CHUNK_SIZE);
            max_bands = max_bands.max(geometry.bands.len());

            // Quads never vanish, whatever band they land in.
            let total_quads: usize = geometry
                .bands
                .iter()
                .map(|(_, m)| m.triangle_count() / 2)
                .sum();
            assert_eq!(total_quads, 31 * 31);
        }
        assert!(max_bands > 1, "expected multiple altitude bands somewhere");
    }

    #[test]
    #[should_panic(expected = "at least two vertices")]
    fn test_mesher_rejects_degenerate_resolution() {
        let _ = ChunkMesher::new(1, BandThresholds::default());
    }
}
