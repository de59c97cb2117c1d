//! Fractal heightfield evaluation.
//!
//! Sums several octaves of [`GradientNoise`], each at double the frequency
//! and `persistence` times the amplitude of the previous one. This is the
//! single source of truth for ground heights: chunk meshing, the streamer's
//! cached heightmaps and the physics fallback all evaluate the same
//! function, which is what guarantees seamless heights at chunk edges.

use glam::Vec3;
use meridian_common::HeightSource;
use serde::{Deserialize, Serialize};

use crate::noise::GradientNoise;

/// Parameters for fractal height synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightfieldParams {
    /// Amplitude of the first octave, in world units.
    pub height_scale: f32,
    /// Frequency of the first octave (world units to noise-lattice units).
    pub frequency: f32,
    /// Number of noise layers to sum.
    pub octaves: u32,
    /// Per-octave amplitude decay factor.
    pub persistence: f32,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            height_scale: 300.0,
            frequency: 0.001,
            octaves: 4,
            persistence: 0.5,
        }
    }
}

/// Deterministic procedural heightfield.
#[derive(Debug, Clone)]
pub struct HeightField {
    noise: GradientNoise,
    params: HeightfieldParams,
}

impl HeightField {
    /// Creates a heightfield from a seed and fractal parameters.
    #[must_use]
    pub const fn new(seed: u64, params: HeightfieldParams) -> Self {
        Self {
            noise: GradientNoise::new(seed),
            params,
        }
    }

    /// Returns the fractal parameters.
    #[must_use]
    pub fn params(&self) -> &HeightfieldParams {
        &self.params
    }

    /// Returns the world seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.noise.seed()
    }

    /// Evaluates the ground height at horizontal world coordinates.
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let mut height = 0.0;
        let mut amplitude = self.params.height_scale;
        let mut frequency = self.params.frequency;

        for _ in 0..self.params.octaves {
            height += self.noise.sample(x * frequency, z * frequency) * amplitude;
            amplitude *= self.params.persistence;
            frequency *= 2.0;
        }

        height
    }

    /// Computes the surface normal at (x, z) by central differences.
    ///
    /// `spacing` is the sampling step; mesh generation passes its vertex
    /// spacing so mesh normals and query normals agree.
    #[must_use]
    pub fn normal_at(&self, x: f32, z: f32, spacing: f32) -> Vec3 {
        let left = self.height_at(x - spacing, z);
        let right = self.height_at(x + spacing, z);
        let down = self.height_at(x, z - spacing);
        let up = self.height_at(x, z + spacing);

        Vec3::new(left - right, 2.0 * spacing, down - up).normalize()
    }
}

impl HeightSource for HeightField {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        HeightField::height_at(self, x, z)
    }
}
