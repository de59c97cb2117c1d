//! Terrain configuration.
//!
//! Gathers the knobs that were compile-time constants in earlier
//! prototypes into one serializable structure. Configuration can be loaded
//! from and saved to a TOML file; a missing or invalid file falls back to
//! defaults with a logged warning rather than failing startup.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use meridian_worldgen::{BandThresholds, HeightfieldParams};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::streaming::StreamerConfig;

/// Complete terrain-side configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// World seed; the same seed always produces the same terrain.
    pub seed: u64,
    /// Streaming window, cache and mesh-resolution settings.
    pub streaming: StreamerConfig,
    /// Fractal noise parameters.
    pub heightfield: HeightfieldParams,
    /// Altitude thresholds for surface banding.
    pub bands: BandThresholds,
}

impl TerrainConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Returns defaults if the file does not exist or fails to parse.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Terrain config not found at {}, using defaults", path.display());
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read terrain config: {e}");
                    return Self::default();
                }

                match toml::from_str(&contents) {
                    Ok(config) => {
                        info!("Loaded terrain config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        warn!("Failed to parse terrain config: {e}");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                warn!("Failed to open terrain config: {e}");
                Self::default()
            }
        }
    }

    /// Saves configuration to a TOML file, creating parent directories.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = TerrainConfig::load_from("/no/such/meridian/terrain.toml");
        assert_eq!(config.seed, TerrainConfig::default().seed);
        assert_eq!(
            config.streaming.render_distance,
            StreamerConfig::default().render_distance
        );
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("terrain.toml");

        let mut config = TerrainConfig::default();
        config.seed = 1234;
        config.streaming.render_distance = 5;
        config.heightfield.octaves = 6;
        config.save_to(&path).expect("save config");

        let loaded = TerrainConfig::load_from(&path);
        assert_eq!(loaded.seed, 1234);
        assert_eq!(loaded.streaming.render_distance, 5);
        assert_eq!(loaded.heightfield.octaves, 6);
    }

    #[test]
    fn test_invalid_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("terrain.toml");
        fs::write(&path, "this is not [valid toml").expect("write file");

        let config = TerrainConfig::load_from(&path);
        assert_eq!(config.seed, TerrainConfig::default().seed);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("terrain.toml");
        fs::write(&path, "seed = 99\n").expect("write file");

        let config = TerrainConfig::load_from(&path);
        assert_eq!(config.seed, 99);
        assert_eq!(
            config.streaming.chunk_size,
            StreamerConfig::default().chunk_size
        );
    }
}
