//! Error types for the terrain subsystem.

use crate::coords::ChunkCoord;
use thiserror::Error;

/// Errors raised by the terrain subsystem.
///
/// Generation failures are recoverable: the streamer logs them, drops the
/// coordinate from the loading set, and retries it on a later scan while it
/// remains inside the streaming window. A missing model reference is an
/// integration-contract violation between the streamer and the scene and
/// should fail loudly in development builds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TerrainError {
    /// Chunk geometry synthesis failed.
    #[error("chunk generation failed at {coord}: {reason}")]
    Generation {
        /// Coordinate of the chunk that failed to generate
        coord: ChunkCoord,
        /// Reason for the failure
        reason: String,
    },

    /// Scene registration was requested for an entity whose model was never
    /// registered.
    #[error("entity references unregistered model: {model_id}")]
    MissingModel {
        /// Identifier of the missing model
        model_id: String,
    },
}

/// Result type alias for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TerrainError::Generation {
            coord: ChunkCoord::new(3, -2),
            reason: "mesh overflow".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "chunk generation failed at (3, -2): mesh overflow"
        );
    }
}
