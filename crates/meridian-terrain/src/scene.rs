//! Collaborator boundaries: scene container and texture provider.
//!
//! Rendering lives outside this crate. The streamer registers each chunk's
//! model and entity with a [`Scene`] implementation and resolves surface
//! texture identifiers through a [`TextureProvider`]; both are supplied by
//! the embedding engine. [`RecordingScene`] and [`TextureCatalog`] are the
//! in-tree implementations used by tests and headless tools.

use ahash::{AHashMap, AHashSet};
use glam::Vec3;
use meridian_common::TerrainError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chunk::ChunkModel;

/// Opaque handle to a loaded texture resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// The provider-defined fallback texture.
    pub const DEFAULT: Self = Self(0);

    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Resolves path-like texture identifiers to loaded texture resources.
pub trait TextureProvider {
    /// Resolves an identifier, returning [`TextureHandle::DEFAULT`] when it
    /// is unknown.
    fn resolve(&self, path: &str) -> TextureHandle;
}

/// Simple texture registry keyed by identifier.
///
/// Stands in for the engine's asset system: identifiers registered up
/// front resolve to stable handles, everything else falls back to the
/// default texture.
#[derive(Debug, Default)]
pub struct TextureCatalog {
    handles: AHashMap<String, TextureHandle>,
    next: u32,
}

impl TextureCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: AHashMap::new(),
            next: 1,
        }
    }

    /// Registers an identifier, returning its handle.
    ///
    /// Registering the same identifier twice returns the original handle.
    pub fn register(&mut self, path: &str) -> TextureHandle {
        if let Some(&handle) = self.handles.get(path) {
            return handle;
        }
        let handle = TextureHandle::from_raw(self.next);
        self.next += 1;
        self.handles.insert(path.to_string(), handle);
        handle
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl TextureProvider for TextureCatalog {
    fn resolve(&self, path: &str) -> TextureHandle {
        match self.handles.get(path) {
            Some(&handle) => handle,
            None => {
                debug!("unknown texture '{path}', using default");
                TextureHandle::DEFAULT
            }
        }
    }
}

/// A chunk's presence in the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Scene-unique entity identifier.
    pub id: String,
    /// Identifier of the model this entity instantiates.
    pub model_id: String,
    /// World position of the entity (the chunk's minimum corner).
    pub position: Vec3,
}

/// External scene container, consumed at the interface boundary.
///
/// Implementations must tolerate `add_model`/`add_entity` being called every
/// tick for at most one new chunk, and re-registration of a model id that
/// was registered before. Registering an entity whose model was never
/// registered is a contract violation and should fail loudly in
/// development builds.
pub trait Scene {
    /// Registers a chunk model's geometry with the renderer.
    fn add_model(&mut self, model: &ChunkModel);

    /// Adds an entity to the scene, making its model visible.
    fn add_entity(&mut self, entity: &Entity);

    /// Removes an entity from the scene; its model stays registered.
    fn remove_entity(&mut self, entity: &Entity);
}

/// Scene test double that records registrations and checks the contract.
#[derive(Debug, Default)]
pub struct RecordingScene {
    models: AHashSet<String>,
    entities: AHashSet<String>,
    add_model_calls: usize,
    add_entity_calls: usize,
    violations: Vec<TerrainError>,
}

impl RecordingScene {
    /// Creates an empty recording scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities currently in the scene.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of distinct models ever registered.
    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Total `add_model` calls, including re-registrations.
    #[must_use]
    pub fn add_model_calls(&self) -> usize {
        self.add_model_calls
    }

    /// Total `add_entity` calls, including cache reactivations.
    #[must_use]
    pub fn add_entity_calls(&self) -> usize {
        self.add_entity_calls
    }

    /// Whether an entity with the given id is in the scene.
    #[must_use]
    pub fn has_entity(&self, id: &str) -> bool {
        self.entities.contains(id)
    }

    /// Contract violations observed so far.
    #[must_use]
    pub fn violations(&self) -> &[TerrainError] {
        &self.violations
    }
}

impl Scene for RecordingScene {
    fn add_model(&mut self, model: &ChunkModel) {
        self.add_model_calls += 1;
        self.models.insert(model.id.clone());
    }

    fn add_entity(&mut self, entity: &Entity) {
        self.add_entity_calls += 1;
        if self.models.contains(&entity.model_id) {
            self.entities.insert(entity.id.clone());
        } else {
            debug_assert!(
                false,
                "entity '{}' references unregistered model '{}'",
                entity.id, entity.model_id
            );
            self.violations.push(TerrainError::MissingModel {
                model_id: entity.model_id.clone(),
            });
        }
    }

    fn remove_entity(&mut self, entity: &Entity) {
        self.entities.remove(&entity.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_registration_is_idempotent() {
        let mut catalog = TextureCatalog::new();
        let a = catalog.register("resources/textures/grass.png");
        let b = catalog.register("resources/textures/grass.png");
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_unknown_falls_back_to_default() {
        let mut catalog = TextureCatalog::new();
        let grass = catalog.register("resources/textures/grass.png");
        assert_ne!(grass, TextureHandle::DEFAULT);
        assert_eq!(catalog.resolve("no/such/texture.png"), TextureHandle::DEFAULT);
        assert_eq!(catalog.resolve("resources/textures/grass.png"), grass);
    }

    #[test]
    fn test_recording_scene_tracks_entities() {
        let mut scene = RecordingScene::new();
        let model = ChunkModel {
            id: "m".to_string(),
            parts: Vec::new(),
        };
        let entity = Entity {
            id: "e".to_string(),
            model_id: "m".to_string(),
            position: Vec3::ZERO,
        };

        scene.add_model(&model);
        scene.add_entity(&entity);
        assert!(scene.has_entity("e"));

        scene.remove_entity(&entity);
        assert!(!scene.has_entity("e"));
        assert!(scene.violations().is_empty());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unregistered model"))]
    fn test_recording_scene_flags_missing_model() {
        let mut scene = RecordingScene::new();
        let entity = Entity {
            id: "e".to_string(),
            model_id: "never_registered".to_string(),
            position: Vec3::ZERO,
        };
        scene.add_entity(&entity);

        // Release builds record the violation instead of panicking.
        assert_eq!(scene.violations().len(), 1);
    }
}
