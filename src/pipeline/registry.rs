//! Shared camera model registry populated across concurrent workers.

use crate::domain::{CameraModel, CameraModelOverrides};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

/// Mapping from camera identity to camera model, shared by every worker
/// during extraction.
///
/// Lookups take the read lock so images of already-registered cameras do
/// not serialize; only the first sighting of an identity takes the write
/// lock. Concurrent first-writers for the same identity may race, which
/// is benign: model synthesis is deterministic per identity, so whichever
/// writer wins inserts an equivalent model. The lock makes each insert
/// atomic; it does not (and need not) decide the winner.
#[derive(Debug, Default)]
pub struct CameraRegistry {
    models: RwLock<HashMap<String, CameraModel>>,
}

impl CameraRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a model is registered for `identity`.
    pub fn contains(&self, identity: &str) -> bool {
        self.models.read().unwrap().contains_key(identity)
    }

    /// Number of registered camera identities.
    pub fn len(&self) -> usize {
        self.models.read().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.models.read().unwrap().is_empty()
    }

    /// Registers a model for `identity` unless one is already present.
    ///
    /// `synthesize` is only called when the identity is unseen, and only
    /// the first insert for an identity sticks.
    pub fn ensure<F>(&self, identity: &str, synthesize: F)
    where
        F: FnOnce() -> CameraModel,
    {
        if self.models.read().unwrap().contains_key(identity) {
            return;
        }
        let mut models = self.models.write().unwrap();
        models.entry(identity.to_string()).or_insert_with(synthesize);
    }

    /// Consumes the registry and applies the camera model override pass.
    ///
    /// Must only run after every worker has joined; taking `self` by
    /// value makes a finalize-during-extraction a compile error.
    ///
    /// - `All`: every identity already present gets a fresh copy of the
    ///   override descriptor with its own identity re-stamped.
    /// - `PerCamera`: entries are applied verbatim, whether or not the
    ///   identity was observed during extraction.
    /// - `None`: the registry passes through unchanged.
    pub fn finalize(
        self,
        overrides: Option<CameraModelOverrides>,
    ) -> HashMap<String, CameraModel> {
        let mut models = self.models.into_inner().unwrap();

        match overrides {
            None => models,
            Some(CameraModelOverrides::All(template)) => {
                for (identity, model) in models.iter_mut() {
                    let mut copy = template.clone();
                    copy.id = identity.clone();
                    *model = copy;
                }
                models
            }
            Some(CameraModelOverrides::PerCamera(map)) => {
                for (identity, model) in map {
                    if !models.contains_key(&identity) {
                        warn!(
                            "camera model override introduces identity not observed \
                             in the image set: {identity}"
                        );
                    }
                    models.insert(identity, model);
                }
                models
            }
        }
    }
}
