use super::MemoryModel;
use crate::core::{PlumberError, Result};
use crate::interface::{InspectableModel, ModelRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of in-memory models.
///
/// Immutable once built; adding a model returns a new registry, so clones are
/// cheap and never need a lock. The models themselves share their row storage
/// across clones.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    models: Arc<BTreeMap<String, Arc<MemoryModel>>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model - returns a NEW registry
    pub fn with_model(self, model: MemoryModel) -> Result<Self> {
        let name = model.name().to_string();

        if self.models.contains_key(&name) {
            return Err(PlumberError::Config(format!(
                "model '{}' already registered",
                name
            )));
        }

        let mut models = (*self.models).clone();
        models.insert(name, Arc::new(model));

        Ok(Self {
            models: Arc::new(models),
        })
    }

    pub fn get(&self, name: &str) -> Option<Arc<MemoryModel>> {
        self.models.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn list_models(&self) -> Vec<&str> {
        self.models.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRegistry for MemoryRegistry {
    fn models(&self) -> Vec<Arc<dyn InspectableModel>> {
        self.models
            .values()
            .map(|model| Arc::clone(model) as Arc<dyn InspectableModel>)
            .collect()
    }
}
