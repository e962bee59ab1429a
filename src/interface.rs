use crate::core::ModelError;
use std::sync::Arc;

/// A persistent-entity kind the leak finder can inspect and clean.
///
/// The host application implements this for each model of its mapping layer
/// (or wraps the layer generically). The leak finder never constructs models,
/// it only receives them from a [`ModelRegistry`].
///
/// # Examples
///
/// ```
/// use dbplumber::{InspectableModel, ModelError};
///
/// struct Users;
///
/// impl InspectableModel for Users {
///     fn name(&self) -> &str { "User" }
///     fn is_abstract(&self) -> bool { false }
///     fn adapter_name(&self) -> &str { "PostgreSQL" }
///     fn count(&self) -> Result<u64, ModelError> { Ok(0) }
///     fn destroy_all(&self) -> Result<(), ModelError> { Ok(()) }
/// }
/// ```
pub trait InspectableModel: Send + Sync {
    /// Display name, also used as the model's identity.
    fn name(&self) -> &str;

    /// Abstract models are never backed by a table.
    fn is_abstract(&self) -> bool;

    /// Identifier of the storage adapter backing this model (e.g. `SQLite`).
    fn adapter_name(&self) -> &str;

    /// Number of rows currently stored.
    ///
    /// Must return [`ModelError::StatementInvalid`] when no real table backs
    /// the model.
    fn count(&self) -> Result<u64, ModelError>;

    /// Delete every row of this model.
    fn destroy_all(&self) -> Result<(), ModelError>;
}

/// Source of every model known to the mapping layer.
///
/// Populated by the host at startup, so tests can pass a fixed registry.
pub trait ModelRegistry: Send + Sync {
    fn models(&self) -> Vec<Arc<dyn InspectableModel>>;
}

impl<R: ModelRegistry + ?Sized> ModelRegistry for Arc<R> {
    fn models(&self) -> Vec<Arc<dyn InspectableModel>> {
        (**self).models()
    }
}

impl ModelRegistry for Vec<Arc<dyn InspectableModel>> {
    fn models(&self) -> Vec<Arc<dyn InspectableModel>> {
        self.clone()
    }
}
