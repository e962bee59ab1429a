use crate::core::{ModelError, PlumberError, Result};
use crate::interface::InspectableModel;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const DEFAULT_ADAPTER: &str = "Memory";

#[derive(Debug, Default)]
struct TableState {
    rows: BTreeMap<usize, Value>,
    next_row_id: usize,
    destroy_calls: usize,
    failure: Option<String>,
    destroy_failure: Option<String>,
}

/// Row store for a single model, kept entirely in memory.
///
/// Used as a stand-in for a real mapped model in host test suites.
#[derive(Debug)]
pub struct MemoryModel {
    name: String,
    adapter: String,
    is_abstract: bool,
    has_table: bool,
    state: RwLock<TableState>,
}

impl MemoryModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            adapter: DEFAULT_ADAPTER.to_string(),
            is_abstract: false,
            has_table: true,
            state: RwLock::new(TableState::default()),
        }
    }

    /// Set the storage adapter identifier
    pub fn adapter(mut self, adapter: impl Into<String>) -> Self {
        self.adapter = adapter.into();
        self
    }

    /// Mark the model as abstract
    pub fn abstract_model(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Mapped, but no table exists behind it
    pub fn without_table(mut self) -> Self {
        self.has_table = false;
        self
    }

    pub fn insert(&self, row: Value) -> Result<usize> {
        let mut state = self.write()?;
        let id = state.next_row_id;
        state.next_row_id += 1;
        state.rows.insert(id, row);
        Ok(id)
    }

    pub fn insert_many<I>(&self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut inserted = 0;
        for row in rows {
            self.insert(row)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub fn rows(&self) -> Result<Vec<Value>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    pub fn row_count(&self) -> Result<usize> {
        Ok(self.read()?.rows.len())
    }

    /// How many times `destroy_all` has been invoked
    pub fn destroy_calls(&self) -> Result<usize> {
        Ok(self.read()?.destroy_calls)
    }

    /// Make every subsequent `count`/`destroy_all` fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) -> Result<()> {
        self.write()?.failure = Some(message.into());
        Ok(())
    }

    /// Counting keeps working; only `destroy_all` fails with `message`.
    pub fn fail_destroy_with(&self, message: impl Into<String>) -> Result<()> {
        self.write()?.destroy_failure = Some(message.into());
        Ok(())
    }

    pub fn clear_failure(&self) -> Result<()> {
        let mut state = self.write()?;
        state.failure = None;
        state.destroy_failure = None;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TableState>> {
        Ok(self.state.read()?)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TableState>> {
        Ok(self.state.write()?)
    }

    fn check(&self, state: &TableState) -> std::result::Result<(), ModelError> {
        if let Some(message) = &state.failure {
            return Err(ModelError::Other(anyhow::anyhow!(message.clone())));
        }
        if !self.has_table {
            return Err(ModelError::StatementInvalid(format!(
                "no such table: {}",
                self.name
            )));
        }
        Ok(())
    }
}

fn poisoned(err: PlumberError) -> ModelError {
    ModelError::Other(anyhow::Error::new(err))
}

impl InspectableModel for MemoryModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn adapter_name(&self) -> &str {
        &self.adapter
    }

    fn count(&self) -> std::result::Result<u64, ModelError> {
        let state = self.read().map_err(poisoned)?;
        self.check(&state)?;
        Ok(state.rows.len() as u64)
    }

    fn destroy_all(&self) -> std::result::Result<(), ModelError> {
        let mut state = self.write().map_err(poisoned)?;
        state.destroy_calls += 1;
        self.check(&state)?;
        if let Some(message) = &state.destroy_failure {
            return Err(ModelError::Other(anyhow::anyhow!(message.clone())));
        }
        state.rows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_count() {
        let model = MemoryModel::new("User");
        model.insert(json!({"name": "Alice"})).unwrap();
        model.insert(json!({"name": "Bob"})).unwrap();

        assert_eq!(model.count().unwrap(), 2);
        assert_eq!(model.row_count().unwrap(), 2);
        assert_eq!(model.rows().unwrap(), vec![json!({"name": "Alice"}), json!({"name": "Bob"})]);
    }

    #[test]
    fn test_destroy_all_clears_rows() {
        let model = MemoryModel::new("User");
        model.insert_many(vec![json!(1), json!(2), json!(3)]).unwrap();

        model.destroy_all().unwrap();

        assert_eq!(model.count().unwrap(), 0);
        assert_eq!(model.destroy_calls().unwrap(), 1);
    }

    #[test]
    fn test_tableless_model_count_is_statement_invalid() {
        let model = MemoryModel::new("Ghost").without_table();
        let err = model.count().unwrap_err();
        assert!(matches!(err, ModelError::StatementInvalid(_)));
    }

    #[test]
    fn test_injected_failure() {
        let model = MemoryModel::new("User");
        model.fail_with("too many connections").unwrap();
        let err = model.count().unwrap_err();
        assert!(matches!(err, ModelError::Other(_)));
        assert_eq!(err.to_string(), "too many connections");

        model.clear_failure().unwrap();
        assert_eq!(model.count().unwrap(), 0);
    }

    #[test]
    fn test_destroy_failure_keeps_rows() {
        let model = MemoryModel::new("Stuck");
        model.insert(json!({"id": 1})).unwrap();
        model.fail_destroy_with("foreign key violation").unwrap();

        assert_eq!(model.count().unwrap(), 1);
        let err = model.destroy_all().unwrap_err();
        assert_eq!(err.to_string(), "foreign key violation");
        assert_eq!(model.row_count().unwrap(), 1);
        assert_eq!(model.destroy_calls().unwrap(), 1);

        model.clear_failure().unwrap();
        model.destroy_all().unwrap();
        assert_eq!(model.row_count().unwrap(), 0);
    }

    #[test]
    fn test_builder_flags() {
        let model = MemoryModel::new("Base").adapter("SQLite").abstract_model();
        assert_eq!(model.adapter_name(), "SQLite");
        assert!(model.is_abstract());
    }
}
