use super::filter::ModelFilter;
use super::threshold::threshold_for;
use crate::config::InspectOptions;
use crate::core::{ModelError, PlumberError, Result};
use crate::interface::{InspectableModel, ModelRegistry};
use crate::result::LeakReport;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{Level, event, info_span};

/// Finds models holding rows beyond their threshold and mops them up.
///
/// A single pass: every leaking model is destroyed before the next model is
/// counted. Not safe against concurrent writers to the same store.
pub struct LeakFinder<'a> {
    filter: ModelFilter<'a>,
    thresholds: &'a BTreeMap<String, u64>,
}

impl<'a> LeakFinder<'a> {
    pub fn new(
        ignored_models: &'a BTreeSet<String>,
        ignored_adapters: &BTreeSet<String>,
        thresholds: &'a BTreeMap<String, u64>,
    ) -> Self {
        Self {
            filter: ModelFilter::new(ignored_models, ignored_adapters),
            thresholds,
        }
    }

    pub fn from_options(options: &'a InspectOptions) -> Self {
        Self::new(
            &options.ignored_models,
            &options.ignored_adapters,
            &options.model_thresholds,
        )
    }

    /// Inspect every model of `registry`.
    ///
    /// Fails with [`PlumberError::InvalidModel`] as soon as a countable model
    /// has no table. A failed `destroy_all` yields [`PlumberError::Cleanup`]
    /// carrying the leaks found so far; any other collaborator failure
    /// propagates unchanged.
    pub fn scan<R>(&self, registry: &R) -> Result<LeakReport>
    where
        R: ModelRegistry + ?Sized,
    {
        let span = info_span!("plumber.scan");
        let _enter = span.enter();

        let mut leaks = LeakReport::empty();
        for model in registry.models() {
            let model = model.as_ref();
            if let Some(reason) = self.filter.excluded(model) {
                event!(Level::DEBUG, model = model.name(), reason = reason.as_str(), "model skipped");
                continue;
            }

            let records = self.count_for(model)?;
            if records > threshold_for(self.thresholds, model.name()) {
                leaks.record(model.name(), records);
                if let Err(source) = self.mop_up(model, records) {
                    event!(Level::ERROR, model = model.name(), error = %source, "mop up failed");
                    return Err(PlumberError::Cleanup {
                        model: model.name().to_string(),
                        leaks,
                        source,
                    });
                }
            }
        }

        event!(Level::DEBUG, leaking = leaks.len(), "scan finished");
        Ok(leaks)
    }

    fn count_for(&self, model: &dyn InspectableModel) -> Result<u64> {
        if let Some(reason) = self.filter.uncountable(model) {
            event!(Level::DEBUG, model = model.name(), reason = reason.as_str(), "model not counted");
            return Ok(0);
        }

        model.count().map_err(|err| {
            let err = PlumberError::from_model(model.name(), err);
            if err.is_invalid_model() {
                event!(Level::ERROR, model = model.name(), "model has no valid table");
            }
            err
        })
    }

    fn mop_up(&self, model: &dyn InspectableModel, records: u64) -> anyhow::Result<()> {
        event!(Level::WARN, model = model.name(), rows = records, "leak detected");
        model.destroy_all().map_err(ModelError::into_source)?;
        event!(Level::INFO, model = model.name(), "leaked rows mopped up");
        Ok(())
    }
}

/// Run one scan of `registry` with `options`.
pub fn scan<R>(registry: &R, options: &InspectOptions) -> Result<LeakReport>
where
    R: ModelRegistry + ?Sized,
{
    LeakFinder::from_options(options).scan(registry)
}
