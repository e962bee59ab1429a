use crate::interface::InspectableModel;
use regex::Regex;
use std::collections::BTreeSet;

/// Bookkeeping models of the mapping layer, never inspected.
pub const BUILTIN_IGNORED_MODELS: &[&str] = &[
    "ActiveRecord::SchemaMigration",
    "ActiveRecord::InternalMetadata",
    "schema_migrations",
    "ar_internal_metadata",
];

/// Prefix reserved for generated has-and-belongs-to-many join models.
pub const JOIN_MODEL_PREFIX: &str = "HABTM_";

lazy_static::lazy_static! {
    // Last `::` segment starts with the prefix, e.g. `Post::HABTM_Tags`.
    static ref JOIN_MODEL_NAME: Regex =
        Regex::new(&format!("(?:^|::){}[^:]*$", regex::escape(JOIN_MODEL_PREFIX)))
            .expect("join model pattern is valid");
}

/// Why a model was left out of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    Builtin,
    JoinModel,
    Abstract,
    IgnoredAdapter,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Ignored => "ignored model",
            SkipReason::Builtin => "internal model",
            SkipReason::JoinModel => "join model",
            SkipReason::Abstract => "abstract model",
            SkipReason::IgnoredAdapter => "ignored adapter",
        }
    }
}

pub fn is_join_model(name: &str) -> bool {
    JOIN_MODEL_NAME.is_match(name)
}

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_IGNORED_MODELS.contains(&name)
}

/// Name and adapter based filtering for one scan.
pub struct ModelFilter<'a> {
    ignored_models: &'a BTreeSet<String>,
    ignored_adapters: BTreeSet<String>,
}

impl<'a> ModelFilter<'a> {
    pub fn new(ignored_models: &'a BTreeSet<String>, ignored_adapters: &BTreeSet<String>) -> Self {
        Self {
            ignored_models,
            ignored_adapters: ignored_adapters.iter().map(|a| a.to_lowercase()).collect(),
        }
    }

    /// Excluded from the candidate set entirely.
    pub fn excluded(&self, model: &dyn InspectableModel) -> Option<SkipReason> {
        let name = model.name();
        if self.ignored_models.contains(name) {
            Some(SkipReason::Ignored)
        } else if is_builtin(name) {
            Some(SkipReason::Builtin)
        } else if is_join_model(name) {
            Some(SkipReason::JoinModel)
        } else {
            None
        }
    }

    /// Candidate, but treated as holding zero rows.
    pub fn uncountable(&self, model: &dyn InspectableModel) -> Option<SkipReason> {
        if model.is_abstract() {
            Some(SkipReason::Abstract)
        } else if self
            .ignored_adapters
            .contains(&model.adapter_name().to_lowercase())
        {
            Some(SkipReason::IgnoredAdapter)
        } else {
            None
        }
    }

    pub fn skip_reason(&self, model: &dyn InspectableModel) -> Option<SkipReason> {
        self.excluded(model).or_else(|| self.uncountable(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryModel;

    #[test]
    fn test_join_model_names() {
        assert!(is_join_model("HABTM_Tags"));
        assert!(is_join_model("Post::HABTM_Tags"));
        assert!(is_join_model("Admin::Post::HABTM_Categories"));
        assert!(!is_join_model("Post"));
        assert!(!is_join_model("HABTM_Tags::Post"));
        assert!(!is_join_model("PostHABTM_Tags"));
        assert!(!is_join_model("habtm_tags"));
    }

    #[test]
    fn test_builtins() {
        assert!(is_builtin("ActiveRecord::SchemaMigration"));
        assert!(is_builtin("ar_internal_metadata"));
        assert!(!is_builtin("User"));
    }

    #[test]
    fn test_adapter_comparison_ignores_case() {
        let models = BTreeSet::new();
        let adapters = BTreeSet::from(["sqlite".to_string()]);
        let filter = ModelFilter::new(&models, &adapters);

        let model = MemoryModel::new("Anon").adapter("SQLite");
        assert_eq!(filter.skip_reason(&model), Some(SkipReason::IgnoredAdapter));

        let adapters = BTreeSet::from(["SQLITE".to_string()]);
        let filter = ModelFilter::new(&models, &adapters);
        assert_eq!(filter.skip_reason(&model), Some(SkipReason::IgnoredAdapter));
    }

    #[test]
    fn test_exclusion_wins_over_abstract() {
        let models = BTreeSet::from(["Base".to_string()]);
        let adapters = BTreeSet::new();
        let filter = ModelFilter::new(&models, &adapters);

        let model = MemoryModel::new("Base").abstract_model();
        assert_eq!(filter.skip_reason(&model), Some(SkipReason::Ignored));

        let other = MemoryModel::new("Other").abstract_model();
        assert_eq!(filter.skip_reason(&other), Some(SkipReason::Abstract));

        let plain = MemoryModel::new("Plain");
        assert_eq!(filter.skip_reason(&plain), None);
    }
}
