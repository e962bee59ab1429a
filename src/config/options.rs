use crate::core::Result;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};

/// Environment variable that switches brutal mode on (`1`, `true`, `yes`).
pub const BRUTAL_ENV: &str = "DB_PLUMBER_BRUTAL";

/// Environment variable holding a comma separated list of ignored adapters.
pub const IGNORED_ADAPTERS_ENV: &str = "DB_PLUMBER_IGNORED_ADAPTERS";

/// Options for a single leak inspection.
///
/// # Examples
///
/// ```
/// use dbplumber::InspectOptions;
///
/// let options = InspectOptions::new()
///     .ignore_model("AuditLog")
///     .ignore_adapter("SQLite")
///     .threshold("Country", 250)
///     .brutal(true);
///
/// assert_eq!(options.threshold_for("Country"), 250);
/// assert!(options.brutal);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectOptions {
    /// Models never inspected, whatever their row count
    pub ignored_models: BTreeSet<String>,

    /// Adapter identifiers whose models are skipped (case-insensitive)
    pub ignored_adapters: BTreeSet<String>,

    /// Maximum tolerated row count per model
    #[serde(deserialize_with = "deserialize_thresholds")]
    pub model_thresholds: BTreeMap<String, u64>,

    /// Terminate the process as soon as a leak is reported
    pub brutal: bool,
}

impl InspectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON document.
    ///
    /// Thresholds may be given as numbers or as strings, which use their
    /// leading integer prefix.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default options overlaid with the process environment
    pub fn from_env() -> Self {
        Self::new().with_env()
    }

    /// Overlay `DB_PLUMBER_BRUTAL` and `DB_PLUMBER_IGNORED_ADAPTERS`.
    pub fn with_env(self) -> Self {
        self.with_vars(
            std::env::var(BRUTAL_ENV).ok().as_deref(),
            std::env::var(IGNORED_ADAPTERS_ENV).ok().as_deref(),
        )
    }

    fn with_vars(mut self, brutal: Option<&str>, adapters: Option<&str>) -> Self {
        if let Some(value) = brutal {
            self.brutal = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }
        if let Some(list) = adapters {
            self.ignored_adapters.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        self
    }

    pub fn ignore_model(mut self, model: impl Into<String>) -> Self {
        self.ignored_models.insert(model.into());
        self
    }

    pub fn ignore_adapter(mut self, adapter: impl Into<String>) -> Self {
        self.ignored_adapters.insert(adapter.into());
        self
    }

    pub fn threshold(mut self, model: impl Into<String>, max_rows: u64) -> Self {
        self.model_thresholds.insert(model.into(), max_rows);
        self
    }

    pub fn brutal(mut self, brutal: bool) -> Self {
        self.brutal = brutal;
        self
    }

    /// Resolved threshold for `model` (0 when not configured)
    pub fn threshold_for(&self, model: &str) -> u64 {
        crate::scanner::threshold::threshold_for(&self.model_thresholds, model)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawThreshold {
    Int(u64),
    Float(f64),
    Text(String),
}

impl RawThreshold {
    /// Integer coercion: fractions truncate, negatives and junk become 0.
    fn coerce(self) -> u64 {
        match self {
            RawThreshold::Int(n) => n,
            RawThreshold::Float(f) if f > 0.0 => f as u64,
            RawThreshold::Float(_) => 0,
            RawThreshold::Text(s) => leading_integer(&s),
        }
    }
}

/// Integer prefix of `text`: `"12abc"` is 12, `"2.9"` is 2, `"-3"` and `"abc"` are 0.
fn leading_integer(text: &str) -> u64 {
    let text = text.trim_start();
    let text = text.strip_prefix('+').unwrap_or(text);
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    match &text[..end] {
        "" => 0,
        digits => digits.parse().unwrap_or(u64::MAX),
    }
}

fn deserialize_thresholds<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, RawThreshold>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(model, value)| (model, value.coerce())).collect())
}
