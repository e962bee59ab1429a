use serde::Serialize;
use std::collections::BTreeMap;

/// Models found leaking by one scan, keyed by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LeakReport {
    leaks: BTreeMap<String, u64>,
}

impl LeakReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, model: &str, rows: u64) {
        self.leaks.insert(model.to_string(), rows);
    }

    pub fn is_empty(&self) -> bool {
        self.leaks.is_empty()
    }

    /// Number of leaking models
    pub fn len(&self) -> usize {
        self.leaks.len()
    }

    pub fn get(&self, model: &str) -> Option<u64> {
        self.leaks.get(model).copied()
    }

    pub fn contains(&self, model: &str) -> bool {
        self.leaks.contains_key(model)
    }

    pub fn models(&self) -> Vec<&str> {
        self.leaks.keys().map(|s| s.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.leaks.iter().map(|(name, rows)| (name.as_str(), *rows))
    }

    /// Rows left behind across every leaking model
    pub fn total_rows(&self) -> u64 {
        self.leaks.values().sum()
    }

    pub fn into_map(self) -> BTreeMap<String, u64> {
        self.leaks
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LeakReport {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            leaks: iter.into_iter().map(|(name, rows)| (name.into(), rows)).collect(),
        }
    }
}
