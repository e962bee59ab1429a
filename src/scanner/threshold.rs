use std::collections::BTreeMap;

/// Maximum row count tolerated for `model` before it counts as leaking.
///
/// Models without an entry get 0, so any row is a leak.
pub fn threshold_for(thresholds: &BTreeMap<String, u64>, model: &str) -> u64 {
    thresholds.get(model).copied().unwrap_or(0)
}
