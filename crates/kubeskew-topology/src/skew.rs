use std::collections::BTreeMap;

use crate::zones::NodeZoneIndex;

/// Zone that pods on nodes missing from the index are counted under.
///
/// Label values cannot contain `<`, so this never collides with a real zone.
pub const UNKNOWN_ZONE: &str = "<unknown>";

/// Difference between the most and least populated zone.
///
/// Order-independent; a single zone always yields 0. Callers seed every
/// known zone, so the map is never empty in practice; an empty map yields 0.
pub fn calculate_skew(counts: &BTreeMap<String, u32>) -> u32 {
    match (counts.values().min(), counts.values().max()) {
        (Some(min), Some(max)) => max - min,
        _ => 0,
    }
}

/// Pod count per zone for one deployment, iterated in zone order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZoneCounts {
    counts: BTreeMap<String, u32>,
}

impl ZoneCounts {
    /// Start with every zone of the index at zero
    pub fn seeded(index: &NodeZoneIndex) -> Self {
        Self {
            counts: index
                .zones()
                .into_iter()
                .map(|zone| (zone.to_string(), 0))
                .collect(),
        }
    }

    /// Count one more pod in `zone`, adding the zone if it is new
    pub fn increment(&mut self, zone: &str) {
        *self.counts.entry(zone.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, zone: &str) -> Option<u32> {
        self.counts.get(zone).copied()
    }

    /// Zones and counts, alphabetically by zone
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(zone, count)| (zone.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total pods counted
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn skew(&self) -> u32 {
        calculate_skew(&self.counts)
    }
}

impl From<BTreeMap<String, u32>> for ZoneCounts {
    fn from(counts: BTreeMap<String, u32>) -> Self {
        Self { counts }
    }
}
