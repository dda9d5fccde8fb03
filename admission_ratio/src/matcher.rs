use std::collections::HashMap;

use crate::config::MatchTier;
use crate::normalize::MatchKeys;

/// The three lookup maps of one enrichment stage.
///
/// Built once from a roster (see [`crate::builder::TierMapsBuilder`]) and only
/// read afterwards.
#[derive(PartialEq, Debug, Clone)]
pub struct TierMaps<V> {
    pub exact: HashMap<String, V>,
    pub group: HashMap<String, V>,
    pub univ: HashMap<String, V>,
}

impl<V> Default for TierMaps<V> {
    fn default() -> Self {
        TierMaps {
            exact: HashMap::new(),
            group: HashMap::new(),
            univ: HashMap::new(),
        }
    }
}

impl<V: Clone> TierMaps<V> {
    /// Looks up the keys tier by tier. The first hit wins; `default` is
    /// returned with [`MatchTier::Default`] when no tier has the key.
    pub fn resolve(&self, keys: &MatchKeys, default: V) -> (V, MatchTier) {
        if let Some(v) = self.exact.get(&keys.exact) {
            (v.clone(), MatchTier::Exact)
        } else if let Some(v) = self.group.get(&keys.group) {
            (v.clone(), MatchTier::GroupLevel)
        } else if let Some(v) = self.univ.get(&keys.univ) {
            (v.clone(), MatchTier::UniversityLevel)
        } else {
            (default, MatchTier::Default)
        }
    }
}

impl<V> TierMaps<V> {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.group.is_empty() && self.univ.is_empty()
    }
}

/// How many records each tier resolved during one stage.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct MatchCounts {
    pub exact: usize,
    pub group: usize,
    pub univ: usize,
    pub default: usize,
}

impl MatchCounts {
    pub fn record(&mut self, tier: MatchTier) {
        match tier {
            MatchTier::Exact => self.exact += 1,
            MatchTier::GroupLevel => self.group += 1,
            MatchTier::UniversityLevel => self.univ += 1,
            MatchTier::Default => self.default += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exact + self.group + self.univ + self.default
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdmissionGroup;

    fn keys() -> MatchKeys {
        MatchKeys::new("가야대학교", AdmissionGroup::GroupA, "간호학과")
    }

    #[test]
    fn exact_wins_over_group() {
        let mut maps: TierMaps<u32> = TierMaps::default();
        maps.exact.insert("가야|가군|간호학과".to_string(), 7);
        maps.group.insert("가야|가군".to_string(), 30);
        maps.univ.insert("가야".to_string(), 50);
        assert_eq!(maps.resolve(&keys(), 0), (7, MatchTier::Exact));
    }

    #[test]
    fn falls_through_tiers() {
        let mut maps: TierMaps<u32> = TierMaps::default();
        maps.univ.insert("가야".to_string(), 50);
        assert_eq!(maps.resolve(&keys(), 0), (50, MatchTier::UniversityLevel));
        maps.group.insert("가야|가군".to_string(), 30);
        assert_eq!(maps.resolve(&keys(), 0), (30, MatchTier::GroupLevel));
    }

    #[test]
    fn empty_maps_use_default() {
        let maps: TierMaps<String> = TierMaps::default();
        assert!(maps.is_empty());
        assert_eq!(
            maps.resolve(&keys(), "미분류".to_string()),
            ("미분류".to_string(), MatchTier::Default)
        );
    }

    #[test]
    fn counts_per_tier() {
        let mut counts = MatchCounts::default();
        counts.record(MatchTier::Exact);
        counts.record(MatchTier::Exact);
        counts.record(MatchTier::Default);
        assert_eq!(counts.exact, 2);
        assert_eq!(counts.default, 1);
        assert_eq!(counts.total(), 3);
    }
}
