use std::collections::{BTreeMap, HashMap};

use log::info;

use crate::builder::{LabelPolicy, TierMapsBuilder};
use crate::config::*;
use crate::matcher::TierMaps;
use crate::normalize::MatchKeys;
use crate::roster::RegionEntry;

/// The region of records no tier could place.
pub const UNCLASSIFIED_REGION: &str = "미분류";

/// How the region of a (university, group) pair is picked when the roster
/// lists several. The exact tier is always last-write-wins and the university
/// tier is always a frequency vote.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RegionRules {
    pub group_policy: LabelPolicy,
}

impl Default for RegionRules {
    fn default() -> Self {
        RegionRules {
            group_policy: LabelPolicy::LastWriteWins,
        }
    }
}

pub fn build_region_maps(
    entries: &[RegionEntry],
    rules: &RegionRules,
) -> Result<TierMaps<String>, EnrichmentErrors> {
    if entries.is_empty() {
        return Err(EnrichmentErrors::EmptyRoster {
            roster: "region".to_string(),
        });
    }
    let mut builder: TierMapsBuilder<String> = TierMapsBuilder::new();
    for e in entries.iter() {
        builder.add(&e.university, e.group, &e.department, e.region.clone());
    }
    let maps = builder.build(
        &LabelPolicy::LastWriteWins,
        &rules.group_policy,
        &LabelPolicy::FrequencyVote,
    );
    info!(
        "region: {} entries, {} exact keys, {} group keys, {} universities",
        entries.len(),
        maps.exact.len(),
        maps.group.len(),
        maps.univ.len()
    );
    Ok(maps)
}

/// Sets the region of a record.
pub fn apply_region(maps: &TierMaps<String>, keys: &MatchKeys, record: &mut EnrichedRecord) {
    let (region, tier) = maps.resolve(keys, UNCLASSIFIED_REGION.to_string());
    record.region = region;
    record.region_tier = tier;
}

/// The university tier, ordered by university key: the table the dashboard
/// uses to filter by region.
pub fn university_regions(maps: &TierMaps<String>) -> BTreeMap<String, String> {
    maps.univ
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Record counts of one region.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RegionStat {
    pub region: String,
    pub group_a: usize,
    pub group_b: usize,
    pub group_c: usize,
    pub total: usize,
}

/// Per-region counts, largest region first. Equal totals are ordered by label.
pub fn region_statistics(groups: &EnrichedGroups) -> Vec<RegionStat> {
    let mut by_region: HashMap<&str, RegionStat> = HashMap::new();
    for r in groups.iter() {
        let stat = by_region.entry(r.region.as_str()).or_insert_with(|| RegionStat {
            region: r.region.clone(),
            ..RegionStat::default()
        });
        match r.group {
            AdmissionGroup::GroupA => stat.group_a += 1,
            AdmissionGroup::GroupB => stat.group_b += 1,
            AdmissionGroup::GroupC => stat.group_c += 1,
        }
        stat.total += 1;
    }
    let mut stats: Vec<RegionStat> = by_region.into_values().collect();
    stats.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.region.cmp(&b.region)));
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(region: &str, univ: &str, group: Option<AdmissionGroup>, dept: &str) -> RegionEntry {
        RegionEntry {
            region: region.to_string(),
            university: univ.to_string(),
            group,
            department: dept.to_string(),
        }
    }

    fn entries() -> Vec<RegionEntry> {
        vec![
            entry("충남", "나사렛대학교", Some(AdmissionGroup::GroupA), "간호학과"),
            entry("대전", "나사렛대학교", Some(AdmissionGroup::GroupA), "사회복지학과"),
            entry("대전", "나사렛대학교", Some(AdmissionGroup::GroupB), "재활학과"),
            entry("충남", "나사렛대학교", None, ""),
            entry("충남", "나사렛대학교", Some(AdmissionGroup::GroupC), "음악과"),
        ]
    }

    #[test]
    fn empty_roster_is_an_error() {
        assert_eq!(
            build_region_maps(&[], &RegionRules::default()),
            Err(EnrichmentErrors::EmptyRoster {
                roster: "region".to_string()
            })
        );
    }

    #[test]
    fn tier_policies() {
        let maps = build_region_maps(&entries(), &RegionRules::default()).unwrap();
        assert_eq!(maps.exact.get("나사렛|가군|간호학과"), Some(&"충남".to_string()));
        // Last write wins within a group.
        assert_eq!(maps.group.get("나사렛|가군"), Some(&"대전".to_string()));
        // 3 votes for 충남 against 2 for 대전, the row without a group included.
        assert_eq!(maps.univ.get("나사렛"), Some(&"충남".to_string()));
    }

    #[test]
    fn frequency_vote_group_policy() {
        let rules = RegionRules {
            group_policy: LabelPolicy::FrequencyVote,
        };
        let maps = build_region_maps(&entries(), &rules).unwrap();
        // 1 vote each, first seen wins.
        assert_eq!(maps.group.get("나사렛|가군"), Some(&"충남".to_string()));
    }

    #[test]
    fn statistics_order() {
        let record = |region: &str, group: AdmissionGroup| EnrichedRecord {
            record: CanonicalRecord {
                university: "가야대학교".to_string(),
                campus: String::new(),
                track: String::new(),
                department: "간호학과".to_string(),
                capacity: 10,
                applicants: 10,
                current_ratio: "1.00 : 1".to_string(),
            },
            group,
            region: region.to_string(),
            region_tier: MatchTier::Exact,
            waitlist_count: 0,
            waitlist_tier: MatchTier::Default,
            growth_factor: 1.0,
            growth_tier: MatchTier::Default,
            projected_final_ratio: 1.0,
            projected_real_ratio: 1.0,
        };
        let groups = EnrichedGroups {
            group_a: vec![record("경남", AdmissionGroup::GroupA), record("서울", AdmissionGroup::GroupA)],
            group_b: vec![record("서울", AdmissionGroup::GroupB)],
            group_c: vec![record("강원", AdmissionGroup::GroupC)],
        };
        let stats = region_statistics(&groups);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].region, "서울");
        assert_eq!(stats[0].group_a, 1);
        assert_eq!(stats[0].group_b, 1);
        assert_eq!(stats[0].total, 2);
        assert_eq!(stats[1].region, "강원");
        assert_eq!(stats[2].region, "경남");
    }
}
