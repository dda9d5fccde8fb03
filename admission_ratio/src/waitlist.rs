use log::info;

use crate::builder::{CountPolicy, TierMapsBuilder};
use crate::config::*;
use crate::matcher::TierMaps;
use crate::normalize::MatchKeys;
use crate::roster::WaitlistEntry;

/// Wait-list count assumed when no tier matches: no promotion at all.
pub const DEFAULT_WAITLIST: u32 = 0;

/// Exact keys keep the last roster value, the wider tiers the rounded mean.
pub fn build_waitlist_maps(entries: &[WaitlistEntry]) -> Result<TierMaps<u32>, EnrichmentErrors> {
    if entries.is_empty() {
        return Err(EnrichmentErrors::EmptyRoster {
            roster: "waitlist".to_string(),
        });
    }
    let mut builder: TierMapsBuilder<u32> = TierMapsBuilder::new();
    for e in entries.iter() {
        builder.add(&e.university, Some(e.group), &e.department, e.waitlist_count);
    }
    let maps = builder.build(
        &CountPolicy::LastWriteWins,
        &CountPolicy::RoundedMean,
        &CountPolicy::RoundedMean,
    );
    info!(
        "waitlist: {} entries, {} exact keys, {} group keys, {} universities",
        entries.len(),
        maps.exact.len(),
        maps.group.len(),
        maps.univ.len()
    );
    Ok(maps)
}

/// The ratio once the wait list has been admitted:
/// `final * capacity / (capacity + waitlist)`, and 0 when nobody can be admitted.
pub fn project_real_ratio(projected_final_ratio: f64, capacity: u32, waitlist_count: u32) -> f64 {
    let seats = capacity as u64 + waitlist_count as u64;
    if seats == 0 {
        0.0
    } else {
        projected_final_ratio * capacity as f64 / seats as f64
    }
}

/// Sets the wait-list count of a record and recomputes its real ratio from the
/// final ratio already on the record.
pub fn apply_waitlist(maps: &TierMaps<u32>, keys: &MatchKeys, record: &mut EnrichedRecord) {
    let (count, tier) = maps.resolve(keys, DEFAULT_WAITLIST);
    record.waitlist_count = count;
    record.waitlist_tier = tier;
    record.projected_real_ratio =
        project_real_ratio(record.projected_final_ratio, record.record.capacity, count);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(univ: &str, group: AdmissionGroup, dept: &str, count: u32) -> WaitlistEntry {
        WaitlistEntry {
            university: univ.to_string(),
            group,
            department: dept.to_string(),
            capacity: None,
            final_ratio: String::new(),
            waitlist_count: count,
        }
    }

    #[test]
    fn real_ratio_formula() {
        let final_ratio = 3.0 * 2.0;
        assert_eq!(final_ratio, 6.0);
        assert_eq!(project_real_ratio(final_ratio, 100, 50), 4.0);
    }

    #[test]
    fn zero_seats() {
        let r = project_real_ratio(6.0, 0, 0);
        assert_eq!(r, 0.0);
        assert!(!r.is_nan());
        assert_eq!(project_real_ratio(6.0, 0, 5), 0.0);
    }

    #[test]
    fn empty_roster_is_an_error() {
        assert!(matches!(
            build_waitlist_maps(&[]),
            Err(EnrichmentErrors::EmptyRoster { .. })
        ));
    }

    #[test]
    fn averaged_tiers() {
        let maps = build_waitlist_maps(&[
            entry("한밭대학교", AdmissionGroup::GroupA, "건축학과", 5),
            entry("한밭대학교", AdmissionGroup::GroupA, "건축학과", 7),
            entry("한밭대학교", AdmissionGroup::GroupA, "전자공학과", 10),
            entry("한밭대학교", AdmissionGroup::GroupB, "수학과", 1),
        ])
        .unwrap();
        assert_eq!(maps.exact.get("한밭|가군|건축학과"), Some(&7));
        assert_eq!(maps.group.get("한밭|가군"), Some(&7));
        assert_eq!(maps.group.get("한밭|나군"), Some(&1));
        // (5 + 7 + 10 + 1) / 4 = 5.75
        assert_eq!(maps.univ.get("한밭"), Some(&6));
    }

    #[test]
    fn unmatched_record_assumes_no_promotion() {
        let maps = build_waitlist_maps(&[entry("한밭대학교", AdmissionGroup::GroupA, "건축학과", 5)])
            .unwrap();
        let keys = MatchKeys::new("가야대학교", AdmissionGroup::GroupA, "간호학과");
        assert_eq!(maps.resolve(&keys, DEFAULT_WAITLIST), (0, MatchTier::Default));
    }
}
