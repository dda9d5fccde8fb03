//! Turns scraped admission tables into projected competition ratios.
//!
//! The pipeline has two halves:
//! - [`organizer::organize`] recovers one [`CanonicalRecord`] per department
//!   from the irregular tables of a scrape and groups them by admission group.
//! - [`enrich`] attaches a region, last year's wait-list count and a growth
//!   factor to every record of 가군/나군/다군, each resolved by the three-tier
//!   matcher against a historical roster, and projects the final and real
//!   ratios.
//!
//! See the [`manual`] for the roster layouts and the output fields.

mod config;
mod shapes;

pub mod builder;
pub mod changes;
pub mod growth;
pub mod heading;
pub mod manual;
pub mod matcher;
pub mod normalize;
pub mod organizer;
pub mod region;
pub mod roster;
pub mod row;
pub mod summary;
pub mod waitlist;

use log::info;

pub use crate::config::*;
use crate::growth::{apply_growth, GrowthPatterns};
use crate::matcher::{MatchCounts, TierMaps};
use crate::normalize::MatchKeys;
use crate::region::{apply_region, UNCLASSIFIED_REGION};
use crate::waitlist::{apply_waitlist, project_real_ratio, DEFAULT_WAITLIST};

pub use crate::shapes::parse_rate;

/// Per-stage match counts of one enrichment run.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct EnrichmentReport {
    pub region: MatchCounts,
    pub waitlist: MatchCounts,
    pub growth: MatchCounts,
    /// Universities with at least one record on the growth default, in order of
    /// first appearance.
    pub growth_unmatched: Vec<String>,
}

impl EnrichmentReport {
    fn record(&mut self, r: &EnrichedRecord) {
        self.region.record(r.region_tier);
        self.waitlist.record(r.waitlist_tier);
        self.growth.record(r.growth_tier);
        if r.growth_tier == MatchTier::Default
            && !self.growth_unmatched.contains(&r.record.university)
        {
            self.growth_unmatched.push(r.record.university.clone());
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct EnrichmentOutcome {
    pub groups: EnrichedGroups,
    pub report: EnrichmentReport,
}

/// Enriches every record of 가군/나군/다군. Records of the `other` bucket are
/// not enriched.
///
/// The stages run region, wait-list, then growth. Each stage reads what the
/// previous one wrote on the record: the growth stage recomputes the real ratio
/// with the wait-list count already resolved.
///
/// Lookups that match nothing are never an error; they take the stage default
/// and are counted in the report.
pub fn enrich(
    organized: &OrganizedRecords,
    region: &TierMaps<String>,
    waitlist: &TierMaps<u32>,
    growth: &GrowthPatterns,
) -> EnrichmentOutcome {
    info!(
        "enrich: {} records to enrich, {} without a group left out",
        organized.len() - organized.other.len(),
        organized.other.len()
    );
    let mut groups = EnrichedGroups::default();
    let mut report = EnrichmentReport::default();
    for (group, records) in organized.groups() {
        let out = groups.group_mut(group);
        for r in records.iter() {
            let enriched = enrich_record(r, group, region, waitlist, growth);
            report.record(&enriched);
            out.push(enriched);
        }
    }

    for (stage, counts) in [
        ("region", &report.region),
        ("waitlist", &report.waitlist),
        ("growth", &report.growth),
    ] {
        info!(
            "enrich: {}: exact {}, group {}, univ {}, default {}",
            stage, counts.exact, counts.group, counts.univ, counts.default
        );
    }
    if !report.growth_unmatched.is_empty() {
        info!(
            "enrich: {} universities use the overall growth factor: {:?}",
            report.growth_unmatched.len(),
            report.growth_unmatched
        );
    }
    EnrichmentOutcome { groups, report }
}

fn enrich_record(
    record: &CanonicalRecord,
    group: AdmissionGroup,
    region: &TierMaps<String>,
    waitlist: &TierMaps<u32>,
    growth: &GrowthPatterns,
) -> EnrichedRecord {
    let keys = MatchKeys::new(&record.university, group, &record.department);
    let current = parse_rate(&record.current_ratio);
    let mut enriched = EnrichedRecord {
        record: record.clone(),
        group,
        region: UNCLASSIFIED_REGION.to_string(),
        region_tier: MatchTier::Default,
        waitlist_count: DEFAULT_WAITLIST,
        waitlist_tier: MatchTier::Default,
        growth_factor: 1.0,
        growth_tier: MatchTier::Default,
        projected_final_ratio: current,
        projected_real_ratio: project_real_ratio(current, record.capacity, DEFAULT_WAITLIST),
    };
    apply_region(region, &keys, &mut enriched);
    apply_waitlist(waitlist, &keys, &mut enriched);
    apply_growth(growth, &keys, current, &mut enriched);
    enriched
}
