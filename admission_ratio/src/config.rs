// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One of the three parallel national application rounds.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum AdmissionGroup {
    /// 가군
    GroupA,
    /// 나군
    GroupB,
    /// 다군
    GroupC,
}

impl AdmissionGroup {
    /// All the groups, in the order they are reported.
    pub const ALL: [AdmissionGroup; 3] = [
        AdmissionGroup::GroupA,
        AdmissionGroup::GroupB,
        AdmissionGroup::GroupC,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AdmissionGroup::GroupA => "가군",
            AdmissionGroup::GroupB => "나군",
            AdmissionGroup::GroupC => "다군",
        }
    }

    /// Reads a group label. The historical rosters use the short form ("가"),
    /// the live site uses the long form ("가군").
    pub fn from_label(s: &str) -> Option<AdmissionGroup> {
        match s.trim() {
            "가" | "가군" => Some(AdmissionGroup::GroupA),
            "나" | "나군" => Some(AdmissionGroup::GroupB),
            "다" | "다군" => Some(AdmissionGroup::GroupC),
            _ => None,
        }
    }
}

impl Display for AdmissionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A table as scraped from an admission page.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub heading: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// All the tables scraped for one university.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ScrapedUniversity {
    pub university: String,
    /// The "last updated" text of the page, when the page shows one.
    pub update_time: Option<String>,
    /// Set by the fetcher when the page could not be scraped.
    pub error: Option<String>,
    pub details: Vec<RawTable>,
}

/// A department row once campus and track inheritance has been resolved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CanonicalRecord {
    pub university: String,
    pub campus: String,
    pub track: String,
    pub department: String,
    pub capacity: u32,
    pub applicants: u32,
    /// Display string, for example "5.00 : 1".
    pub current_ratio: String,
}

/// The organizer output: one bucket per group plus the rows whose group could
/// not be read from the table heading.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct OrganizedRecords {
    pub group_a: Vec<CanonicalRecord>,
    pub group_b: Vec<CanonicalRecord>,
    pub group_c: Vec<CanonicalRecord>,
    pub other: Vec<CanonicalRecord>,
}

impl OrganizedRecords {
    pub fn group(&self, group: AdmissionGroup) -> &[CanonicalRecord] {
        match group {
            AdmissionGroup::GroupA => &self.group_a,
            AdmissionGroup::GroupB => &self.group_b,
            AdmissionGroup::GroupC => &self.group_c,
        }
    }

    pub(crate) fn bucket_mut(&mut self, group: Option<AdmissionGroup>) -> &mut Vec<CanonicalRecord> {
        match group {
            Some(AdmissionGroup::GroupA) => &mut self.group_a,
            Some(AdmissionGroup::GroupB) => &mut self.group_b,
            Some(AdmissionGroup::GroupC) => &mut self.group_c,
            None => &mut self.other,
        }
    }

    /// The three enrichable buckets, in group order.
    pub fn groups(&self) -> impl Iterator<Item = (AdmissionGroup, &[CanonicalRecord])> {
        AdmissionGroup::ALL.into_iter().map(|g| (g, self.group(g)))
    }

    /// Total number of records, including the "other" bucket.
    pub fn len(&self) -> usize {
        self.group_a.len() + self.group_b.len() + self.group_c.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ******** Output data structures *********

/// The lookup tier that resolved a value.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MatchTier {
    /// university + group + department
    Exact,
    /// university + group
    GroupLevel,
    /// university only
    UniversityLevel,
    /// nothing matched, the stage default was used
    Default,
}

impl MatchTier {
    pub fn label(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::GroupLevel => "group",
            MatchTier::UniversityLevel => "univ",
            MatchTier::Default => "default",
        }
    }
}

/// A record after the region, wait-list and growth stages.
#[derive(PartialEq, Debug, Clone)]
pub struct EnrichedRecord {
    pub record: CanonicalRecord,
    pub group: AdmissionGroup,
    pub region: String,
    pub region_tier: MatchTier,
    pub waitlist_count: u32,
    pub waitlist_tier: MatchTier,
    pub growth_factor: f64,
    pub growth_tier: MatchTier,
    pub projected_final_ratio: f64,
    pub projected_real_ratio: f64,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct EnrichedGroups {
    pub group_a: Vec<EnrichedRecord>,
    pub group_b: Vec<EnrichedRecord>,
    pub group_c: Vec<EnrichedRecord>,
}

impl EnrichedGroups {
    pub fn group(&self, group: AdmissionGroup) -> &[EnrichedRecord] {
        match group {
            AdmissionGroup::GroupA => &self.group_a,
            AdmissionGroup::GroupB => &self.group_b,
            AdmissionGroup::GroupC => &self.group_c,
        }
    }

    pub(crate) fn group_mut(&mut self, group: AdmissionGroup) -> &mut Vec<EnrichedRecord> {
        match group {
            AdmissionGroup::GroupA => &mut self.group_a,
            AdmissionGroup::GroupB => &mut self.group_b,
            AdmissionGroup::GroupC => &mut self.group_c,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedRecord> {
        self.group_a
            .iter()
            .chain(self.group_b.iter())
            .chain(self.group_c.iter())
    }

    pub fn len(&self) -> usize {
        self.group_a.len() + self.group_b.len() + self.group_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Errors that prevent an enrichment run from starting.
#[derive(PartialEq, Debug, Clone)]
pub enum EnrichmentErrors {
    /// A required roster produced no usable row.
    EmptyRoster { roster: String },
    /// The growth sample bounds are not usable.
    InvalidGrowthRules { min_ratio: f64, max_ratio: f64 },
}

impl Error for EnrichmentErrors {}

impl Display for EnrichmentErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentErrors::EmptyRoster { roster } => {
                write!(f, "roster {} has no usable rows", roster)
            }
            EnrichmentErrors::InvalidGrowthRules {
                min_ratio,
                max_ratio,
            } => write!(
                f,
                "growth bounds must satisfy 0 < min <= max, got [{}, {}]",
                min_ratio, max_ratio
            ),
        }
    }
}

// ********* Configuration **********

/// How the samples sharing a key are reduced to one growth factor.
///
/// - Median is robust to the surging departments that appear every year.
/// - Mean is what the older same-day comparison reported. It is kept so that
/// its numbers can be reproduced.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FactorPolicy {
    Median,
    Mean,
}

/// Bounds and aggregation for the growth samples.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct GrowthRules {
    /// Samples with final/day-N below this are discarded.
    pub min_ratio: f64,
    /// Samples with final/day-N above this are discarded.
    pub max_ratio: f64,
    pub aggregation: FactorPolicy,
}

impl GrowthRules {
    pub const DEFAULT_RULES: GrowthRules = GrowthRules {
        min_ratio: 0.5,
        max_ratio: 100.0,
        aggregation: FactorPolicy::Median,
    };

    /// The narrower variant used when comparing against the same day of previous years.
    pub fn same_day() -> GrowthRules {
        GrowthRules {
            min_ratio: 0.5,
            max_ratio: 20.0,
            aggregation: FactorPolicy::Mean,
        }
    }

    pub fn validate(&self) -> Result<(), EnrichmentErrors> {
        if self.min_ratio > 0.0 && self.min_ratio <= self.max_ratio {
            Ok(())
        } else {
            Err(EnrichmentErrors::InvalidGrowthRules {
                min_ratio: self.min_ratio,
                max_ratio: self.max_ratio,
            })
        }
    }

    pub fn accepts(&self, ratio: f64) -> bool {
        ratio >= self.min_ratio && ratio <= self.max_ratio
    }
}

impl Default for GrowthRules {
    fn default() -> Self {
        GrowthRules::DEFAULT_RULES
    }
}
