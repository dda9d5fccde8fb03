use crate::config::*;

const UNDER_SUBSCRIBED: f64 = 1.0;
const LOW_COMPETITION: f64 = 3.0;

/// Headline numbers for a set of enriched records.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct GroupSummary {
    pub count: usize,
    /// 0 when there is no record.
    pub mean_growth: f64,
    /// Projected real ratio at most 1: more seats than applicants.
    pub at_most_one: usize,
    pub at_most_three: usize,
}

impl GroupSummary {
    fn of<'a>(records: impl Iterator<Item = &'a EnrichedRecord>) -> GroupSummary {
        let mut s = GroupSummary::default();
        let mut growth_sum = 0.0;
        for r in records {
            s.count += 1;
            growth_sum += r.growth_factor;
            if r.projected_real_ratio <= UNDER_SUBSCRIBED {
                s.at_most_one += 1;
            }
            if r.projected_real_ratio <= LOW_COMPETITION {
                s.at_most_three += 1;
            }
        }
        if s.count > 0 {
            s.mean_growth = growth_sum / s.count as f64;
        }
        s
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct PredictionSummary {
    pub groups: Vec<(AdmissionGroup, GroupSummary)>,
    pub total: GroupSummary,
}

pub fn prediction_summary(groups: &EnrichedGroups) -> PredictionSummary {
    PredictionSummary {
        groups: AdmissionGroup::ALL
            .into_iter()
            .map(|g| (g, GroupSummary::of(groups.group(g).iter())))
            .collect(),
        total: GroupSummary::of(groups.iter()),
    }
}
