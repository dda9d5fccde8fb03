use log::{debug, info, warn};

use crate::builder::{Reduce, TierMapsBuilder};
use crate::config::*;
use crate::matcher::TierMaps;
use crate::normalize::MatchKeys;
use crate::roster::RateHistoryRow;
use crate::waitlist::project_real_ratio;

/// Growth factors learned from past cycles: one per key and tier, plus the
/// factor of the whole pool used when no key matches.
#[derive(PartialEq, Debug, Clone)]
pub struct GrowthPatterns {
    pub maps: TierMaps<f64>,
    pub overall: f64,
    pub num_samples: usize,
}

impl GrowthPatterns {
    /// No history: every record keeps its current ratio.
    pub fn neutral() -> GrowthPatterns {
        GrowthPatterns {
            maps: TierMaps::default(),
            overall: 1.0,
            num_samples: 0,
        }
    }

    /// Builds the patterns from the rate-history rows.
    ///
    /// A past cycle yields a sample `final / day` when both ratios are positive
    /// and the quotient lies within the bounds of `rules`. Samples out of the
    /// bounds are dropped before any aggregation.
    pub fn build(rows: &[RateHistoryRow], rules: &GrowthRules) -> Result<GrowthPatterns, EnrichmentErrors> {
        rules.validate()?;
        let mut builder: TierMapsBuilder<f64> = TierMapsBuilder::new();
        let mut pool: Vec<f64> = Vec::new();
        let mut rejected = 0usize;
        for row in rows.iter() {
            for year in row.years.iter() {
                if year.day_ratio <= 0.0 || year.final_ratio <= 0.0 {
                    continue;
                }
                let sample = year.final_ratio / year.day_ratio;
                if !rules.accepts(sample) {
                    rejected += 1;
                    continue;
                }
                builder.add(&row.university, Some(row.group), &row.department, sample);
                pool.push(sample);
            }
        }
        debug!("growth: {} samples out of bounds", rejected);

        let policy = rules.aggregation;
        let overall = match policy.reduce(&pool) {
            Some(f) => f,
            None => {
                warn!("growth: the rate history has no usable sample, using factor 1.0");
                1.0
            }
        };
        let num_samples = builder.num_samples();
        let maps = builder.build(&policy, &policy, &policy);
        info!(
            "growth: {} samples from {} rows, overall factor {:.3} ({:?})",
            num_samples,
            rows.len(),
            overall,
            policy
        );
        Ok(GrowthPatterns {
            maps,
            overall,
            num_samples,
        })
    }

    pub fn resolve(&self, keys: &MatchKeys) -> (f64, MatchTier) {
        self.maps.resolve(keys, self.overall)
    }
}

/// Sets the growth factor of a record and recomputes both projections. The
/// real ratio uses the wait-list count already on the record.
pub fn apply_growth(patterns: &GrowthPatterns, keys: &MatchKeys, current_ratio: f64, record: &mut EnrichedRecord) {
    let (factor, tier) = patterns.resolve(keys);
    record.growth_factor = factor;
    record.growth_tier = tier;
    record.projected_final_ratio = current_ratio * factor;
    record.projected_real_ratio = project_real_ratio(
        record.projected_final_ratio,
        record.record.capacity,
        record.waitlist_count,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::YearSnapshot;

    fn row(univ: &str, group: AdmissionGroup, dept: &str, years: &[(f64, f64)]) -> RateHistoryRow {
        RateHistoryRow {
            university: univ.to_string(),
            group,
            department: dept.to_string(),
            years: years
                .iter()
                .map(|(d, f)| YearSnapshot {
                    day_ratio: *d,
                    final_ratio: *f,
                })
                .collect(),
        }
    }

    #[test]
    fn outliers_are_dropped_before_aggregation() {
        let base = [(2.0, 2.2), (2.0, 2.4), (2.0, 2.6)];
        let with_outlier = |x: f64| {
            let mut years = base.to_vec();
            years.push((1.0, x));
            vec![row("가야대학교", AdmissionGroup::GroupA, "간호학과", &years)]
        };
        let a = GrowthPatterns::build(&with_outlier(500.0), &GrowthRules::default()).unwrap();
        let b = GrowthPatterns::build(&with_outlier(5000.0), &GrowthRules::default()).unwrap();
        assert_eq!(a.num_samples, 3);
        assert_eq!(a.overall, b.overall);
        let expected = 1.2;
        assert!((a.overall - expected).abs() < 1e-9);
        let keys = MatchKeys::new("가야대", AdmissionGroup::GroupA, "간호학과");
        let (factor, tier) = a.resolve(&keys);
        assert_eq!(tier, MatchTier::Exact);
        assert!((factor - expected).abs() < 1e-9);
    }

    #[test]
    fn non_positive_ratios_are_ignored() {
        let rows = vec![row(
            "가야대학교",
            AdmissionGroup::GroupA,
            "간호학과",
            &[(0.0, 3.0), (2.0, 0.0), (2.0, 3.0)],
        )];
        let patterns = GrowthPatterns::build(&rows, &GrowthRules::default()).unwrap();
        assert_eq!(patterns.num_samples, 1);
        assert_eq!(patterns.overall, 1.5);
    }

    #[test]
    fn same_day_rules_use_mean_and_narrow_bounds() {
        let rows = vec![row(
            "가야대학교",
            AdmissionGroup::GroupB,
            "치위생과",
            &[(1.0, 1.0), (1.0, 2.0), (1.0, 6.0), (1.0, 30.0)],
        )];
        let median = GrowthPatterns::build(&rows, &GrowthRules::default()).unwrap();
        assert_eq!(median.overall, 4.0);
        let mean = GrowthPatterns::build(&rows, &GrowthRules::same_day()).unwrap();
        assert_eq!(mean.num_samples, 3);
        assert_eq!(mean.overall, 3.0);
    }

    #[test]
    fn empty_history_is_neutral() {
        let patterns = GrowthPatterns::build(&[], &GrowthRules::default()).unwrap();
        assert_eq!(patterns.overall, 1.0);
        let keys = MatchKeys::new("가야대", AdmissionGroup::GroupA, "간호학과");
        assert_eq!(patterns.resolve(&keys), (1.0, MatchTier::Default));
        assert_eq!(GrowthPatterns::neutral().resolve(&keys), (1.0, MatchTier::Default));
    }

    #[test]
    fn invalid_rules() {
        let rules = GrowthRules {
            min_ratio: 2.0,
            max_ratio: 1.0,
            aggregation: FactorPolicy::Median,
        };
        assert!(GrowthPatterns::build(&[], &rules).is_err());
    }
}
