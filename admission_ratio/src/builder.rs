pub use crate::config::*;
use crate::matcher::TierMaps;
use crate::normalize::{exact_key, group_key, normalize_department, normalize_university};

use std::collections::HashMap;

/// Reduces all the samples sharing one key to a single value.
pub trait Reduce<V> {
    /// `samples` is never empty and is in arrival order.
    fn reduce(&self, samples: &[V]) -> Option<V>;
}

/// Policies for text values such as region labels.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum LabelPolicy {
    LastWriteWins,
    /// The most frequent value. Ties go to the value seen first.
    FrequencyVote,
}

/// Policies for integer counts such as wait-list promotions.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CountPolicy {
    LastWriteWins,
    RoundedMean,
}

impl Reduce<String> for LabelPolicy {
    fn reduce(&self, samples: &[String]) -> Option<String> {
        match self {
            LabelPolicy::LastWriteWins => samples.last().cloned(),
            LabelPolicy::FrequencyVote => {
                let mut counts: Vec<(&String, usize)> = Vec::new();
                for s in samples {
                    match counts.iter_mut().find(|(label, _)| *label == s) {
                        Some(entry) => entry.1 += 1,
                        None => counts.push((s, 1)),
                    }
                }
                let mut best: Option<(&String, usize)> = None;
                for (label, count) in counts {
                    match best {
                        Some((_, best_count)) if best_count >= count => {}
                        _ => best = Some((label, count)),
                    }
                }
                best.map(|(label, _)| label.clone())
            }
        }
    }
}

impl Reduce<u32> for CountPolicy {
    fn reduce(&self, samples: &[u32]) -> Option<u32> {
        match self {
            CountPolicy::LastWriteWins => samples.last().copied(),
            CountPolicy::RoundedMean if samples.is_empty() => None,
            CountPolicy::RoundedMean => {
                let sum: u64 = samples.iter().map(|x| *x as u64).sum();
                Some((sum as f64 / samples.len() as f64).round() as u32)
            }
        }
    }
}

impl Reduce<f64> for FactorPolicy {
    fn reduce(&self, samples: &[f64]) -> Option<f64> {
        match self {
            FactorPolicy::Median => median(samples),
            FactorPolicy::Mean => mean(samples),
        }
    }
}

pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// A builder for the lookup maps of one enrichment stage.
///
/// Every roster row is added as a sample; the reduction policies are only
/// applied in [`TierMapsBuilder::build`], once the full roster has been read.
///
/// ```
/// use admission_ratio::builder::{LabelPolicy, TierMapsBuilder};
/// use admission_ratio::AdmissionGroup;
///
/// let mut builder: TierMapsBuilder<String> = TierMapsBuilder::new();
/// builder.add("가야대학교", Some(AdmissionGroup::GroupA), "간호학과", "경남".to_string());
/// builder.add("가야대학교", Some(AdmissionGroup::GroupB), "", "경남".to_string());
///
/// let maps = builder.build(
///     &LabelPolicy::LastWriteWins,
///     &LabelPolicy::LastWriteWins,
///     &LabelPolicy::FrequencyVote,
/// );
/// assert_eq!(maps.univ.get("가야"), Some(&"경남".to_string()));
/// ```
pub struct TierMapsBuilder<V> {
    pub(crate) _exact: HashMap<String, Vec<V>>,
    pub(crate) _group: HashMap<String, Vec<V>>,
    pub(crate) _univ: HashMap<String, Vec<V>>,
    pub(crate) _num_samples: usize,
}

impl<V: Clone> TierMapsBuilder<V> {
    pub fn new() -> TierMapsBuilder<V> {
        TierMapsBuilder {
            _exact: HashMap::new(),
            _group: HashMap::new(),
            _univ: HashMap::new(),
            _num_samples: 0,
        }
    }

    /// Adds one sample.
    ///
    /// The sample always counts toward its university. It counts toward the
    /// group tier only when the group is known, and toward the exact tier only
    /// when the department is also non-empty.
    pub fn add(
        &mut self,
        university: &str,
        group: Option<AdmissionGroup>,
        department: &str,
        value: V,
    ) {
        let univ = normalize_university(university);
        if let Some(g) = group {
            if !department.trim().is_empty() {
                let dept = normalize_department(department);
                self._exact
                    .entry(exact_key(&univ, g, &dept))
                    .or_default()
                    .push(value.clone());
            }
            self._group
                .entry(group_key(&univ, g))
                .or_default()
                .push(value.clone());
        }
        self._univ.entry(univ).or_default().push(value);
        self._num_samples += 1;
    }

    pub fn num_samples(&self) -> usize {
        self._num_samples
    }

    pub fn build(
        self,
        exact: &impl Reduce<V>,
        group: &impl Reduce<V>,
        univ: &impl Reduce<V>,
    ) -> TierMaps<V> {
        TierMaps {
            exact: reduce_all(self._exact, exact),
            group: reduce_all(self._group, group),
            univ: reduce_all(self._univ, univ),
        }
    }
}

impl<V: Clone> Default for TierMapsBuilder<V> {
    fn default() -> Self {
        TierMapsBuilder::new()
    }
}

fn reduce_all<V>(samples: HashMap<String, Vec<V>>, policy: &impl Reduce<V>) -> HashMap<String, V> {
    samples
        .into_iter()
        .filter_map(|(key, values)| policy.reduce(&values).map(|v| (key, v)))
        .collect()
}
