use std::fmt::Display;

use crate::config::ScrapedUniversity;
use crate::shapes::parse_leading_int;

const APPLICANT_HEADER: &str = "지원";

/// A difference between two scrapes of the same university.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ScrapeChange {
    /// Nothing usable was known before.
    NewData,
    UpdateTime { old: String, new: String },
    RowCount { old: usize, new: usize },
    ApplicantSum { old: u64, new: u64 },
}

impl Display for ScrapeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeChange::NewData => write!(f, "새로운 데이터"),
            ScrapeChange::UpdateTime { old, new } => write!(f, "업데이트 시간: {} → {}", old, new),
            ScrapeChange::RowCount { old, new } => write!(f, "모집단위 수: {} → {}", old, new),
            ScrapeChange::ApplicantSum { old, new } => write!(f, "총 지원인원: {} → {}", old, new),
        }
    }
}

fn row_count(s: &ScrapedUniversity) -> usize {
    s.details.iter().map(|t| t.rows.len()).sum()
}

/// Sum of the first applicant column of every table. Tables without such a
/// column count for nothing.
pub fn applicant_sum(s: &ScrapedUniversity) -> u64 {
    s.details
        .iter()
        .filter_map(|t| {
            let idx = t.headers.iter().position(|h| h.contains(APPLICANT_HEADER))?;
            Some(
                t.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|c| parse_leading_int(&c.replace(',', "")) as u64)
                    .sum::<u64>(),
            )
        })
        .sum()
}

/// What changed for one university between two scrapes.
///
/// A missing or empty previous scrape is reported as new data. A new scrape
/// without tables reports nothing.
pub fn compare_scrapes(old: Option<&ScrapedUniversity>, new: &ScrapedUniversity) -> Vec<ScrapeChange> {
    let old = match old {
        Some(o) if !o.details.is_empty() => o,
        _ => return vec![ScrapeChange::NewData],
    };
    if new.details.is_empty() {
        return vec![];
    }
    let mut changes = Vec::new();
    if old.update_time != new.update_time {
        changes.push(ScrapeChange::UpdateTime {
            old: old.update_time.clone().unwrap_or_default(),
            new: new.update_time.clone().unwrap_or_default(),
        });
    }
    let (old_rows, new_rows) = (row_count(old), row_count(new));
    if old_rows != new_rows {
        changes.push(ScrapeChange::RowCount {
            old: old_rows,
            new: new_rows,
        });
    }
    let (old_sum, new_sum) = (applicant_sum(old), applicant_sum(new));
    if old_sum != new_sum {
        changes.push(ScrapeChange::ApplicantSum {
            old: old_sum,
            new: new_sum,
        });
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawTable;

    fn scrape(time: &str, rows: &[(&str, &str)]) -> ScrapedUniversity {
        ScrapedUniversity {
            university: "가야대학교".to_string(),
            update_time: Some(time.to_string()),
            error: None,
            details: vec![RawTable {
                heading: "가군 일반 경쟁률".to_string(),
                headers: vec!["모집단위".to_string(), "지원인원".to_string()],
                rows: rows
                    .iter()
                    .map(|(d, n)| vec![d.to_string(), n.to_string()])
                    .collect(),
            }],
        }
    }

    #[test]
    fn new_data() {
        let new = scrape("10:00", &[("간호학과", "10")]);
        assert_eq!(compare_scrapes(None, &new), vec![ScrapeChange::NewData]);
        let empty = ScrapedUniversity::default();
        assert_eq!(compare_scrapes(Some(&empty), &new), vec![ScrapeChange::NewData]);
    }

    #[test]
    fn unchanged() {
        let a = scrape("10:00", &[("간호학과", "1,010")]);
        assert!(compare_scrapes(Some(&a), &a.clone()).is_empty());
        assert!(compare_scrapes(Some(&a), &ScrapedUniversity::default()).is_empty());
    }

    #[test]
    fn all_changes() {
        let a = scrape("10:00", &[("간호학과", "1,010")]);
        let b = scrape("11:00", &[("간호학과", "1,020"), ("물리치료학과", "-")]);
        let changes = compare_scrapes(Some(&a), &b);
        assert_eq!(
            changes,
            vec![
                ScrapeChange::UpdateTime {
                    old: "10:00".to_string(),
                    new: "11:00".to_string()
                },
                ScrapeChange::RowCount { old: 1, new: 2 },
                ScrapeChange::ApplicantSum { old: 1010, new: 1020 },
            ]
        );
        assert_eq!(changes[2].to_string(), "총 지원인원: 1010 → 1020");
    }
}
