//! Typed rows of the three historical rosters.
//!
//! A roster arrives as a grid of cell texts addressed by `(row, column)`. The
//! layouts below give the column of each field; their defaults match the files
//! published for the 2025 cycle.

use std::fmt::Display;

use crate::config::AdmissionGroup;
use crate::normalize::normalize_group;
use crate::shapes::{parse_count, parse_leading_int, parse_rate};

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

// ********* Regional roster ***********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RegionEntry {
    pub region: String,
    pub university: String,
    /// Some regional rows carry no group; they still count for the university.
    pub group: Option<AdmissionGroup>,
    pub department: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RegionLayout {
    pub first_data_row: usize,
    pub region: usize,
    pub university: usize,
    pub group: usize,
    pub department: usize,
}

impl Default for RegionLayout {
    fn default() -> Self {
        RegionLayout {
            first_data_row: 2,
            region: 0,
            university: 1,
            group: 3,
            department: 6,
        }
    }
}

/// Rows without a region or a university are skipped.
pub fn region_entries(rows: &[Vec<String>], layout: &RegionLayout) -> Vec<RegionEntry> {
    rows.iter()
        .skip(layout.first_data_row)
        .filter_map(|row| {
            let region = cell(row, layout.region);
            let university = cell(row, layout.university);
            if region.is_empty() || university.is_empty() {
                return None;
            }
            Some(RegionEntry {
                region: region.to_string(),
                university: university.to_string(),
                group: normalize_group(cell(row, layout.group)),
                department: cell(row, layout.department).to_string(),
            })
        })
        .collect()
}

// ********* Wait-list roster ***********

/// Final results of the previous cycle for one department.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct WaitlistEntry {
    pub university: String,
    pub group: AdmissionGroup,
    pub department: String,
    pub capacity: Option<u32>,
    pub final_ratio: String,
    /// Applicants admitted from the wait list (작년추합).
    pub waitlist_count: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct WaitlistLayout {
    pub first_data_row: usize,
    pub university: usize,
    pub group: usize,
    pub department: usize,
    pub capacity: usize,
    pub ratio: usize,
    pub waitlist: usize,
}

impl Default for WaitlistLayout {
    fn default() -> Self {
        WaitlistLayout {
            first_data_row: 3,
            university: 1,
            group: 2,
            department: 3,
            capacity: 4,
            ratio: 5,
            waitlist: 6,
        }
    }
}

/// Rows without a university or a readable group are skipped. A wait-list
/// cell that does not start with a number counts as 0.
pub fn waitlist_entries(rows: &[Vec<String>], layout: &WaitlistLayout) -> Vec<WaitlistEntry> {
    rows.iter()
        .skip(layout.first_data_row)
        .filter_map(|row| {
            let university = cell(row, layout.university);
            if university.is_empty() {
                return None;
            }
            let group = normalize_group(cell(row, layout.group))?;
            Some(WaitlistEntry {
                university: university.to_string(),
                group,
                department: cell(row, layout.department).to_string(),
                capacity: parse_count(cell(row, layout.capacity)),
                final_ratio: cell(row, layout.ratio).to_string(),
                waitlist_count: parse_leading_int(cell(row, layout.waitlist)),
            })
        })
        .collect()
}

// ********* Rate-history roster ***********

/// The point of the application window a live scrape is compared against.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum SnapshotDay {
    ThreeDaysBefore,
    TwoDaysBefore,
    OneDayBefore,
    ClosingMorning,
    ClosingAfternoon,
}

impl SnapshotDay {
    pub const ALL: [SnapshotDay; 5] = [
        SnapshotDay::ThreeDaysBefore,
        SnapshotDay::TwoDaysBefore,
        SnapshotDay::OneDayBefore,
        SnapshotDay::ClosingMorning,
        SnapshotDay::ClosingAfternoon,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SnapshotDay::ThreeDaysBefore => "3일전",
            SnapshotDay::TwoDaysBefore => "2일전",
            SnapshotDay::OneDayBefore => "1일전",
            SnapshotDay::ClosingMorning => "마감오전",
            SnapshotDay::ClosingAfternoon => "마감오후",
        }
    }

    /// Accepts the column labels, their position "1" to "5", and the
    /// 1일차/2일차/3일차 names used for the first days of the window.
    pub fn from_label(s: &str) -> Option<SnapshotDay> {
        let s = s.trim();
        if let Some(day) = SnapshotDay::ALL.into_iter().find(|d| d.label() == s) {
            return Some(day);
        }
        match s {
            "1" | "1일차" => Some(SnapshotDay::ThreeDaysBefore),
            "2" | "2일차" => Some(SnapshotDay::TwoDaysBefore),
            "3" | "3일차" => Some(SnapshotDay::OneDayBefore),
            "4" => Some(SnapshotDay::ClosingMorning),
            "5" => Some(SnapshotDay::ClosingAfternoon),
            _ => None,
        }
    }

    fn position(&self) -> usize {
        match self {
            SnapshotDay::ThreeDaysBefore => 0,
            SnapshotDay::TwoDaysBefore => 1,
            SnapshotDay::OneDayBefore => 2,
            SnapshotDay::ClosingMorning => 3,
            SnapshotDay::ClosingAfternoon => 4,
        }
    }
}

impl Default for SnapshotDay {
    fn default() -> Self {
        SnapshotDay::ThreeDaysBefore
    }
}

impl Display for SnapshotDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The columns of one past cycle: one per snapshot day, then the final ratio.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct YearColumns {
    pub year: u16,
    pub days: [usize; 5],
    pub final_ratio: usize,
}

impl YearColumns {
    /// The layout repeats every 7 columns; `days_start` is the 3일전 column.
    pub fn starting_at(year: u16, days_start: usize) -> YearColumns {
        YearColumns {
            year,
            days: [
                days_start,
                days_start + 1,
                days_start + 2,
                days_start + 3,
                days_start + 4,
            ],
            final_ratio: days_start + 5,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RateHistoryLayout {
    pub first_data_row: usize,
    pub university: usize,
    pub group: usize,
    pub department: usize,
    pub years: Vec<YearColumns>,
}

impl Default for RateHistoryLayout {
    fn default() -> Self {
        RateHistoryLayout {
            first_data_row: 2,
            university: 0,
            group: 1,
            department: 4,
            years: vec![
                YearColumns::starting_at(2024, 7),
                YearColumns::starting_at(2023, 14),
                YearColumns::starting_at(2022, 21),
            ],
        }
    }
}

/// Ratios of one past cycle at the chosen day and at closing. 0 stands for a
/// missing or unreadable cell.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct YearSnapshot {
    pub day_ratio: f64,
    pub final_ratio: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct RateHistoryRow {
    pub university: String,
    pub group: AdmissionGroup,
    pub department: String,
    pub years: Vec<YearSnapshot>,
}

/// Rows without a university or a readable group are skipped.
pub fn rate_history_rows(
    rows: &[Vec<String>],
    layout: &RateHistoryLayout,
    day: SnapshotDay,
) -> Vec<RateHistoryRow> {
    rows.iter()
        .skip(layout.first_data_row)
        .filter_map(|row| {
            let university = cell(row, layout.university);
            if university.is_empty() {
                return None;
            }
            let group = normalize_group(cell(row, layout.group))?;
            let years = layout
                .years
                .iter()
                .map(|y| YearSnapshot {
                    day_ratio: parse_rate(cell(row, y.days[day.position()])),
                    final_ratio: parse_rate(cell(row, y.final_ratio)),
                })
                .collect();
            Some(RateHistoryRow {
                university: university.to_string(),
                group,
                department: cell(row, layout.department).to_string(),
                years,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn default_year_columns() {
        let layout = RateHistoryLayout::default();
        assert_eq!(layout.years[0].days, [7, 8, 9, 10, 11]);
        assert_eq!(layout.years[0].final_ratio, 12);
        assert_eq!(layout.years[1].days[0], 14);
        assert_eq!(layout.years[1].final_ratio, 19);
        assert_eq!(layout.years[2].days[4], 25);
        assert_eq!(layout.years[2].final_ratio, 26);
    }

    #[test]
    fn snapshot_day_labels() {
        assert_eq!(SnapshotDay::from_label("마감오전"), Some(SnapshotDay::ClosingMorning));
        assert_eq!(SnapshotDay::from_label("2"), Some(SnapshotDay::TwoDaysBefore));
        assert_eq!(SnapshotDay::from_label("3일차"), Some(SnapshotDay::OneDayBefore));
        assert_eq!(SnapshotDay::from_label("내일"), None);
        assert_eq!(SnapshotDay::default().label(), "3일전");
    }

    #[test]
    fn regions() {
        let rows = grid(&[
            &["지역", "대학명"],
            &[""],
            &["경남", "가야대학교", "", "가", "", "", "간호학과"],
            &["경남", "가야대학교", "", "", "", "", ""],
            &["", "무지역대학교", "", "나", "", "", "수학과"],
            &["서울"],
        ]);
        let entries = region_entries(&rows, &RegionLayout::default());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].group, Some(AdmissionGroup::GroupA));
        assert_eq!(entries[0].department, "간호학과");
        assert_eq!(entries[1].group, None);
    }

    #[test]
    fn waitlist() {
        let rows = grid(&[
            &["title"],
            &["header"],
            &["sub header"],
            &["1", "가야대학교", "가", "간호학과", "20", "5.10", "12"],
            &["2", "가야대학교", "나", "치위생과", "15", "3.2", ""],
            &["3", "가야대학교", "기타", "수학과", "10", "2.0", "3"],
            &["4", "", "가", "수학과", "10", "2.0", "3"],
        ]);
        let entries = waitlist_entries(&rows, &WaitlistLayout::default());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].waitlist_count, 12);
        assert_eq!(entries[0].capacity, Some(20));
        assert_eq!(entries[1].waitlist_count, 0);
        assert_eq!(entries[1].group, AdmissionGroup::GroupB);
    }

    #[test]
    fn rate_history() {
        let mut row: Vec<String> = vec![String::new(); 27];
        row[0] = "가야대학교".to_string();
        row[1] = "가".to_string();
        row[4] = "간호학과".to_string();
        row[7] = "2.00".to_string();
        row[9] = "3.00".to_string();
        row[12] = "6.00".to_string();
        row[14] = "1.5 : 1".to_string();
        row[19] = "4.5 : 1".to_string();
        let rows = vec![vec![], vec![], row];

        let three = rate_history_rows(&rows, &RateHistoryLayout::default(), SnapshotDay::ThreeDaysBefore);
        assert_eq!(three.len(), 1);
        assert_eq!(three[0].years.len(), 3);
        assert_eq!(three[0].years[0], YearSnapshot { day_ratio: 2.0, final_ratio: 6.0 });
        assert_eq!(three[0].years[1], YearSnapshot { day_ratio: 1.5, final_ratio: 4.5 });
        assert_eq!(three[0].years[2], YearSnapshot { day_ratio: 0.0, final_ratio: 0.0 });

        let one = rate_history_rows(&rows, &RateHistoryLayout::default(), SnapshotDay::OneDayBefore);
        assert_eq!(one[0].years[0].day_ratio, 3.0);
    }
}
