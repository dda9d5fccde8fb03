//! Recovers department rows from irregular scraped tables.
//!
//! Extraction runs in two phases. The header phase maps columns by keywords in
//! the header row; it is trusted when the row is as wide as the header (or when
//! nothing else is available). The positional phase reads the row from the
//! right: ratio, applicants, capacity, then the text cells before them. Each
//! field takes the header value when it validates and the positional value
//! otherwise.

use log::debug;

use crate::config::RawTable;
use crate::shapes::*;

const MIN_USABLE_CELLS: usize = 3;
const FALLBACK_DEPARTMENT_MAX_CHARS: usize = 50;
const IGNORED_TEXT: [&str; 1] = ["홈페이지"];

/// Campus and track carried to the next row of the same table, standing in for
/// cells a rowspan removed.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RowCarry {
    pub campus: String,
    pub track: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExtractedRow {
    pub campus: String,
    pub track: String,
    pub department: String,
    pub capacity: u32,
    pub applicants: u32,
    pub ratio: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SkipReason {
    Subtotal,
    TooFewCells,
    NoDepartment,
    NonNumericCapacity,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RowOutcome {
    pub row: Result<ExtractedRow, SkipReason>,
    pub carry: RowCarry,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Field {
    Campus,
    College,
    Department,
    Capacity,
    Applicants,
    Ratio,
    Track,
}

struct HeaderRule {
    field: Field,
    matches: fn(&str) -> bool,
}

// One rule per field. A new site quirk is a new entry here.
const HEADER_RULES: [HeaderRule; 7] = [
    HeaderRule {
        field: Field::Campus,
        matches: |h| h.contains("캠퍼스"),
    },
    HeaderRule {
        field: Field::College,
        matches: |h| h == "대학" || (h.contains("대학") && !h.contains("모집")),
    },
    HeaderRule {
        field: Field::Department,
        matches: |h| h.contains("모집단위"),
    },
    HeaderRule {
        field: Field::Capacity,
        matches: |h| h.contains("모집인원"),
    },
    HeaderRule {
        field: Field::Applicants,
        matches: |h| h.contains("지원인원"),
    },
    HeaderRule {
        field: Field::Ratio,
        matches: |h| h.contains("경쟁률"),
    },
    HeaderRule {
        field: Field::Track,
        matches: |h| h.contains("전형") && !h.contains("전형명") && !h.contains("전형요소"),
    },
];

/// Column positions found in a header row. Each field takes the first header
/// that matches its rule.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ColumnIndex {
    campus: Option<usize>,
    college: Option<usize>,
    department: Option<usize>,
    capacity: Option<usize>,
    applicants: Option<usize>,
    ratio: Option<usize>,
    track: Option<usize>,
    width: usize,
}

impl ColumnIndex {
    pub fn from_headers(headers: &[String]) -> ColumnIndex {
        let mut index = ColumnIndex {
            width: headers.len(),
            ..ColumnIndex::default()
        };
        for rule in HEADER_RULES.iter() {
            let pos = headers.iter().position(|h| (rule.matches)(h.trim()));
            *index.slot(rule.field) = pos;
        }
        index
    }

    fn slot(&mut self, field: Field) -> &mut Option<usize> {
        match field {
            Field::Campus => &mut self.campus,
            Field::College => &mut self.college,
            Field::Department => &mut self.department,
            Field::Capacity => &mut self.capacity,
            Field::Applicants => &mut self.applicants,
            Field::Ratio => &mut self.ratio,
            Field::Track => &mut self.track,
        }
    }

    fn aligned_with(&self, cells: &[String]) -> bool {
        self.width > 0 && self.width == cells.len()
    }
}

/// Field values proposed by one phase. Every value has already been validated
/// against its shape.
#[derive(Debug, Default)]
struct Candidates<'a> {
    campus: Option<&'a str>,
    department: Option<&'a str>,
    capacity: Option<&'a str>,
    applicants: Option<&'a str>,
    ratio: Option<&'a str>,
    track: Option<&'a str>,
}

fn cell_at<'a>(cells: &'a [String], idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| cells.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

fn header_phase<'a>(cells: &'a [String], index: &ColumnIndex) -> Candidates<'a> {
    let campus = cell_at(cells, index.campus)
        .filter(|s| !is_numeric(s) && !is_slogan_shaped(s) && !is_major_name_shaped(s))
        .or_else(|| cell_at(cells, index.college).filter(|s| is_campus_shaped(s)));
    Candidates {
        campus,
        department: cell_at(cells, index.department)
            .filter(|s| !is_numeric(s) && !is_slogan_shaped(s)),
        capacity: cell_at(cells, index.capacity).filter(|s| is_numeric(s)),
        applicants: cell_at(cells, index.applicants).filter(|s| is_numeric(s)),
        ratio: cell_at(cells, index.ratio).filter(|s| is_ratio_shaped(s)),
        track: cell_at(cells, index.track).filter(|s| is_track_shaped(s)),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct NumericRun {
    ratio: usize,
    applicants: Option<usize>,
    capacity: Option<usize>,
}

impl NumericRun {
    /// Cells left of this index are text candidates.
    fn text_end(&self) -> usize {
        self.capacity.or(self.applicants).unwrap_or(self.ratio)
    }
}

// Right to left: the first ratio-shaped cell, then the next two numeric cells.
fn locate_numeric_run(cells: &[String]) -> Option<NumericRun> {
    let ratio = cells.iter().rposition(|c| is_ratio_shaped(c.trim()))?;
    let mut numeric = cells[..ratio]
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, c)| is_numeric(c))
        .map(|(i, _)| i);
    let applicants = numeric.next();
    let capacity = numeric.next();
    Some(NumericRun {
        ratio,
        applicants,
        capacity,
    })
}

fn positional_phase(cells: &[String]) -> Candidates<'_> {
    let run = match locate_numeric_run(cells) {
        Some(run) => run,
        None => return Candidates::default(),
    };
    let texts: Vec<&str> = cells[..run.text_end()]
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty() && !IGNORED_TEXT.contains(c))
        .collect();

    let (department, campus) = find_department(&texts);
    Candidates {
        campus,
        department,
        capacity: cell_at(cells, run.capacity),
        applicants: cell_at(cells, run.applicants),
        ratio: cell_at(cells, Some(run.ratio)),
        track: None,
    }
}

// Scans the text cells right to left for a major name, then falls back to any
// short text. The cell just before the department is the campus when it looks
// like one.
fn find_department<'a>(texts: &[&'a str]) -> (Option<&'a str>, Option<&'a str>) {
    let campus_before = |i: usize| -> Option<&'a str> {
        i.checked_sub(1)
            .map(|j| texts[j])
            .filter(|prev| !is_slogan_shaped(prev) && is_campus_shaped(prev))
    };
    let major = texts
        .iter()
        .rposition(|t| !is_slogan_shaped(t) && is_major_name_shaped(t));
    let fallback = || {
        texts.iter().rposition(|t| {
            !is_slogan_shaped(t)
                && !is_numeric(t)
                && !is_campus_shaped(t)
                && t.chars().count() < FALLBACK_DEPARTMENT_MAX_CHARS
        })
    };
    match major.or_else(fallback) {
        Some(i) => (Some(texts[i]), campus_before(i)),
        None => (None, None),
    }
}

/// Extracts one data row.
///
/// Subtotal rows and rows with fewer than three non-empty cells are skipped
/// before extraction and leave the carry untouched. Any other row updates the
/// carry, even when it is skipped afterwards.
pub fn extract_row(cells: &[String], index: &ColumnIndex, carry: &RowCarry) -> RowOutcome {
    let skip_early = |reason| RowOutcome {
        row: Err(reason),
        carry: carry.clone(),
    };
    if is_subtotal_row(cells) {
        return skip_early(SkipReason::Subtotal);
    }
    if cells.iter().filter(|c| !c.trim().is_empty()).count() < MIN_USABLE_CELLS {
        return skip_early(SkipReason::TooFewCells);
    }

    let positional = positional_phase(cells);
    let use_header = index.aligned_with(cells) || positional.ratio.is_none();
    let header = if use_header {
        header_phase(cells, index)
    } else {
        Candidates::default()
    };

    let campus = header
        .campus
        .or(positional.campus)
        .map(|s| s.to_string())
        .unwrap_or_else(|| carry.campus.clone());
    let track = header
        .track
        .or(positional.track)
        .map(|s| s.to_string())
        .unwrap_or_else(|| carry.track.clone());
    let next_carry = RowCarry {
        campus: campus.clone(),
        track: track.clone(),
    };

    let department = match header.department.or(positional.department) {
        Some(d) if !is_numeric(d) => d.to_string(),
        _ => {
            debug!("extract_row: no department in {:?}", cells);
            return RowOutcome {
                row: Err(SkipReason::NoDepartment),
                carry: next_carry,
            };
        }
    };
    // The three counts come from one alignment: the header columns when their
    // ratio cell holds a ratio (or no ratio exists anywhere), the positional run
    // otherwise.
    let counts = if header.ratio.is_some() || positional.ratio.is_none() {
        &header
    } else {
        &positional
    };
    let capacity = match counts.capacity.and_then(parse_count) {
        Some(c) => c,
        None => {
            debug!("extract_row: capacity is not numeric in {:?}", cells);
            return RowOutcome {
                row: Err(SkipReason::NonNumericCapacity),
                carry: next_carry,
            };
        }
    };
    let applicants = counts.applicants.and_then(parse_count).unwrap_or(0);
    let ratio = counts.ratio.unwrap_or_default().to_string();

    RowOutcome {
        row: Ok(ExtractedRow {
            campus,
            track,
            department,
            capacity,
            applicants,
            ratio,
        }),
        carry: next_carry,
    }
}

/// Row counts for one table, per outcome.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct SkipCounts {
    pub subtotal: usize,
    pub too_few_cells: usize,
    pub no_department: usize,
    pub non_numeric_capacity: usize,
}

impl SkipCounts {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Subtotal => self.subtotal += 1,
            SkipReason::TooFewCells => self.too_few_cells += 1,
            SkipReason::NoDepartment => self.no_department += 1,
            SkipReason::NonNumericCapacity => self.non_numeric_capacity += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.subtotal + self.too_few_cells + self.no_department + self.non_numeric_capacity
    }
}

impl std::ops::AddAssign for SkipCounts {
    fn add_assign(&mut self, rhs: SkipCounts) {
        self.subtotal += rhs.subtotal;
        self.too_few_cells += rhs.too_few_cells;
        self.no_department += rhs.no_department;
        self.non_numeric_capacity += rhs.non_numeric_capacity;
    }
}

/// Extracts all the rows of a table. The carry starts empty for the campus and
/// with `initial_track` for the track, and never leaves the table.
pub fn extract_table(table: &RawTable, initial_track: &str) -> (Vec<ExtractedRow>, SkipCounts) {
    let index = ColumnIndex::from_headers(&table.headers);
    let start = RowCarry {
        campus: String::new(),
        track: initial_track.to_string(),
    };
    let (rows, skipped, _) = table.rows.iter().fold(
        (Vec::new(), SkipCounts::default(), start),
        |(mut rows, mut skipped, carry), cells| {
            let outcome = extract_row(cells, &index, &carry);
            match outcome.row {
                Ok(row) => rows.push(row),
                Err(reason) => skipped.record(reason),
            }
            (rows, skipped, outcome.carry)
        },
    );
    (rows, skipped)
}
