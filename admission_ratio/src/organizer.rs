use log::{debug, info};

use crate::config::*;
use crate::heading::classify_heading;
use crate::row::{extract_table, SkipCounts};

/// Counters for one organizer run. Only logged.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct OrganizeStats {
    pub universities: usize,
    /// Universities skipped because the fetcher reported an error or no table.
    pub failed_universities: usize,
    pub tables: usize,
    pub rows: usize,
    pub kept: usize,
    pub skipped: SkipCounts,
}

/// Groups every recoverable department row of a scrape by admission group.
///
/// Rows of tables whose heading carries no group label go to `other`.
pub fn organize(scrape: &[ScrapedUniversity]) -> (OrganizedRecords, OrganizeStats) {
    let mut organized = OrganizedRecords::default();
    let mut stats = OrganizeStats::default();

    for univ in scrape.iter() {
        stats.universities += 1;
        if univ.error.is_some() || univ.details.is_empty() {
            debug!(
                "organize: skipping {}: {}",
                univ.university,
                univ.error.as_deref().unwrap_or("no tables")
            );
            stats.failed_universities += 1;
            continue;
        }
        for table in univ.details.iter() {
            let heading = classify_heading(&table.heading);
            let (rows, skipped) = extract_table(table, &heading.track);
            debug!(
                "organize: {} {:?} {:?}: {} rows kept out of {}",
                univ.university,
                heading.group,
                heading.track,
                rows.len(),
                table.rows.len()
            );
            stats.tables += 1;
            stats.rows += table.rows.len();
            stats.kept += rows.len();
            stats.skipped += skipped;

            let bucket = organized.bucket_mut(heading.group);
            bucket.extend(rows.into_iter().map(|r| CanonicalRecord {
                university: univ.university.clone(),
                campus: r.campus,
                track: r.track,
                department: r.department,
                capacity: r.capacity,
                applicants: r.applicants,
                current_ratio: r.ratio,
            }));
        }
    }

    info!(
        "organize: {} universities ({} skipped), {} tables, {} of {} rows kept",
        stats.universities, stats.failed_universities, stats.tables, stats.kept, stats.rows
    );
    info!(
        "organize: 가군 {}, 나군 {}, 다군 {}, 기타 {}",
        organized.group_a.len(),
        organized.group_b.len(),
        organized.group_c.len(),
        organized.other.len()
    );
    (organized, stats)
}
