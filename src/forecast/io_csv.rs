// Primitives for reading CSV rosters.

use crate::forecast::io_common::simplify_file_name;
use crate::forecast::*;

/// Reads a CSV file as a grid of cell texts, starting at the first line. Lines
/// may have different lengths.
pub fn read_csv_grid(path: &str) -> ForecastResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut grid: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // Line numbers start at 1, as in a spreadsheet.
        let line = line_r.context(CsvLineParseSnafu {
            path,
            lineno: idx + 1,
        })?;
        grid.push(line.iter().map(|s| s.trim().to_string()).collect());
    }
    info!(
        "read_csv_grid: {}: {} rows",
        simplify_file_name(path),
        grid.len()
    );
    Ok(grid)
}
