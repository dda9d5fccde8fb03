// Primitives for reading Excel rosters.

use calamine::{open_workbook, Reader, Xlsx};

use crate::forecast::io_common::{cell_to_string, simplify_file_name};
use crate::forecast::*;

/// Reads a worksheet as a grid of cell texts. Without a name, the first
/// worksheet is read.
///
/// Row and column indexes of the grid are the ones of the sheet: the empty
/// rows and columns before the used range are padded.
pub fn read_xlsx_grid(path: &str, worksheet: Option<&str>) -> ForecastResult<Vec<Vec<String>>> {
    debug!(
        "read_xlsx_grid: path: {:?} worksheet: {:?}",
        path, worksheet
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let range_o = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    };
    let wrange = range_o
        .context(MissingWorksheetSnafu {
            worksheet: worksheet.map(|s| s.to_string()),
            path,
        })?
        .context(OpeningExcelSnafu { path })?;

    let (row_offset, col_offset) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut grid: Vec<Vec<String>> = vec![vec![]; row_offset];
    for row in wrange.rows() {
        let mut cells = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        grid.push(cells);
    }
    info!(
        "read_xlsx_grid: {}: {} rows",
        simplify_file_name(path),
        grid.len()
    );
    Ok(grid)
}
