use calamine::DataType;
use std::path::Path;

/// The file name of a path, for the log messages.
pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The text of a spreadsheet cell, as a CSV export would show it.
pub fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        // Counts are usually stored as floats.
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(f) => f.to_string(),
        DataType::Empty | DataType::Error(_) => String::new(),
        #[allow(unreachable_patterns)]
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::Float(50.0)), "50");
        assert_eq!(cell_to_string(&DataType::Float(4.25)), "4.25");
        assert_eq!(cell_to_string(&DataType::Int(-3)), "-3");
        assert_eq!(cell_to_string(&DataType::String(" 간호학과 ".to_string())), "간호학과");
        assert_eq!(cell_to_string(&DataType::Empty), "");
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/data/rosters/regions.xlsx"), "regions.xlsx");
        assert_eq!(simplify_file_name("regions.csv"), "regions.csv");
    }
}
