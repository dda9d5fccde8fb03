use log::{debug, info, warn};

use admission_ratio::growth::GrowthPatterns;
use admission_ratio::organizer::organize;
use admission_ratio::region::{build_region_maps, region_statistics, university_regions};
use admission_ratio::roster::*;
use admission_ratio::summary::prediction_summary;
use admission_ratio::waitlist::build_waitlist_maps;
use admission_ratio::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{ChangesArgs, EnrichArgs, OrganizeArgs};
use crate::forecast::config_reader::*;
use crate::forecast::io_json::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum ForecastError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet {worksheet:?} in file {path}"))]
    MissingWorksheet {
        worksheet: Option<String>,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of file {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot read a column or row index from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Unknown provider {provider:?} for file {path}"))]
    UnknownProvider { provider: String, path: String },
    #[snafu(display("The {name} roster is required but {path} does not exist"))]
    MissingRequiredSource { name: String, path: String },
    #[snafu(display("The {name} is not set, on the command line or in the configuration"))]
    MissingSetting { name: String },
    #[snafu(display("Unknown snapshot day {day:?}"))]
    UnknownSnapshotDay { day: String },
    #[snafu(display("Enrichment cannot start: {source}"))]
    Enrichment { source: EnrichmentErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ForecastResult<T> = Result<T, ForecastError>;

pub fn run_organize(args: &OrganizeArgs) -> ForecastResult<()> {
    let scrape = read_scrape(&args.input)?;
    let (organized, _) = organize(&scrape);
    let js = serde_json::to_value(organized_to_json(&organized)).context(SerializingJsonSnafu {})?;
    let pretty = serde_json::to_string_pretty(&js).context(SerializingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty)
}

pub fn run_changes(args: &ChangesArgs) -> ForecastResult<()> {
    let new = read_scrape(&args.new)?;
    let old = match &args.old {
        Some(p) => read_scrape(p)?,
        None => vec![],
    };
    let mut changed = 0;
    for univ in new.iter() {
        let previous = old.iter().find(|o| o.university == univ.university);
        let changes = admission_ratio::changes::compare_scrapes(previous, univ);
        if !changes.is_empty() {
            changed += 1;
            println!("{}", univ.university);
            for c in changes {
                println!("  - {}", c);
            }
        }
    }
    info!("changes: {} of {} universities changed", changed, new.len());
    Ok(())
}

/// All the inputs of one enrichment run, once the configuration and the
/// command line have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichPlan {
    pub records: RecordsInput,
    pub region: RosterSource,
    pub waitlist: RosterSource,
    pub rate_history: Option<RosterSource>,
    pub day: SnapshotDay,
    pub growth_rules: GrowthRules,
    pub region_rules: region::RegionRules,
    pub out: Option<String>,
    pub region_table: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordsInput {
    Organized(String),
    Scrape(String),
}

pub fn plan_enrichment(args: &EnrichArgs) -> ForecastResult<EnrichPlan> {
    let (config, root) = match &args.config {
        Some(p) => (read_config(p)?, config_root(p)),
        None => (ForecastConfig::default(), PathBuf::from(".")),
    };
    debug!("plan_enrichment: config: {:?}", config);
    let in_root = |p: &str| resolve_path(&root, p);

    let records = match (&args.organized, &config.organized_path, &config.raw_scrape_path) {
        (Some(p), _, _) => RecordsInput::Organized(p.clone()),
        (None, Some(p), _) => RecordsInput::Organized(in_root(p)),
        (None, None, Some(p)) => RecordsInput::Scrape(in_root(p)),
        (None, None, None) => {
            return MissingSettingSnafu {
                name: "input records (--organized or rawScrapePath)",
            }
            .fail()
        }
    };

    let roster = |flag: &Option<String>, configured: &Option<RosterSource>| -> Option<RosterSource> {
        match (flag, configured) {
            (Some(p), Some(c)) => Some(c.with_file_path(p)),
            (Some(p), None) => Some(RosterSource::from_path(p)),
            (None, Some(c)) => Some(c.with_file_path(&in_root(&c.file_path))),
            (None, None) => None,
        }
    };
    let region = roster(&args.region_roster, &config.region_roster).context(MissingSettingSnafu {
        name: "region roster",
    })?;
    let waitlist = roster(&args.waitlist_roster, &config.waitlist_roster).context(
        MissingSettingSnafu {
            name: "waitlist roster",
        },
    )?;
    let rate_history = roster(&args.rate_history, &config.rate_history_roster);

    let day = match args.day.as_ref().or(config.snapshot_day.as_ref()) {
        Some(d) => SnapshotDay::from_label(d).context(UnknownSnapshotDaySnafu { day: d.clone() })?,
        None => SnapshotDay::default(),
    };

    let output_dir = config.output_directory.as_ref().map(|d| in_root(d));
    let in_output_dir = |name: &str| {
        output_dir.as_ref().map(|d| {
            Path::new(d).join(name).display().to_string()
        })
    };

    Ok(EnrichPlan {
        records,
        region,
        waitlist,
        rate_history,
        day,
        growth_rules: config.growth_rules()?,
        region_rules: config.region_rules()?,
        out: args.out.clone().or_else(|| in_output_dir(ENRICHED_FILE_NAME)),
        region_table: args
            .region_table
            .clone()
            .or_else(|| in_output_dir(REGION_TABLE_FILE_NAME)),
        reference: args.reference.clone(),
    })
}

const ENRICHED_FILE_NAME: &str = "enriched_latest.json";
const REGION_TABLE_FILE_NAME: &str = "university_region_mapping.json";

pub fn run_enrich(args: &EnrichArgs) -> ForecastResult<()> {
    let plan = plan_enrichment(args)?;
    info!("run_enrich: plan: {:?}", plan);

    // Every required input is checked before anything is read or written.
    for (name, src) in [("region", &plan.region), ("waitlist", &plan.waitlist)] {
        if !Path::new(&src.file_path).exists() {
            return MissingRequiredSourceSnafu {
                name,
                path: src.file_path.clone(),
            }
            .fail();
        }
    }

    let organized = match &plan.records {
        RecordsInput::Organized(p) => read_organized(p)?,
        RecordsInput::Scrape(p) => organize(&read_scrape(p)?).0,
    };

    let region_grid = read_roster_grid(&plan.region)?;
    let regions = region_entries(&region_grid, &plan.region.region_layout()?);
    let region_maps = build_region_maps(&regions, &plan.region_rules).context(EnrichmentSnafu {})?;

    let waitlist_grid = read_roster_grid(&plan.waitlist)?;
    let waitlist_rows = waitlist_entries(&waitlist_grid, &plan.waitlist.waitlist_layout()?);
    let waitlist_maps = build_waitlist_maps(&waitlist_rows).context(EnrichmentSnafu {})?;

    let growth = match &plan.rate_history {
        Some(src) if Path::new(&src.file_path).exists() => {
            let grid = read_roster_grid(src)?;
            let rows = rate_history_rows(&grid, &src.rate_history_layout()?, plan.day);
            info!("run_enrich: growth relative to {}", plan.day);
            GrowthPatterns::build(&rows, &plan.growth_rules).context(EnrichmentSnafu {})?
        }
        Some(src) => {
            warn!(
                "run_enrich: rate history {} not found, the ratios are not projected",
                src.file_path
            );
            GrowthPatterns::neutral()
        }
        None => {
            warn!("run_enrich: no rate history, the ratios are not projected");
            GrowthPatterns::neutral()
        }
    };

    let outcome = enrich(&organized, &region_maps, &waitlist_maps, &growth);

    for stat in region_statistics(&outcome.groups).iter() {
        info!(
            "region {}: 가군 {}, 나군 {}, 다군 {}, total {}",
            stat.region, stat.group_a, stat.group_b, stat.group_c, stat.total
        );
    }
    let summary = prediction_summary(&outcome.groups);
    for (group, s) in summary.groups.iter() {
        info!(
            "summary {}: {} records, mean growth {:.2}, real ratio <= 1: {}, <= 3: {}",
            group, s.count, s.mean_growth, s.at_most_one, s.at_most_three
        );
    }

    let result_js =
        serde_json::to_value(enriched_to_json(&outcome.groups)).context(SerializingJsonSnafu {})?;
    let pretty_js = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;
    write_output(plan.out.as_deref(), &pretty_js)?;

    if let Some(table_path) = &plan.region_table {
        let table_js = serde_json::to_string_pretty(&university_regions(&region_maps))
            .context(SerializingJsonSnafu {})?;
        write_atomic(table_path, &table_js)?;
        info!("run_enrich: region table written to {}", table_path);
    }

    // The reference output, if provided for comparison
    if let Some(reference_p) = &plan.reference {
        let reference = read_json(reference_p)?;
        let pretty_reference =
            serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
        if pretty_reference != pretty_js {
            warn!("Found differences with the reference output");
            print_diff(pretty_reference.as_str(), pretty_js.as_ref(), "\n");
            whatever!("Difference detected between the enriched records and the reference")
        }
    }
    Ok(())
}

fn read_roster_grid(src: &RosterSource) -> ForecastResult<Vec<Vec<String>>> {
    info!("Attempting to read roster {:?} ({})", src.file_path, src.provider);
    match src.provider.as_str() {
        "xlsx" => io_xlsx::read_xlsx_grid(&src.file_path, src.excel_worksheet_name.as_deref()),
        "csv" => io_csv::read_csv_grid(&src.file_path),
        x => UnknownProviderSnafu {
            provider: x,
            path: src.file_path.clone(),
        }
        .fail(),
    }
}

pub(crate) fn read_json(path: &str) -> ForecastResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Writes to stdout when no path (or "stdout") is given.
fn write_output(path: Option<&str>, contents: &str) -> ForecastResult<()> {
    match path {
        None | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some(p) => {
            write_atomic(p, contents)?;
            info!("Output written to {}", p);
            Ok(())
        }
    }
}

/// Writes a sibling temporary file and renames it over `path`. The previous
/// content of `path` survives any failure.
pub(crate) fn write_atomic(path: &str, contents: &str) -> ForecastResult<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingFileSnafu { path })?;
        }
    }
    let tmp = format!("{}.tmp", path);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(e).context(WritingFileSnafu { path: tmp });
    }
    fs::rename(&tmp, path).context(WritingFileSnafu { path })
}

fn config_root(config_path: &str) -> PathBuf {
    Path::new(config_path)
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_path(root: &Path, p: &str) -> String {
    let path = Path::new(p);
    if path.is_absolute() {
        p.to_string()
    } else {
        root.join(path).display().to_string()
    }
}
