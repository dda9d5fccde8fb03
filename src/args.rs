use clap::{Parser, Subcommand};

/// Organizes scraped admission tables and projects their final competition ratios.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Groups the department rows of a scrape by admission group.
    Organize(OrganizeArgs),
    /// Attaches regions, wait-list counts and growth factors to the records and
    /// projects the final and real ratios.
    Enrich(EnrichArgs),
    /// Lists what changed between two scrapes.
    Changes(ChangesArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct OrganizeArgs {
    /// (file path) The scrape, in JSON format.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (file path, 'stdout' or empty) Where the organized records are written in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EnrichArgs {
    /// (file path, optional) The configuration file, in JSON format. All the other
    /// options override the corresponding entries of the configuration.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) Organized records, as written by the organize command. When not
    /// provided, the scrape of the configuration is organized first.
    #[clap(long, value_parser)]
    pub organized: Option<String>,

    /// (file path) The regional roster (.xlsx or .csv).
    #[clap(long, value_parser)]
    pub region_roster: Option<String>,

    /// (file path) The wait-list roster of the previous cycle (.xlsx or .csv).
    #[clap(long, value_parser)]
    pub waitlist_roster: Option<String>,

    /// (file path, optional) The rate-history roster (.xlsx or .csv). Without it,
    /// the current ratios are not projected.
    #[clap(long, value_parser)]
    pub rate_history: Option<String>,

    /// (default 3일전) The point of the application window the scrape corresponds to:
    /// 3일전, 2일전, 1일전, 마감오전, 마감오후, or 1 to 5.
    #[clap(long, value_parser)]
    pub day: Option<String>,

    /// (file path, 'stdout' or empty) Where the enriched records are written in JSON format.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, optional) Where the university to region table is written.
    #[clap(long, value_parser)]
    pub region_table: Option<String>,

    /// (file path) A reference file of enriched records. If provided, ratiocast will
    /// check that its output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChangesArgs {
    /// (file path, optional) The previous scrape. Every university is new without it.
    #[clap(long, value_parser)]
    pub old: Option<String>,

    /// (file path) The latest scrape.
    #[clap(long, value_parser)]
    pub new: String,
}
