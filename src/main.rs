use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

mod args;
mod forecast;

use crate::args::{Args, Command};

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("args: {:?}", args);

    let res = match &args.command {
        Command::Organize(a) => forecast::run_organize(a),
        Command::Enrich(a) => forecast::run_enrich(a),
        Command::Changes(a) => forecast::run_changes(a),
    };

    if let Err(e) = res {
        eprintln!("Error: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("{}", bt);
        }
        std::process::exit(1);
    }
}
