use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use knockout::data::{self, DateRange, MissingGoals};
use knockout::print;
use knockout::stats;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the match results from
    file: Option<PathBuf>,

    /// treatment of missing goal values: reject, skip or zero
    #[clap(short = 'm', long, default_value = "reject")]
    missing: MissingGoals,

    /// number of rows to print in each table
    #[clap(short = 'n', long, default_value = "10")]
    top: usize,

    /// ignore matches before this date (YYYY-MM-DD)
    #[clap(long, value_parser = parse_date)]
    since: Option<NaiveDate>,

    /// ignore matches after this date (YYYY-MM-DD)
    #[clap(long, value_parser = parse_date)]
    until: Option<NaiveDate>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("match file must be specified"))?;
        if self.top == 0 {
            bail!("at least one row must be printed");
        }
        Ok(())
    }
}

fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    data::parse_date(s).ok_or(anyhow!("unsupported date {s}"))
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let file = args.file.unwrap();
    let matches = data::read_from_file(&file, args.missing)?;
    let matches = DateRange {
        since: args.since,
        until: args.until,
    }
    .filter(matches);
    info!("loaded {} matches from {}", matches.len(), file.display());
    if matches.is_empty() {
        return Err("no matches to report on".into());
    }

    let mut scored = stats::goals_scored(&matches);
    scored.truncate(args.top);
    println!(
        "Most goals scored:\n{}",
        Console::default().render(&print::tabulate_team_goals(&scored))
    );

    let mut conceded = stats::goals_conceded(&matches);
    conceded.truncate(args.top);
    println!(
        "Most goals conceded:\n{}",
        Console::default().render(&print::tabulate_team_goals(&conceded))
    );

    let home_away = stats::home_away_goals(&matches);
    println!(
        "Goals at home: {}, goals away: {}",
        home_away.home, home_away.away
    );

    let highest = stats::highest_scoring(&matches, args.top);
    println!(
        "Highest-scoring matches:\n{}",
        Console::default().render(&print::tabulate_matches(&highest))
    );

    if let Some(mean) = stats::mean_goals(&matches) {
        println!("Mean goals per match: {mean:.2}");
    }
    println!(
        "Goal distribution:\n{}",
        Console::default().render(&print::tabulate_histogram(&stats::goal_histogram(&matches)))
    );
    Ok(())
}
