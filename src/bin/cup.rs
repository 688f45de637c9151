use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Rand, Seeded, StdRand};
use tinyrand_std::ClockSeed;
use tracing::{debug, info};

use knockout::bracket::{Bracket, BracketConfig, OddRound, SimulationResult};
use knockout::csv::{CsvWriter, Record};
use knockout::data::{self, DateRange, MissingGoals};
use knockout::domain::Teams;
use knockout::file::{ReadJsonFile, WriteJsonFile};
use knockout::print;
use knockout::standings::Standings;
use knockout::strength::Strengths;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file to source the match results from
    file: Option<PathBuf>,

    /// number of simulated tournaments
    #[clap(short = 't', long)]
    trials: Option<u64>,

    /// seed for the random number generator
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// JSON file with the simulation config
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// write the effective simulation config to a JSON file
    #[clap(long)]
    dump_config: Option<PathBuf>,

    /// let an unpaired team advance instead of rejecting odd rounds
    #[clap(long)]
    bye: bool,

    /// treatment of missing goal values: reject, skip or zero
    #[clap(short = 'm', long, default_value = "reject")]
    missing: MissingGoals,

    /// number of rows to print in each table
    #[clap(short = 'n', long, default_value = "10")]
    top: usize,

    /// comma-separated list of teams entering the bracket (defaults to all teams)
    #[clap(short = 'p', long, value_delimiter = ',')]
    participants: Vec<String>,

    /// ignore matches before this date (YYYY-MM-DD)
    #[clap(long, value_parser = parse_date)]
    since: Option<NaiveDate>,

    /// ignore matches after this date (YYYY-MM-DD)
    #[clap(long, value_parser = parse_date)]
    until: Option<NaiveDate>,

    /// write the championship probabilities to a CSV file
    #[clap(short = 'o', long)]
    output: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        self.file
            .as_ref()
            .ok_or(anyhow!("match file must be specified"))?;
        if self.top == 0 {
            bail!("at least one row must be printed");
        }
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                bail!("--since {since} is after --until {until}");
            }
        }
        Ok(())
    }

    fn bracket_config(&self) -> anyhow::Result<BracketConfig> {
        let mut config = match &self.config {
            None => BracketConfig::default(),
            Some(path) => {
                debug!("loading config from {}", path.display());
                BracketConfig::read_json_file(path)?
            }
        };
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if self.bye {
            config.odd_round = OddRound::Bye;
        }
        config.validate()?;
        Ok(config)
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
    let config = args.bracket_config()?;
    if let Some(path) = &args.dump_config {
        config.write_json_file(path)?;
        info!("wrote config to {}", path.display());
    }

    let file = args.file.as_ref().ok_or(anyhow!("match file must be specified"))?;
    let matches = data::read_from_file(file, args.missing)?;
    let range = DateRange {
        since: args.since,
        until: args.until,
    };
    let matches = range.filter(matches);
    info!("loaded {} matches from {}", matches.len(), file.display());

    let teams = Teams::from_matches(&matches);
    let standings = Standings::compute_with(&teams, &matches);
    println!(
        "Standings:\n{}",
        Console::default().render(&print::tabulate_standings(standings.top(args.top)))
    );
    if let Some(leader) = standings.leader() {
        println!("Points model champion: {}", leader.team);
    }

    let strengths = Strengths::estimate(&teams, &matches);
    let bracket = if args.participants.is_empty() {
        Bracket::new(&teams, &strengths, config)?
    } else {
        Bracket::with_participants(&teams, &strengths, &args.participants, config)?
    };

    let seed = args.seed.unwrap_or_else(|| ClockSeed::default().next_u64());
    info!(
        "simulating {} tournaments of {} teams with seed {seed}",
        bracket.config().trials,
        bracket.participants().len()
    );
    let start_time = Instant::now();
    let result = bracket.simulate(&mut StdRand::seed(seed));
    let elapsed = start_time.elapsed();
    info!("simulation took {elapsed:?}");

    println!(
        "Championship probability:\n{}",
        Console::default().render(&print::tabulate_simulation(&result, args.top))
    );
    if let Some(favourite) = result.favourite() {
        println!(
            "Most likely champion: {} ({:.2}%)",
            favourite.name, favourite.probability
        );
    }

    if let Some(path) = &args.output {
        write_probabilities(path, &result)?;
        info!("wrote probabilities to {}", path.display());
    }
    Ok(())
}

fn write_probabilities(path: &Path, result: &SimulationResult) -> anyhow::Result<()> {
    let mut writer = CsvWriter::create(path)?;
    writer.append(["team", "wins", "probability"])?;
    for odds in result.ranked() {
        let mut record = Record::with_capacity(3);
        record.set(0usize, &odds.name);
        record.set(1usize, odds.wins);
        record.set(2usize, format!("{:.4}", odds.probability));
        writer.append(record)?;
    }
    writer.flush()?;
    Ok(())
}
