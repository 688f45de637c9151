use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use knockout::leaders::{self, Category, Sheet, PLAYER_ID, TEAM_ID};
use knockout::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV file with per-player stats
    file: Option<PathBuf>,

    /// leaderboard to print: scorers, playmakers, defenders, goalkeepers or discipline
    #[clap(short = 'c', long)]
    category: Option<Category>,

    /// comma-separated columns to rank by, summed, instead of a predefined category
    #[clap(short = 's', long, value_delimiter = ',')]
    stat: Vec<String>,

    /// CSV file with the player register, joined on id_player
    #[clap(long)]
    players: Option<PathBuf>,

    /// CSV file with the team register, joined on id_team
    #[clap(long)]
    teams: Option<PathBuf>,

    /// two comma-separated team names to compare using the team register
    #[clap(long, value_delimiter = ',')]
    compare: Vec<String>,

    /// number of players to print
    #[clap(short = 'n', long, default_value = "10")]
    top: usize,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.file.is_none() && self.compare.is_empty() {
            bail!("either a stats file or --compare must be specified");
        }
        if self.file.is_some() && self.category.is_some() == !self.stat.is_empty() {
            bail!("exactly one of --category or --stat must be specified");
        }
        if !self.compare.is_empty() {
            if self.compare.len() != 2 {
                bail!("--compare takes exactly two teams");
            }
            self.teams
                .as_ref()
                .ok_or(anyhow!("--compare requires a team register (--teams)"))?;
        }
        if self.top == 0 {
            bail!("at least one row must be printed");
        }
        Ok(())
    }

    fn columns(&self) -> (Vec<&str>, String) {
        match self.category {
            Some(category) => (category.columns().to_vec(), category.title().to_string()),
            None => (
                self.stat.iter().map(String::as_str).collect(),
                self.stat.join(" + "),
            ),
        }
    }
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

    let teams = args.teams.as_ref().map(Sheet::read_from_file).transpose()?;
    let players = args.players.as_ref().map(Sheet::read_from_file).transpose()?;
    if let Some(teams) = &teams {
        info!("{} teams in the register", teams.len());
    }
    if let Some(players) = &players {
        info!("{} players in the register", players.len());
    }

    if let Some(file) = &args.file {
        let mut sheet = Sheet::read_from_file(file)?;
        info!("loaded {} rows from {}", sheet.len(), file.display());
        let players = match (players, &teams) {
            (Some(players), Some(teams)) => Some(players.join(teams, TEAM_ID)),
            (players, _) => players,
        };
        if let Some(players) = &players {
            sheet = sheet.join(players, PLAYER_ID);
        }
        if let Some(teams) = &teams {
            sheet = sheet.join(teams, TEAM_ID);
        }

        let (columns, title) = args.columns();
        let leaders = leaders::leaderboard(&sheet, &columns, args.top)?;
        println!(
            "Top {} by {title}:\n{}",
            args.top,
            Console::default().render(&print::tabulate_leaders(&leaders, &title))
        );
        if let [column] = columns.as_slice() {
            println!("Total {title}: {}", print::format_stat(sheet.total(column)?));
        }
    }

    if let [first, second] = &args.compare[..] {
        let teams = teams.as_ref().ok_or("--compare requires a team register")?;
        let comparison = leaders::compare(teams, first, second)?;
        println!(
            "Team comparison:\n{}",
            Console::default().render(&print::tabulate_comparison(&comparison))
        );
    }
    Ok(())
}
