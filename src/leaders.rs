//! Player leaderboards and team comparisons over loosely structured stat sheets.
//!
//! A sheet is any CSV with a header row. Headers are normalised on the way in, so `Yellow Cards` and
//! `yellow_cards` name the same column. Per-player sheets can be joined to a player register on
//! `id_player`, and either of them to a team register on `id_team`.

use std::io::BufRead;
use std::path::Path;

use rustc_hash::FxHashMap;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, warn};

use crate::csv::{CsvError, CsvReader};
use crate::data::{normalise_header, MISSING_MARKERS};


pub const PLAYER_ID: &str = "id_player";
pub const TEAM_ID: &str = "id_team";

const PLAYER_NAME: &str = "player_name";
const TEAM_NAMES: [&str; 5] = ["team_name", "team", "club", "club_name", "squad"];

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("no header row")]
    NoHeader,

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: non-numeric {column} ('{value}')")]
    NonNumeric {
        line: usize,
        column: String,
        value: String,
    },

    #[error("no team named '{0}'")]
    UnknownTeam(String),
}

/// A predefined leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    Scorers,
    Playmakers,
    Defenders,
    Goalkeepers,
    Discipline,
}
impl Category {
    /// Columns summed into the ranked value.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Category::Scorers => &["goals"],
            Category::Playmakers => &["assists"],
            Category::Defenders => &["tackles"],
            Category::Goalkeepers => &["saves"],
            Category::Discipline => &["yellow_cards", "red_cards"],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Scorers => "Goals",
            Category::Playmakers => "Assists",
            Category::Defenders => "Tackles",
            Category::Goalkeepers => "Saves",
            Category::Discipline => "Cards",
        }
    }
}

enum Stat {
    Value(f64),
    Missing,
    Malformed,
}

fn parse_stat(value: &str) -> Stat {
    let value = value.trim();
    if MISSING_MARKERS.contains(&value.to_lowercase().as_str()) {
        return Stat::Missing;
    }
    let value = value.strip_suffix('%').unwrap_or(value);
    match value.parse::<f64>() {
        Ok(value) if value.is_finite() => Stat::Value(value),
        _ => Stat::Malformed,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SheetRow {
    line: usize,
    fields: Vec<String>,
}

/// A header row and the data rows beneath it, all of the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    header: Vec<String>,
    rows: Vec<SheetRow>,
}
impl Sheet {
    pub fn read_from_reader(reader: impl BufRead) -> Result<Self, SheetError> {
        Self::read(CsvReader::from_reader(reader))
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, SheetError> {
        let path = path.as_ref();
        debug!("reading sheet from {}", path.display());
        Self::read(CsvReader::open(path)?)
    }

    fn read<R: BufRead>(mut reader: CsvReader<R>) -> Result<Self, SheetError> {
        let header = reader
            .read()
            .ok_or(SheetError::NoHeader)??
            .iter()
            .map(|name| normalise_header(name))
            .collect::<Vec<_>>();
        let mut rows = vec![];
        while let Some(fields) = reader.read() {
            let fields = fields?;
            if fields.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            if fields.len() != header.len() {
                return Err(SheetError::FieldCount {
                    line: reader.line(),
                    expected: header.len(),
                    actual: fields.len(),
                });
            }
            rows.push(SheetRow {
                line: reader.line(),
                fields,
            });
        }
        Ok(Self { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        let name = normalise_header(name);
        self.header.iter().position(|column| *column == name)
    }

    pub fn require(&self, name: &str) -> Result<usize, SheetError> {
        self.column(name).ok_or_else(|| SheetError::MissingColumn(normalise_header(name)))
    }

    /// The first recognised team name column.
    pub fn team_column(&self) -> Option<usize> {
        TEAM_NAMES.iter().find_map(|name| self.column(name))
    }

    /// `player_name` if present, otherwise the first column.
    pub fn player_column(&self) -> usize {
        self.column(PLAYER_NAME).unwrap_or(0)
    }

    /// Sum of the numeric values in the named column; missing values are ignored.
    pub fn total(&self, name: &str) -> Result<f64, SheetError> {
        let column = self.require(name)?;
        let mut total = 0.0;
        for row in &self.rows {
            match parse_stat(&row.fields[column]) {
                Stat::Value(value) => total += value,
                Stat::Missing => {}
                Stat::Malformed => return Err(self.non_numeric(row, column)),
            }
        }
        Ok(total)
    }

    /// Left join on `key`: every row of `self` is kept, extended with the columns of the first row
    /// of `other` sharing its key. Columns `self` already has are not duplicated, and rows without a
    /// partner get empty fields. If either side lacks `key`, `self` is returned unchanged.
    pub fn join(&self, other: &Sheet, key: &str) -> Sheet {
        let (Some(left_key), Some(right_key)) = (self.column(key), other.column(key)) else {
            if self.column(key).is_some() {
                warn!("cannot join on '{key}': column missing from the other sheet");
            } else {
                debug!("not joining on '{key}': column missing");
            }
            return self.clone();
        };

        let mut lookup = FxHashMap::default();
        for (index, row) in other.rows.iter().enumerate() {
            lookup.entry(row.fields[right_key].trim()).or_insert(index);
        }
        let carried = other
            .header
            .iter()
            .enumerate()
            .filter(|(_, name)| !self.header.contains(*name))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        let mut header = self.header.clone();
        header.extend(carried.iter().map(|&index| other.header[index].clone()));
        let mut unmatched = 0;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let partner = lookup
                    .get(row.fields[left_key].trim())
                    .map(|&index| &other.rows[index]);
                if partner.is_none() {
                    unmatched += 1;
                }
                let mut fields = row.fields.clone();
                fields.extend(carried.iter().map(|&index| {
                    partner
                        .map(|partner| partner.fields[index].clone())
                        .unwrap_or_default()
                }));
                SheetRow {
                    line: row.line,
                    fields,
                }
            })
            .collect();
        debug!("joined on '{key}': {unmatched} of {} rows without a partner", self.rows.len());
        Sheet { header, rows }
    }

    fn non_numeric(&self, row: &SheetRow, column: usize) -> SheetError {
        SheetError::NonNumeric {
            line: row.line,
            column: self.header[column].clone(),
            value: row.fields[column].clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub player: String,
    pub team: Option<String>,
    pub value: f64,
}

/// Ranks players by the sum of the named columns, highest first, ties broken by player name.
/// Rows missing any of the values are left out.
pub fn leaderboard(
    sheet: &Sheet,
    columns: &[&str],
    top: usize,
) -> Result<Vec<Leader>, SheetError> {
    let stats = columns
        .iter()
        .map(|column| sheet.require(column))
        .collect::<Result<Vec<_>, _>>()?;
    let player = sheet.player_column();
    let team = sheet.team_column();

    let mut leaders = Vec::with_capacity(sheet.len());
    let mut skipped = 0;
    'rows: for row in &sheet.rows {
        let mut value = 0.0;
        for &column in &stats {
            match parse_stat(&row.fields[column]) {
                Stat::Value(stat) => value += stat,
                Stat::Missing => {
                    skipped += 1;
                    continue 'rows;
                }
                Stat::Malformed => return Err(sheet.non_numeric(row, column)),
            }
        }
        leaders.push(Leader {
            player: row.fields[player].trim().to_string(),
            team: team
                .map(|team| row.fields[team].trim().to_string())
                .filter(|team| !team.is_empty()),
            value,
        });
    }
    if skipped > 0 {
        warn!("left out {skipped} rows with missing {columns:?}");
    }

    leaders.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.player.cmp(&b.player)));
    leaders.truncate(top);
    Ok(leaders)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparedStat {
    pub stat: String,
    pub first: f64,
    pub second: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub stats: Vec<ComparedStat>,
}

/// Side-by-side numeric columns of two teams from a team register. Identifier columns and columns
/// that are not numeric for both teams are left out. Team names match case-insensitively.
pub fn compare(teams: &Sheet, first: &str, second: &str) -> Result<Comparison, SheetError> {
    let name = teams
        .team_column()
        .ok_or_else(|| SheetError::MissingColumn(TEAM_NAMES[0].into()))?;
    let find = |team: &str| {
        teams
            .rows
            .iter()
            .find(|row| row.fields[name].trim().eq_ignore_ascii_case(team.trim()))
            .ok_or_else(|| SheetError::UnknownTeam(team.to_string()))
    };
    let (left, right) = (find(first)?, find(second)?);

    let stats = teams
        .header
        .iter()
        .enumerate()
        .filter(|&(column, stat)| column != name && !stat.starts_with("id_"))
        .filter_map(|(column, stat)| {
            match (parse_stat(&left.fields[column]), parse_stat(&right.fields[column])) {
                (Stat::Value(first), Stat::Value(second)) => Some(ComparedStat {
                    stat: stat.clone(),
                    first,
                    second,
                }),
                _ => None,
            }
        })
        .collect();
    Ok(Comparison {
        first: left.fields[name].trim().to_string(),
        second: right.fields[name].trim().to_string(),
        stats,
    })
}
