//! Ingestion of historical match files.

use std::io::BufRead;
use std::path::Path;

use chrono::NaiveDate;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::{debug, warn};

use crate::csv::{CsvError, CsvReader};
use crate::domain::{Match, Score};

#[cfg(test)]
mod tests;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y-%m-%d %H:%M", "%d.%m.%Y", "%d/%m/%Y"];
pub(crate) const MISSING_MARKERS: [&str; 6] = ["", "nan", "na", "n/a", "null", "-"];

/// What to do with a row whose goal count is absent or non-numeric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MissingGoals {
    #[default]
    Reject,
    Skip,
    Zero,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("no header row")]
    NoHeader,

    #[error("missing column '{0}'")]
    MissingColumn(Column),

    #[error("line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("line {line}: empty {column}")]
    EmptyTeam { line: usize, column: Column },

    #[error("line {line}: '{team}' cannot play itself")]
    SameTeam { line: usize, team: String },

    #[error("line {line}: missing {column} ('{value}')")]
    MissingGoals {
        line: usize,
        column: Column,
        value: String,
    },

    #[error("line {line}: malformed {column} ('{value}')")]
    MalformedGoals {
        line: usize,
        column: Column,
        value: String,
    },

    #[error("line {line}: malformed date '{value}'")]
    MalformedDate { line: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    Date,
    HomeTeam,
    AwayTeam,
    HomeGoals,
    AwayGoals,
}
impl Column {
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["date"],
            Column::HomeTeam => &["home_team", "home"],
            Column::AwayTeam => &["away_team", "away"],
            Column::HomeGoals => &["home_goals", "home_score", "fthg"],
            Column::AwayGoals => &["away_goals", "away_score", "ftag"],
        }
    }
}

/// Lowercase, with spaces and dashes turned into underscores and brackets and percent signs dropped.
pub(crate) fn normalise_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .replace([' ', '-'], "_")
        .replace(['(', ')', '%'], "")
}

/// Positions of the recognised columns within a header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub date: Option<usize>,
    pub home_team: usize,
    pub away_team: usize,
    pub home_goals: usize,
    pub away_goals: usize,
    pub fields: usize,
}
impl Layout {
    pub fn resolve(header: &[String]) -> Result<Self, IngestError> {
        let normalised = header
            .iter()
            .map(|name| normalise_header(name))
            .collect::<Vec<_>>();
        let find = |column: Column| {
            column
                .aliases()
                .iter()
                .find_map(|alias| normalised.iter().position(|name| name == alias))
        };
        let require = |column: Column| find(column).ok_or(IngestError::MissingColumn(column));
        Ok(Self {
            date: find(Column::Date),
            home_team: require(Column::HomeTeam)?,
            away_team: require(Column::AwayTeam)?,
            home_goals: require(Column::HomeGoals)?,
            away_goals: require(Column::AwayGoals)?,
            fields: header.len(),
        })
    }
}

enum Goals {
    Count(u8),
    Missing,
}

/// Plain digits, optionally with an all-zero fraction (`2.0`). Missing markers and text that does not
/// look like a number are missing; anything else numeric-looking is malformed.
fn parse_goals(value: &str) -> Option<Goals> {
    let value = value.trim();
    let lowered = value.to_lowercase();
    if MISSING_MARKERS.contains(&lowered.as_str())
        || !value.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
    {
        return Some(Goals::Missing);
    }

    let whole = match value.split_once('.') {
        None => value,
        Some((whole, fraction)) if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') => {
            whole
        }
        Some(_) => return None,
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    whole.parse::<u8>().ok().map(Goals::Count)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .or_else(|| {
                chrono::NaiveDateTime::parse_from_str(value, format)
                    .ok()
                    .map(|datetime| datetime.date())
            })
    })
}

pub struct Ingester {
    layout: Layout,
    missing_goals: MissingGoals,
}
impl Ingester {
    pub fn new(layout: Layout, missing_goals: MissingGoals) -> Self {
        Self {
            layout,
            missing_goals,
        }
    }

    /// Parses a single data row. `Ok(None)` means the row was deliberately skipped.
    pub fn parse_row(&self, line: usize, row: &[String]) -> Result<Option<Match>, IngestError> {
        let layout = &self.layout;
        if row.len() != layout.fields {
            return Err(IngestError::FieldCount {
                line,
                expected: layout.fields,
                actual: row.len(),
            });
        }

        let home_team = row[layout.home_team].trim();
        if home_team.is_empty() {
            return Err(IngestError::EmptyTeam {
                line,
                column: Column::HomeTeam,
            });
        }
        let away_team = row[layout.away_team].trim();
        if away_team.is_empty() {
            return Err(IngestError::EmptyTeam {
                line,
                column: Column::AwayTeam,
            });
        }
        if home_team == away_team {
            return Err(IngestError::SameTeam {
                line,
                team: home_team.to_string(),
            });
        }

        let date = match layout.date {
            None => None,
            Some(index) if row[index].trim().is_empty() => None,
            Some(index) => Some(parse_date(&row[index]).ok_or_else(|| {
                IngestError::MalformedDate {
                    line,
                    value: row[index].clone(),
                }
            })?),
        };

        let home_goals = self.goals(line, Column::HomeGoals, &row[layout.home_goals])?;
        let away_goals = self.goals(line, Column::AwayGoals, &row[layout.away_goals])?;
        let (Some(home), Some(away)) = (home_goals, away_goals) else {
            warn!("line {line}: skipping {home_team} v {away_team} with missing goals");
            return Ok(None);
        };

        Ok(Some(Match {
            date,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            score: Score::new(home, away),
        }))
    }

    fn goals(&self, line: usize, column: Column, value: &str) -> Result<Option<u8>, IngestError> {
        match parse_goals(value) {
            Some(Goals::Count(count)) => Ok(Some(count)),
            Some(Goals::Missing) => match self.missing_goals {
                MissingGoals::Reject => Err(IngestError::MissingGoals {
                    line,
                    column,
                    value: value.to_string(),
                }),
                MissingGoals::Skip => Ok(None),
                MissingGoals::Zero => Ok(Some(0)),
            },
            None => Err(IngestError::MalformedGoals {
                line,
                column,
                value: value.to_string(),
            }),
        }
    }
}

pub fn read_from_reader(
    reader: impl BufRead,
    missing_goals: MissingGoals,
) -> Result<Vec<Match>, IngestError> {
    let mut rows = CsvReader::from_reader(reader);
    let header = rows.next().ok_or(IngestError::NoHeader)??;
    let ingester = Ingester::new(Layout::resolve(&header)?, missing_goals);
    debug!("layout: {:?}", ingester.layout);

    let mut matches = vec![];
    while let Some(row) = rows.read() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(fixture) = ingester.parse_row(rows.line(), &row)? {
            matches.push(fixture);
        }
    }
    Ok(matches)
}

pub fn read_from_file(
    path: impl AsRef<Path>,
    missing_goals: MissingGoals,
) -> Result<Vec<Match>, IngestError> {
    let path = path.as_ref();
    debug!("reading matches from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_from_reader(std::io::BufReader::new(file), missing_goals)
}

/// Inclusive date bounds. With either bound set, undated matches are excluded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}
impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, fixture: &Match) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match fixture.date {
            None => false,
            Some(date) => {
                self.since.map_or(true, |since| date >= since)
                    && self.until.map_or(true, |until| date <= until)
            }
        }
    }

    pub fn filter(&self, matches: Vec<Match>) -> Vec<Match> {
        if self.is_unbounded() {
            return matches;
        }
        let before = matches.len();
        let retained = matches
            .into_iter()
            .filter(|fixture| self.contains(fixture))
            .collect::<Vec<_>>();
        debug!("date filter {self:?} retained {} of {before} matches", retained.len());
        retained
    }
}
