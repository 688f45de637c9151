//! Core types: teams, fixtures and scores.

use std::fmt::{Display, Formatter};
use std::ops::Index;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }

    pub fn nil_all() -> Self {
        Self { home: 0, away: 0 }
    }

    pub fn total(&self) -> u16 {
        self.home as u16 + self.away as u16
    }

    /// The winning side, or `None` for a draw.
    pub fn winner(&self) -> Option<Side> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Goal difference from the perspective of `side`.
    pub fn margin(&self, side: Side) -> i32 {
        let diff = self.home as i32 - self.away as i32;
        match side {
            Side::Home => diff,
            Side::Away => -diff,
        }
    }

    pub fn scored(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn conceded(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.away,
            Side::Away => self.home,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A historical fixture, as ingested from the match file.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub date: Option<NaiveDate>,
    pub home_team: String,
    pub away_team: String,
    pub score: Score,
}
impl Match {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, score: Score) -> Self {
        Self {
            date: None,
            home_team: home_team.into(),
            away_team: away_team.into(),
            score,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }
}

/// Index of a team within a [`Teams`] universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(usize);

impl TeamId {
    pub fn index(index: usize) -> Self {
        Self(index)
    }

    pub fn as_index(&self) -> usize {
        self.0
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The closed universe of teams appearing in a set of matches. Names are held in lexicographic
/// order, so a team's [`TeamId`] does not depend on the order of the input rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Teams {
    names: Vec<String>,
    lookup: FxHashMap<String, TeamId>,
}
impl Teams {
    pub fn from_matches(matches: &[Match]) -> Self {
        Self::from_names(
            matches
                .iter()
                .flat_map(|fixture| [fixture.home_team.as_str(), fixture.away_team.as_str()]),
        )
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names = names.into_iter().map(ToString::to_string).collect::<Vec<_>>();
        names.sort();
        names.dedup();
        let lookup = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), TeamId(index)))
            .collect();
        Self { names, lookup }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<TeamId> {
        self.lookup.get(name).copied()
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.names[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.names.len()).map(TeamId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(index, name)| (TeamId(index), name.as_str()))
    }
}

impl Index<TeamId> for Teams {
    type Output = str;

    fn index(&self, id: TeamId) -> &Self::Output {
        self.name(id)
    }
}
