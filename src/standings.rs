//! League table derived from match results.
//!
//! A win is worth 3 points and a draw 1 point to each side. Rows are ranked by points, then by goal
//! difference, then by team name so that fully level teams always appear in the same order.

use std::cmp::Ordering;

use crate::domain::{Match, Side, Teams};

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandingsRow {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}
impl StandingsRow {
    fn record(&mut self, fixture: &Match, side: Side) {
        let score = &fixture.score;
        self.played += 1;
        self.goals_for += score.scored(side) as u32;
        self.goals_against += score.conceded(side) as u32;
        self.goal_difference += score.margin(side);
        match score.winner() {
            None => {
                self.drawn += 1;
                self.points += POINTS_FOR_DRAW;
            }
            Some(winner) if winner == side => {
                self.won += 1;
                self.points += POINTS_FOR_WIN;
            }
            Some(_) => self.lost += 1,
        }
    }
}

/// Ranking order: points descending, goal difference descending, name ascending.
pub fn compare(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| a.team.cmp(&b.team))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    pub rows: Vec<StandingsRow>,
}
impl Standings {
    pub fn compute(matches: &[Match]) -> Self {
        let teams = Teams::from_matches(matches);
        Self::compute_with(&teams, matches)
    }

    /// Tallies `matches` over a known team universe. Every team in `teams` gets a row, including
    /// those without a fixture.
    pub fn compute_with(teams: &Teams, matches: &[Match]) -> Self {
        let mut rows = teams
            .iter()
            .map(|(_, name)| StandingsRow {
                team: name.to_string(),
                ..StandingsRow::default()
            })
            .collect::<Vec<_>>();

        for fixture in matches {
            for side in [Side::Home, Side::Away] {
                if let Some(id) = teams.id_of(fixture.team(side)) {
                    rows[id.as_index()].record(fixture, side);
                }
            }
        }

        rows.sort_by(compare);
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn leader(&self) -> Option<&StandingsRow> {
        self.rows.first()
    }

    pub fn top(&self, n: usize) -> &[StandingsRow] {
        &self.rows[..usize::min(n, self.rows.len())]
    }

    pub fn total_points(&self) -> u32 {
        self.rows.iter().map(|row| row.points).sum()
    }

    pub fn total_goal_difference(&self) -> i32 {
        self.rows.iter().map(|row| row.goal_difference).sum()
    }
}
