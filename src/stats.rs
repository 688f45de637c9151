//! Descriptive goal statistics over a set of matches.

use crate::domain::{Match, Side, Teams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGoals {
    pub team: String,
    pub goals: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomeAwayGoals {
    pub home: u32,
    pub away: u32,
}

fn rank_by_goals(teams: &Teams, totals: Vec<u32>) -> Vec<TeamGoals> {
    let mut ranked = teams
        .iter()
        .map(|(id, name)| TeamGoals {
            team: name.to_string(),
            goals: totals[id.as_index()],
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.goals.cmp(&a.goals).then_with(|| a.team.cmp(&b.team)));
    ranked
}

fn tally(matches: &[Match], teams: &Teams, count: impl Fn(&Match, Side) -> u8) -> Vec<u32> {
    let mut totals = vec![0; teams.len()];
    for fixture in matches {
        for side in [Side::Home, Side::Away] {
            if let Some(id) = teams.id_of(fixture.team(side)) {
                totals[id.as_index()] += count(fixture, side) as u32;
            }
        }
    }
    totals
}

/// Goals scored per team, most prolific first.
pub fn goals_scored(matches: &[Match]) -> Vec<TeamGoals> {
    let teams = Teams::from_matches(matches);
    let totals = tally(matches, &teams, |fixture, side| fixture.score.scored(side));
    rank_by_goals(&teams, totals)
}

/// Goals conceded per team, leakiest first.
pub fn goals_conceded(matches: &[Match]) -> Vec<TeamGoals> {
    let teams = Teams::from_matches(matches);
    let totals = tally(matches, &teams, |fixture, side| fixture.score.conceded(side));
    rank_by_goals(&teams, totals)
}

pub fn home_away_goals(matches: &[Match]) -> HomeAwayGoals {
    matches
        .iter()
        .fold(HomeAwayGoals::default(), |totals, fixture| HomeAwayGoals {
            home: totals.home + fixture.score.home as u32,
            away: totals.away + fixture.score.away as u32,
        })
}

/// The `n` matches with the most goals. Equal totals keep their input order.
pub fn highest_scoring(matches: &[Match], n: usize) -> Vec<&Match> {
    let mut sorted = matches.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| b.score.total().cmp(&a.score.total()));
    sorted.truncate(n);
    sorted
}

pub fn mean_goals(matches: &[Match]) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let total: u32 = matches.iter().map(|fixture| fixture.score.total() as u32).sum();
    Some(total as f64 / matches.len() as f64)
}

/// Number of matches for each total goal count; index `k` holds the matches with `k` goals.
pub fn goal_histogram(matches: &[Match]) -> Vec<usize> {
    let max = matches
        .iter()
        .map(|fixture| fixture.score.total() as usize)
        .max();
    let Some(max) = max else {
        return vec![];
    };
    let mut histogram = vec![0; max + 1];
    for fixture in matches {
        histogram[fixture.score.total() as usize] += 1;
    }
    histogram
}
