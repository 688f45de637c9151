//! Scalar team strength from historical scoring and conceding rates.
//!
//! A team's attack is the mean of its per-match goals scored as the home side and as the away side,
//! each role weighted equally regardless of how many matches it covers. Defense is the same over
//! goals conceded. Strength is attack minus defense. A team seen in only one role is rated on that
//! role alone.

use std::ops::Index;

use crate::domain::{Match, Side, TeamId, Teams};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RoleTally {
    matches: u32,
    scored: u32,
    conceded: u32,
}
impl RoleTally {
    fn mean_scored(&self) -> Option<f64> {
        (self.matches > 0).then(|| self.scored as f64 / self.matches as f64)
    }

    fn mean_conceded(&self) -> Option<f64> {
        (self.matches > 0).then(|| self.conceded as f64 / self.matches as f64)
    }
}

fn role_mean(home: Option<f64>, away: Option<f64>) -> f64 {
    match (home, away) {
        (Some(home), Some(away)) => (home + away) / 2.0,
        (Some(single), None) | (None, Some(single)) => single,
        (None, None) => 0.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamStrength {
    pub attack: f64,
    pub defense: f64,
}
impl TeamStrength {
    pub fn attack_minus_defense(&self) -> f64 {
        self.attack - self.defense
    }
}

/// Strength per team, indexed by [`TeamId`] of the universe it was estimated over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strengths {
    values: Vec<TeamStrength>,
}
impl Strengths {
    pub fn estimate(teams: &Teams, matches: &[Match]) -> Self {
        let mut tallies = vec![[RoleTally::default(); 2]; teams.len()];
        for fixture in matches {
            for (role, side) in [Side::Home, Side::Away].into_iter().enumerate() {
                if let Some(id) = teams.id_of(fixture.team(side)) {
                    let tally = &mut tallies[id.as_index()][role];
                    tally.matches += 1;
                    tally.scored += fixture.score.scored(side) as u32;
                    tally.conceded += fixture.score.conceded(side) as u32;
                }
            }
        }

        let values = tallies
            .iter()
            .map(|[home, away]| TeamStrength {
                attack: role_mean(home.mean_scored(), away.mean_scored()),
                defense: role_mean(home.mean_conceded(), away.mean_conceded()),
            })
            .collect();
        Self { values }
    }

    /// Uniform strengths, mostly useful for exercising the simulator.
    pub fn uniform(teams: usize, strength: TeamStrength) -> Self {
        Self {
            values: vec![strength; teams],
        }
    }

    pub fn from_values(values: Vec<TeamStrength>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: TeamId) -> Option<&TeamStrength> {
        self.values.get(id.as_index())
    }

    pub fn differential(&self, id: TeamId) -> f64 {
        self[id].attack_minus_defense()
    }
}

impl Index<TeamId> for Strengths {
    type Output = TeamStrength;

    fn index(&self, id: TeamId) -> &Self::Output {
        &self.values[id.as_index()]
    }
}
