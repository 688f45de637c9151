//! Monte Carlo simulation of a single-elimination bracket.
//!
//! Each trial shuffles the participants and plays adjacent pairs round by round until one team
//! remains. A team's goals in a match are Poisson-distributed with rate
//! `max(strength + baseline, floor)`; the higher count advances and level counts are settled by a
//! fair coin. The source of randomness is supplied by the caller, so a seeded generator gives
//! reproducible results.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tinyrand::Rand;
use tracing::debug;

use crate::domain::{TeamId, Teams};
use crate::draw::{coin_flip, shuffle};
use crate::poisson;
use crate::strength::Strengths;

#[cfg(test)]
mod tests;

/// Treatment of a round that starts with an odd number of teams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OddRound {
    /// Refuse to build a bracket whose rounds cannot all be paired.
    #[default]
    Reject,

    /// The unpaired team advances without playing.
    Bye,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    pub trials: u64,
    pub baseline: f64,
    pub floor: f64,
    pub odd_round: OddRound,
}

impl BracketConfig {
    pub fn validate(&self) -> Result<(), BracketError> {
        if self.trials == 0 {
            return Err(BracketError::NoTrials);
        }
        if !self.baseline.is_finite() {
            return Err(BracketError::InvalidBaseline(self.baseline));
        }
        if !self.floor.is_finite() || self.floor <= 0.0 {
            return Err(BracketError::InvalidFloor(self.floor));
        }
        Ok(())
    }
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            trials: 1_000,
            baseline: 1.5,
            floor: 0.2,
            odd_round: OddRound::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BracketError {
    #[error("number of trials must be at least 1")]
    NoTrials,

    #[error("baseline rate must be finite, got {0}")]
    InvalidBaseline(f64),

    #[error("floor rate must be positive and finite, got {0}")]
    InvalidFloor(f64),

    #[error("{strengths} strength estimates supplied for {teams} teams")]
    StrengthMismatch { strengths: usize, teams: usize },

    #[error("unknown team '{0}'")]
    UnknownTeam(String),

    #[error("team '{0}' entered more than once")]
    DuplicateTeam(String),

    #[error("at least two teams are needed for a bracket, got {0}")]
    TooFewTeams(usize),

    #[error("round {round} would start with an odd number of teams ({teams})")]
    OddRound { round: usize, teams: usize },
}

/// Number of rounds needed to reduce `teams` to a single winner, or the first round that cannot be
/// fully paired when byes are not allowed.
fn count_rounds(teams: usize, odd_round: OddRound) -> Result<usize, BracketError> {
    let mut remaining = teams;
    let mut rounds = 0;
    while remaining > 1 {
        if remaining % 2 == 1 && odd_round == OddRound::Reject {
            return Err(BracketError::OddRound {
                round: rounds + 1,
                teams: remaining,
            });
        }
        remaining = remaining / 2 + remaining % 2;
        rounds += 1;
    }
    Ok(rounds)
}

#[derive(Debug, Clone)]
pub struct Bracket {
    teams: Teams,
    participants: Vec<TeamId>,
    rates: Vec<f64>,
    config: BracketConfig,
    rounds: usize,
}
impl Bracket {
    /// A bracket entered by every team in the universe.
    pub fn new(
        teams: &Teams,
        strengths: &Strengths,
        config: BracketConfig,
    ) -> Result<Self, BracketError> {
        Self::build(teams, strengths, teams.ids().collect(), config)
    }

    /// A bracket entered by the named subset of teams.
    pub fn with_participants<S: AsRef<str>>(
        teams: &Teams,
        strengths: &Strengths,
        names: &[S],
        config: BracketConfig,
    ) -> Result<Self, BracketError> {
        let mut participants = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref().trim();
            let id = teams
                .id_of(name)
                .ok_or_else(|| BracketError::UnknownTeam(name.to_string()))?;
            if participants.contains(&id) {
                return Err(BracketError::DuplicateTeam(name.to_string()));
            }
            participants.push(id);
        }
        Self::build(teams, strengths, participants, config)
    }

    fn build(
        teams: &Teams,
        strengths: &Strengths,
        participants: Vec<TeamId>,
        config: BracketConfig,
    ) -> Result<Self, BracketError> {
        config.validate()?;
        if strengths.len() != teams.len() {
            return Err(BracketError::StrengthMismatch {
                strengths: strengths.len(),
                teams: teams.len(),
            });
        }
        if participants.len() < 2 {
            return Err(BracketError::TooFewTeams(participants.len()));
        }
        let rounds = count_rounds(participants.len(), config.odd_round)?;
        let rates = teams
            .ids()
            .map(|id| f64::max(strengths.differential(id) + config.baseline, config.floor))
            .collect();
        debug!(
            "bracket of {} teams over {rounds} rounds, config: {config:?}",
            participants.len()
        );
        Ok(Self {
            teams: teams.clone(),
            participants,
            rates,
            config,
            rounds,
        })
    }

    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn participants(&self) -> &[TeamId] {
        &self.participants
    }

    pub fn config(&self) -> &BracketConfig {
        &self.config
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Poisson scoring rate of `team` in any match.
    pub fn rate(&self, team: TeamId) -> f64 {
        self.rates[team.as_index()]
    }

    /// Plays a single match, returning the team that advances.
    pub fn play(&self, first: TeamId, second: TeamId, rand: &mut impl Rand) -> TeamId {
        let first_goals = poisson::sample(self.rate(first), rand);
        let second_goals = poisson::sample(self.rate(second), rand);
        match first_goals.cmp(&second_goals) {
            std::cmp::Ordering::Greater => first,
            std::cmp::Ordering::Less => second,
            std::cmp::Ordering::Equal => {
                if coin_flip(rand) {
                    first
                } else {
                    second
                }
            }
        }
    }

    /// Runs one bracket over `order`, which is consumed as the first-round pairing. `reached` is
    /// incremented for every team entering every round.
    fn run_once(
        &self,
        order: &mut Vec<TeamId>,
        next: &mut Vec<TeamId>,
        reached: &mut [Vec<u64>],
        rand: &mut impl Rand,
    ) -> TeamId {
        for team in order.iter() {
            reached[0][team.as_index()] += 1;
        }
        let mut round = 0;
        while order.len() > 1 {
            next.clear();
            let mut pairs = order.chunks_exact(2);
            for pair in &mut pairs {
                next.push(self.play(pair[0], pair[1], rand));
            }
            if let [bye] = pairs.remainder() {
                debug_assert_eq!(OddRound::Bye, self.config.odd_round);
                next.push(*bye);
            }
            round += 1;
            for team in next.iter() {
                reached[round][team.as_index()] += 1;
            }
            std::mem::swap(order, next);
        }
        order[0]
    }

    pub fn simulate(&self, rand: &mut impl Rand) -> SimulationResult {
        let teams = self.teams.len();
        let mut wins = vec![0; teams];
        let mut reached = vec![vec![0; teams]; self.rounds + 1];
        let mut order = Vec::with_capacity(self.participants.len());
        let mut next = Vec::with_capacity(self.participants.len());
        for _ in 0..self.config.trials {
            order.clear();
            order.extend_from_slice(&self.participants);
            shuffle(&mut order, rand);
            let champion = self.run_once(&mut order, &mut next, &mut reached, rand);
            wins[champion.as_index()] += 1;
        }

        SimulationResult {
            trials: self.config.trials,
            teams: self.teams.clone(),
            participants: self.participants.clone(),
            wins,
            reached,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChampionOdds {
    pub team: TeamId,
    pub name: String,
    pub wins: u64,
    pub probability: f64,
}

/// Tallies over all trials of a [`Bracket`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub trials: u64,
    teams: Teams,
    participants: Vec<TeamId>,
    wins: Vec<u64>,
    reached: Vec<Vec<u64>>,
}
impl SimulationResult {
    pub fn teams(&self) -> &Teams {
        &self.teams
    }

    pub fn participants(&self) -> &[TeamId] {
        &self.participants
    }

    pub fn rounds(&self) -> usize {
        self.reached.len() - 1
    }

    pub fn wins(&self, team: TeamId) -> u64 {
        self.wins[team.as_index()]
    }

    /// Championship probability of `team`, in percent.
    pub fn probability(&self, team: TeamId) -> f64 {
        self.wins(team) as f64 / self.trials as f64 * 100.0
    }

    /// Probability of `team` entering `round`, in percent. Round 0 is the opening round;
    /// round [`rounds`](Self::rounds) is the title itself.
    pub fn reach_probability(&self, round: usize, team: TeamId) -> f64 {
        self.reached[round][team.as_index()] as f64 / self.trials as f64 * 100.0
    }

    /// Participants by championship probability, most likely first; equal teams by name.
    pub fn ranked(&self) -> Vec<ChampionOdds> {
        let mut ranked = self
            .participants
            .iter()
            .map(|&team| ChampionOdds {
                team,
                name: self.teams.name(team).to_string(),
                wins: self.wins(team),
                probability: self.probability(team),
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.name.cmp(&b.name)));
        ranked
    }

    pub fn favourite(&self) -> Option<ChampionOdds> {
        self.ranked().into_iter().next()
    }
}
