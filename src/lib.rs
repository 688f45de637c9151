//! League standings and a seeded Monte Carlo model of a single-elimination football tournament.
//! Folds historical match results into a points table, rates each team by its scoring and conceding
//! rates, and estimates championship odds by replaying a randomised knockout bracket. Player stat
//! sheets can be ranked into leaderboards and teams compared side by side.

pub mod bracket;
pub mod csv;
pub mod data;
pub mod domain;
pub mod draw;
pub mod file;
pub mod leaders;
pub mod poisson;
pub mod print;
pub mod standings;
pub mod stats;
pub mod strength;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
