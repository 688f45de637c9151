//! Testing helpers.

use assert_float_eq::*;

use crate::domain::{Match, Score};

pub fn fixture(home_team: &str, away_team: &str, home_goals: u8, away_goals: u8) -> Match {
    Match::new(home_team, away_team, Score::new(home_goals, away_goals))
}

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}
