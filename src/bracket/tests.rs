use std::str::FromStr;

use assert_float_eq::*;
use tinyrand::{Seeded, StdRand};
use tinyrand_alloc::Mock;

use super::*;
use crate::strength::TeamStrength;

fn teams(count: usize) -> Teams {
    let names = (0..count)
        .map(|index| format!("T{index:02}"))
        .collect::<Vec<_>>();
    Teams::from_names(names.iter().map(String::as_str))
}

fn level(count: usize) -> (Teams, Strengths) {
    (teams(count), Strengths::uniform(count, TeamStrength::default()))
}

fn config(trials: u64) -> BracketConfig {
    BracketConfig {
        trials,
        ..BracketConfig::default()
    }
}

#[test]
fn default_config() {
    let config = BracketConfig::default();
    assert_eq!(1_000, config.trials);
    assert_eq!(1.5, config.baseline);
    assert_eq!(0.2, config.floor);
    assert_eq!(OddRound::Reject, config.odd_round);
    config.validate().unwrap();
}

#[test]
fn invalid_config() {
    assert_eq!(Err(BracketError::NoTrials), config(0).validate());
    let bad_floor = BracketConfig {
        floor: 0.0,
        ..BracketConfig::default()
    };
    assert_eq!(Err(BracketError::InvalidFloor(0.0)), bad_floor.validate());
    let bad_baseline = BracketConfig {
        baseline: f64::INFINITY,
        ..BracketConfig::default()
    };
    assert_eq!(
        Err(BracketError::InvalidBaseline(f64::INFINITY)),
        bad_baseline.validate()
    );
}

#[test]
fn config_from_partial_json() {
    let config: BracketConfig =
        serde_json::from_str(r#"{"trials": 250, "odd_round": "bye"}"#).unwrap();
    assert_eq!(250, config.trials);
    assert_eq!(OddRound::Bye, config.odd_round);
    assert_eq!(1.5, config.baseline);
    assert_eq!(OddRound::Bye, OddRound::from_str("BYE").unwrap());
}

#[test]
fn round_counts() {
    assert_eq!(Ok(1), count_rounds(2, OddRound::Reject));
    assert_eq!(Ok(4), count_rounds(16, OddRound::Reject));
    assert_eq!(Ok(2), count_rounds(3, OddRound::Bye));
    assert_eq!(Ok(3), count_rounds(5, OddRound::Bye));
    assert_eq!(Ok(6), count_rounds(36, OddRound::Bye));
    assert_eq!(
        Err(BracketError::OddRound { round: 2, teams: 3 }),
        count_rounds(6, OddRound::Reject)
    );
}

#[test]
fn odd_team_count_rejected() {
    let (teams, strengths) = level(3);
    let err = Bracket::new(&teams, &strengths, config(10)).unwrap_err();
    assert_eq!(BracketError::OddRound { round: 1, teams: 3 }, err);
}

#[test]
fn too_few_teams() {
    let (teams, strengths) = level(1);
    assert_eq!(
        BracketError::TooFewTeams(1),
        Bracket::new(&teams, &strengths, config(10)).unwrap_err()
    );
    let (teams, strengths) = level(0);
    assert_eq!(
        BracketError::TooFewTeams(0),
        Bracket::new(&teams, &strengths, config(10)).unwrap_err()
    );
}

#[test]
fn unknown_and_duplicate_participants() {
    let (teams, strengths) = level(4);
    assert_eq!(
        BracketError::UnknownTeam("Ajax".into()),
        Bracket::with_participants(&teams, &strengths, &["T00", "Ajax"], config(10)).unwrap_err()
    );
    assert_eq!(
        BracketError::DuplicateTeam("T01".into()),
        Bracket::with_participants(&teams, &strengths, &["T01", "T01"], config(10)).unwrap_err()
    );
}

#[test]
fn strength_mismatch() {
    let teams = teams(4);
    let strengths = Strengths::uniform(3, TeamStrength::default());
    assert_eq!(
        BracketError::StrengthMismatch {
            strengths: 3,
            teams: 4
        },
        Bracket::new(&teams, &strengths, config(10)).unwrap_err()
    );
}

#[test]
fn rates_clamped_at_floor() {
    let teams = teams(2);
    let strengths = Strengths::from_values(vec![
        TeamStrength {
            attack: 0.5,
            defense: 3.0,
        },
        TeamStrength {
            attack: 2.0,
            defense: 1.0,
        },
    ]);
    let bracket = Bracket::new(&teams, &strengths, config(1)).unwrap();
    assert_float_absolute_eq!(0.2, bracket.rate(TeamId::index(0)));
    assert_float_absolute_eq!(2.5, bracket.rate(TeamId::index(1)));
}

#[test]
fn scripted_randomness() {
    // every draw is zero: the shuffle rotates [0, 1, 2, 3] into [1, 2, 3, 0], every match finishes
    // 0-0 and the coin always favours the first-named team
    let (teams, strengths) = level(4);
    let bracket = Bracket::new(&teams, &strengths, config(5)).unwrap();
    let result = bracket.simulate(&mut Mock::default().with_next_u128(|_| 0));
    assert_eq!(5, result.wins(TeamId::index(1)));
    assert_eq!(100.0, result.probability(TeamId::index(1)));
    assert_eq!(0.0, result.probability(TeamId::index(0)));
    assert_eq!(100.0, result.reach_probability(1, TeamId::index(3)));
    assert_eq!(0.0, result.reach_probability(1, TeamId::index(2)));
}

#[test]
fn seeded_runs_are_reproducible() {
    let teams = teams(8);
    let strengths = Strengths::from_values(
        (0..8)
            .map(|index| TeamStrength {
                attack: index as f64 * 0.2,
                defense: 0.5,
            })
            .collect(),
    );
    let bracket = Bracket::new(&teams, &strengths, config(500)).unwrap();
    let first = bracket.simulate(&mut StdRand::seed(42));
    let second = bracket.simulate(&mut StdRand::seed(42));
    assert_eq!(first, second);
    let third = bracket.simulate(&mut StdRand::seed(43));
    assert_ne!(first, third);
}

#[test]
fn equal_strengths_give_equal_odds() {
    let (teams, strengths) = level(4);
    let bracket = Bracket::new(&teams, &strengths, config(10_000)).unwrap();
    let result = bracket.simulate(&mut StdRand::seed(7));
    let total: u64 = teams.ids().map(|team| result.wins(team)).sum();
    assert_eq!(10_000, total);
    for team in teams.ids() {
        assert_float_absolute_eq!(25.0, result.probability(team), 3.0);
        assert_float_absolute_eq!(100.0, result.reach_probability(0, team));
        assert_float_absolute_eq!(50.0, result.reach_probability(1, team), 3.0);
    }
}

#[test]
fn stronger_team_favoured() {
    let teams = teams(4);
    let mut values = vec![TeamStrength::default(); 4];
    values[2] = TeamStrength {
        attack: 3.0,
        defense: 0.0,
    };
    let strengths = Strengths::from_values(values);
    let bracket = Bracket::new(&teams, &strengths, config(2_000)).unwrap();
    let result = bracket.simulate(&mut StdRand::seed(3));
    let favourite = result.favourite().unwrap();
    assert_eq!("T02", favourite.name);
    assert!(favourite.probability > 60.0, "{favourite:?}");
    let ranked = result.ranked();
    assert_eq!(4, ranked.len());
    assert!(ranked.windows(2).all(|pair| pair[0].wins >= pair[1].wins));
}

#[test]
fn byes_keep_every_team_in_play() {
    let (teams, strengths) = level(5);
    let config = BracketConfig {
        trials: 2_000,
        odd_round: OddRound::Bye,
        ..BracketConfig::default()
    };
    let bracket = Bracket::new(&teams, &strengths, config).unwrap();
    assert_eq!(3, bracket.rounds());
    let result = bracket.simulate(&mut StdRand::seed(11));
    assert_eq!(3, result.rounds());
    let total: u64 = teams.ids().map(|team| result.wins(team)).sum();
    assert_eq!(2_000, total);
    for team in teams.ids() {
        assert!(result.wins(team) > 0, "{team} never won");
        let advanced: f64 = result.reach_probability(1, team);
        assert!(advanced > 0.0 && advanced < 100.0);
    }
    let entering_second: f64 = teams
        .ids()
        .map(|team| result.reach_probability(1, team))
        .sum();
    assert_float_absolute_eq!(300.0, entering_second, 1e-9);
}

#[test]
fn subset_of_participants() {
    let (teams, strengths) = level(6);
    let bracket =
        Bracket::with_participants(&teams, &strengths, &["T05", "T03"], config(100)).unwrap();
    assert_eq!(1, bracket.rounds());
    let result = bracket.simulate(&mut StdRand::seed(5));
    assert_eq!(2, result.ranked().len());
    assert_eq!(0, result.wins(TeamId::index(0)));
    assert_eq!(
        100,
        result.wins(TeamId::index(5)) + result.wins(TeamId::index(3))
    );
}
