use std::str::FromStr;

use super::*;

const HEADER: &str = "date,home_team,away_team,home_goals,away_goals";

fn ingest(body: &str, missing_goals: MissingGoals) -> Result<Vec<Match>, IngestError> {
    let input = format!("{HEADER}\n{body}");
    read_from_reader(input.as_bytes(), missing_goals)
}

#[test]
fn reads_well_formed_rows() {
    let matches = ingest(
        "2025-09-16,Arsenal,Athletic Club,2,0\n\
         2025-09-17,Inter,Ajax,2.0,0\n",
        MissingGoals::Reject,
    )
    .unwrap();
    assert_eq!(2, matches.len());
    assert_eq!(
        Match::new("Arsenal", "Athletic Club", Score::new(2, 0))
            .with_date(NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()),
        matches[0]
    );
    assert_eq!(Score::new(2, 0), matches[1].score);
}

#[test]
fn header_aliases_and_case() {
    let input = "Home Team,AWAY-TEAM,FTHG,FTAG\nA,B,1,1\n";
    let matches = read_from_reader(input.as_bytes(), MissingGoals::Reject).unwrap();
    assert_eq!(vec![Match::new("A", "B", Score::new(1, 1))], matches);
}

#[test]
fn missing_column() {
    let input = "home_team,away_team,home_goals\nA,B,1\n";
    let err = read_from_reader(input.as_bytes(), MissingGoals::Reject).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn(Column::AwayGoals)), "{err:?}");
    assert_eq!("missing column 'away_goals'", err.to_string());
}

#[test]
fn empty_input_has_no_header() {
    let err = read_from_reader("".as_bytes(), MissingGoals::Reject).unwrap_err();
    assert!(matches!(err, IngestError::NoHeader), "{err:?}");
}

#[test]
fn missing_goals_rejected_by_default() {
    let err = ingest(",A,B,,1\n", MissingGoals::Reject).unwrap_err();
    assert!(
        matches!(
            err,
            IngestError::MissingGoals {
                line: 2,
                column: Column::HomeGoals,
                ..
            }
        ),
        "{err:?}"
    );
}

#[test]
fn missing_goals_skipped() {
    let matches = ingest(",A,B,nan,1\n,B,C,2,abc\n,C,A,3,1\n", MissingGoals::Skip).unwrap();
    assert_eq!(vec![Match::new("C", "A", Score::new(3, 1))], matches);
}

#[test]
fn integral_goals_with_zero_fraction() {
    let matches = ingest(",A,B,3.00,007\n", MissingGoals::Reject).unwrap();
    assert_eq!(vec![Match::new("A", "B", Score::new(3, 7))], matches);
}

#[test]
fn missing_goals_as_zero() {
    let matches = ingest(",A,B,,1\n", MissingGoals::Zero).unwrap();
    assert_eq!(vec![Match::new("A", "B", Score::new(0, 1))], matches);
}

#[test]
fn malformed_goals_always_rejected() {
    for value in ["-1", "1.5", "300", "2x", "1e1", "+2", "2.", ".0", "0x1", "2.0.0"] {
        let err = ingest(&format!(",A,B,{value},1\n"), MissingGoals::Zero).unwrap_err();
        assert!(matches!(err, IngestError::MalformedGoals { line: 2, .. }), "{value}: {err:?}");
    }
}

#[test]
fn field_count_mismatch() {
    let err = ingest(",A,B,1\n", MissingGoals::Reject).unwrap_err();
    assert!(
        matches!(
            err,
            IngestError::FieldCount {
                line: 2,
                expected: 5,
                actual: 4
            }
        ),
        "{err:?}"
    );
}

#[test]
fn blank_lines_ignored_and_counted() {
    let err = ingest(",A,B,1,0\n\n,A,,1,0\n", MissingGoals::Reject).unwrap_err();
    assert!(
        matches!(
            err,
            IngestError::EmptyTeam {
                line: 4,
                column: Column::AwayTeam
            }
        ),
        "{err:?}"
    );
}

#[test]
fn quoted_field_spanning_lines() {
    let err = ingest(",\"Paris\nSaint-Germain\",Inter,1,0\n", MissingGoals::Reject).unwrap_err();
    assert!(
        matches!(err, IngestError::Csv(CsvError::UnterminatedQuote { line: 2 })),
        "{err:?}"
    );
    assert_eq!("line 2: unterminated quoted field", err.to_string());
}

#[test]
fn team_cannot_play_itself() {
    let err = ingest(",A,A,1,0\n", MissingGoals::Reject).unwrap_err();
    assert!(matches!(err, IngestError::SameTeam { line: 2, .. }), "{err:?}");
}

#[test]
fn malformed_date() {
    let err = ingest("yesterday,A,B,1,0\n", MissingGoals::Reject).unwrap_err();
    assert!(matches!(err, IngestError::MalformedDate { line: 2, .. }), "{err:?}");
}

#[test]
fn date_formats() {
    let expected = NaiveDate::from_ymd_opt(2025, 10, 1);
    assert_eq!(expected, parse_date("2025-10-01"));
    assert_eq!(expected, parse_date("2025-10-01 21:00"));
    assert_eq!(expected, parse_date("01.10.2025"));
    assert_eq!(expected, parse_date("01/10/2025"));
    assert_eq!(None, parse_date("Oct 1"));
}

#[test]
fn date_range_filter() {
    let day = |d| NaiveDate::from_ymd_opt(2025, 10, d).unwrap();
    let matches = vec![
        Match::new("A", "B", Score::nil_all()).with_date(day(1)),
        Match::new("B", "C", Score::nil_all()).with_date(day(5)),
        Match::new("C", "A", Score::nil_all()),
        Match::new("A", "C", Score::nil_all()).with_date(day(9)),
    ];
    assert_eq!(4, DateRange::default().filter(matches.clone()).len());

    let range = DateRange {
        since: Some(day(2)),
        until: Some(day(9)),
    };
    let filtered = range.filter(matches);
    assert_eq!(2, filtered.len());
    assert_eq!("B", filtered[0].home_team);
    assert_eq!("A", filtered[1].home_team);
}

#[test]
fn missing_goals_from_str() {
    assert_eq!(MissingGoals::Skip, MissingGoals::from_str("skip").unwrap());
    assert_eq!(MissingGoals::Zero, MissingGoals::from_str("ZERO").unwrap());
    assert!(MissingGoals::from_str("drop").is_err());
    assert_eq!("reject", MissingGoals::default().to_string());
}
