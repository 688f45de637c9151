//! Console tables for the reports.

use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::bracket::SimulationResult;
use crate::domain::Match;
use crate::leaders::{Comparison, Leader};
use crate::standings::StandingsRow;
use crate::stats::TeamGoals;

fn left(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Left))
}

fn right(min_width: usize) -> Col {
    Col::new(Styles::default().with(MinWidth(min_width)).with(HAlign::Right))
}

fn header_row(cells: &[&str]) -> Row {
    Row::new(
        Styles::default().with(Header(true)),
        cells.iter().map(|&cell| cell.into()).collect(),
    )
}

/// Label of the stage reached after `round` of `rounds` rounds.
pub fn round_label(round: usize, rounds: usize) -> String {
    match rounds.saturating_sub(round) {
        0 => "Winner".into(),
        1 => "Final".into(),
        2 => "Semi".into(),
        3 => "Quarter".into(),
        remaining => format!("Last {}", 1usize << remaining),
    }
}

pub fn tabulate_standings(rows: &[StandingsRow]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            right(3),
            left(20),
            right(3),
            right(3),
            right(3),
            right(3),
            right(4),
            right(4),
            right(5),
            right(5),
        ])
        .with_row(header_row(&[
            "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts",
        ]));
    for (index, row) in rows.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                row.team.clone().into(),
                format!("{}", row.played).into(),
                format!("{}", row.won).into(),
                format!("{}", row.drawn).into(),
                format!("{}", row.lost).into(),
                format!("{}", row.goals_for).into(),
                format!("{}", row.goals_against).into(),
                format!("{:+}", row.goal_difference).into(),
                format!("{}", row.points).into(),
            ],
        ));
    }
    table
}

/// Championship odds, followed by the chance of reaching each stage.
pub fn tabulate_simulation(result: &SimulationResult, top: usize) -> Table {
    let rounds = result.rounds();
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![left(20), right(9), right(8)];
            cols.push(Col::new(
                Styles::default()
                    .with(Separator(true))
                    .with(MinWidth(3))
                    .with(HAlign::Centred),
            ));
            for _ in 1..rounds {
                cols.push(right(9));
            }
            cols
        })
        .with_row({
            let mut header_cells = vec!["Team".into(), "Champion".into(), "Wins".into(), "".into()];
            for round in 1..rounds {
                header_cells.push(round_label(round, rounds).into());
            }
            Row::new(
                Styles::default().with(Header(true)).with(Separator(true)),
                header_cells,
            )
        });

    for odds in result.ranked().into_iter().take(top) {
        let mut row_cells = vec![
            odds.name.into(),
            format!("{:.2}%", odds.probability).into(),
            format!("{}", odds.wins).into(),
            "".into(),
        ];
        for round in 1..rounds {
            row_cells.push(format!("{:.2}%", result.reach_probability(round, odds.team)).into());
        }
        table.push_row(Row::new(Styles::default(), row_cells));
    }
    table
}

pub fn tabulate_team_goals(entries: &[TeamGoals]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![left(20), right(6)])
        .with_row(header_row(&["Team", "Goals"]));
    for entry in entries {
        table.push_row(Row::new(
            Styles::default(),
            vec![entry.team.clone().into(), format!("{}", entry.goals).into()],
        ));
    }
    table
}

pub fn tabulate_matches(matches: &[&Match]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![left(10), left(20), left(20), right(6), right(6)])
        .with_row(header_row(&["Date", "Home", "Away", "Score", "Total"]));
    for fixture in matches {
        let date = fixture
            .date
            .map(|date| date.to_string())
            .unwrap_or_default();
        table.push_row(Row::new(
            Styles::default(),
            vec![
                date.into(),
                fixture.home_team.clone().into(),
                fixture.away_team.clone().into(),
                fixture.score.to_string().into(),
                format!("{}", fixture.score.total()).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_histogram(histogram: &[usize]) -> Table {
    let peak = histogram.iter().copied().max().unwrap_or_default();
    let mut table = Table::default()
        .with_cols(vec![right(5), right(7), left(40)])
        .with_row(header_row(&["Goals", "Matches", ""]));
    for (goals, &count) in histogram.iter().enumerate() {
        let bar = if peak == 0 { 0 } else { count * 40 / peak };
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{goals}").into(),
                format!("{count}").into(),
                "#".repeat(bar).into(),
            ],
        ));
    }
    table
}

/// Whole values without decimals, the rest to two places.
pub fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub fn tabulate_leaders(leaders: &[Leader], title: &str) -> Table {
    let mut table = Table::default()
        .with_cols(vec![right(3), left(25), left(20), right(8)])
        .with_row(header_row(&["#", "Player", "Team", title]));
    for (index, leader) in leaders.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                leader.player.clone().into(),
                leader.team.clone().unwrap_or_default().into(),
                format_stat(leader.value).into(),
            ],
        ));
    }
    table
}

pub fn tabulate_comparison(comparison: &Comparison) -> Table {
    let mut table = Table::default()
        .with_cols(vec![left(20), right(12), right(12)])
        .with_row(header_row(&["", comparison.first.as_str(), comparison.second.as_str()]));
    for stat in &comparison.stats {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                stat.stat.clone().into(),
                format_stat(stat.first).into(),
                format_stat(stat.second).into(),
            ],
        ));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaders::ComparedStat;

    #[test]
    fn round_labels() {
        assert_eq!("Last 16", round_label(0, 4));
        assert_eq!("Quarter", round_label(1, 4));
        assert_eq!("Semi", round_label(2, 4));
        assert_eq!("Final", round_label(3, 4));
        assert_eq!("Winner", round_label(4, 4));
        assert_eq!("Last 32", round_label(1, 6));
    }

    #[test]
    fn standings_table_shape() {
        let rows = vec![StandingsRow {
            team: "A".into(),
            played: 1,
            won: 1,
            points: 3,
            goals_for: 2,
            goal_difference: 2,
            ..StandingsRow::default()
        }];
        let table = tabulate_standings(&rows);
        assert_eq!(10, table.num_cols());
        assert_eq!(2, table.num_rows());
    }

    #[test]
    fn stat_formatting() {
        assert_eq!("12", format_stat(12.0));
        assert_eq!("87.50", format_stat(87.5));
    }

    #[test]
    fn comparison_table_shape() {
        let comparison = Comparison {
            first: "Arsenal".into(),
            second: "Inter".into(),
            stats: vec![ComparedStat {
                stat: "goals".into(),
                first: 10.0,
                second: 12.0,
            }],
        };
        let table = tabulate_comparison(&comparison);
        assert_eq!(3, table.num_cols());
        assert_eq!(2, table.num_rows());
    }

    #[test]
    fn histogram_table_shape() {
        let table = tabulate_histogram(&[1, 0, 4]);
        assert_eq!(3, table.num_cols());
        assert_eq!(4, table.num_rows());
    }
}
