use criterion::{criterion_group, criterion_main, Criterion};
use knockout::bracket::{Bracket, BracketConfig, OddRound};
use knockout::domain::Teams;
use knockout::strength::{Strengths, TeamStrength};
use tinyrand::{StdRand, Wyrand};
use tinyrand_alloc::Mock;

fn criterion_benchmark(c: &mut Criterion) {
    let names = (0..32).map(|index| format!("Team {index}")).collect::<Vec<_>>();
    let teams = Teams::from_names(names.iter().map(String::as_str));
    let strengths = Strengths::from_values(
        (0..32)
            .map(|index| TeamStrength {
                attack: 1.0 + index as f64 * 0.05,
                defense: 1.5 - index as f64 * 0.03,
            })
            .collect(),
    );
    let bracket = Bracket::new(
        &teams,
        &strengths,
        BracketConfig {
            trials: 1_000,
            ..BracketConfig::default()
        },
    )
    .unwrap();

    // sanity check
    let result = bracket.simulate(&mut StdRand::default());
    let total: u64 = teams.ids().map(|team| result.wins(team)).sum();
    assert_eq!(1_000, total);

    c.bench_function("cri_bracket_32_1k_wyrand", |b| {
        let mut rand = Wyrand::default();
        b.iter(|| bracket.simulate(&mut rand));
    });

    c.bench_function("cri_bracket_32_1k_mock", |b| {
        let mut rand = Mock::default();
        b.iter(|| bracket.simulate(&mut rand));
    });

    let byes = Bracket::new(
        &teams,
        &strengths,
        BracketConfig {
            trials: 1_000,
            odd_round: OddRound::Bye,
            ..BracketConfig::default()
        },
    )
    .unwrap();
    c.bench_function("cri_bracket_32_1k_byes", |b| {
        let mut rand = Wyrand::default();
        b.iter(|| byes.simulate(&mut rand));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
