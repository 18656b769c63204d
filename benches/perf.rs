use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use squadmap_terminal::dataset::{ClubStint, Coord, Player, parse_dataset_json, year_index};
use squadmap_terminal::markers::{roster_markers, trajectory_markers};
use squadmap_terminal::timeline::stints_through;

static SQUADS_JSON: &str = include_str!("../tests/fixtures/squads.json");

fn synthetic_roster(players: usize, stints_per_player: usize) -> Vec<Player> {
    (0..players)
        .map(|p| Player {
            id: format!("player-{p}"),
            name: format!("Player {p}"),
            birth_country: None,
            position: None,
            stints: (0..stints_per_player)
                .map(|s| ClubStint {
                    club: format!("Club {}", (p + s) % 40),
                    from: 1990 + (s as i32) * 2,
                    to: if s + 1 == stints_per_player {
                        None
                    } else {
                        Some(1992 + (s as i32) * 2)
                    },
                    coords: Some(Coord {
                        lat: 48.0 + ((p + s) % 40) as f64 * 0.05,
                        lon: 2.0 + ((p + s) % 40) as f64 * 0.05,
                    }),
                    ground: None,
                    badge_url: None,
                })
                .collect(),
        })
        .collect()
}

fn bench_dataset_parse(c: &mut Criterion) {
    c.bench_function("dataset_parse", |b| {
        b.iter(|| {
            let dataset = parse_dataset_json(black_box(SQUADS_JSON)).unwrap();
            black_box(year_index(&dataset).len());
        })
    });
}

fn bench_roster_markers(c: &mut Criterion) {
    let roster = synthetic_roster(200, 8);
    c.bench_function("roster_markers", |b| {
        b.iter(|| {
            let groups = roster_markers(black_box(&roster), black_box(2001));
            black_box(groups.len());
        })
    });
}

fn bench_trajectory_markers(c: &mut Criterion) {
    let roster = synthetic_roster(1, 40);
    c.bench_function("trajectory_markers", |b| {
        b.iter(|| {
            let trajectory = trajectory_markers(black_box(&roster[0]), black_box(2060));
            black_box(trajectory.route.len());
        })
    });
}

fn bench_stints_through(c: &mut Criterion) {
    let roster = synthetic_roster(1, 40);
    c.bench_function("stints_through", |b| {
        b.iter(|| {
            let views = stints_through(black_box(&roster[0].stints), black_box(2040));
            black_box(views.len());
        })
    });
}

criterion_group!(
    perf,
    bench_dataset_parse,
    bench_roster_markers,
    bench_trajectory_markers,
    bench_stints_through
);
criterion_main!(perf);
