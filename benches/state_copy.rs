//! Benchmarks for the operations search leans on: state copies, single
//! steps and full random playouts.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tabletop_engine::agents::{random_playout, win_rates};
use tabletop_engine::games::dice_race::{DiceRaceRules, RaceAction};
use tabletop_engine::games::trade_post::{TradeAction, TradePostRules};
use tabletop_engine::{EngineConfig, RulesEngine};

fn bench_copy(c: &mut Criterion) {
    let rules = TradePostRules::new(EngineConfig::new(4).with_seed(42));
    let mut state = rules.setup();
    for _ in 0..40 {
        rules.next(&mut state, &TradeAction::Gather).unwrap();
    }

    c.bench_function("trade_post_copy", |b| b.iter(|| black_box(state.copy())));

    c.bench_function("trade_post_copy_and_step", |b| {
        b.iter(|| {
            let mut scratch = state.copy();
            rules.next(&mut scratch, black_box(&TradeAction::Gather)).unwrap();
            black_box(scratch)
        });
    });
}

fn bench_playouts(c: &mut Criterion) {
    let rules = DiceRaceRules::new(EngineConfig::new(4).with_seed(7));
    let root = rules.setup();

    c.bench_function("dice_race_playout", |b| {
        b.iter(|| black_box(random_playout(&rules, root.with_stream(black_box(3))).unwrap()));
    });

    c.bench_function("dice_race_win_rates_64", |b| {
        b.iter(|| black_box(win_rates(&rules, &root, 64).unwrap()));
    });

    let mut state = rules.setup();
    c.bench_function("dice_race_step", |b| {
        b.iter(|| {
            if !state.is_ongoing() {
                state = rules.setup();
            }
            rules.next(&mut state, black_box(&RaceAction::RollDice)).unwrap()
        });
    });
}

criterion_group!(benches, bench_copy, bench_playouts);
criterion_main!(benches);
