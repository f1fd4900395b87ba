use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use memora_core::*;
use std::hint::black_box;

fn play_round(mut state: GameState<u16>) -> Score {
    if let Some(timer) = state.pending_timer() {
        state.fire(timer);
    }

    let mut twins = std::collections::HashMap::new();
    for card in state.deck() {
        twins
            .entry(*card.symbol())
            .or_insert_with(Vec::new)
            .push(card.position());
    }

    for positions in twins.values() {
        state.reveal(positions[0]);
        state.reveal(positions[1]);
    }

    state.score()
}

fn bench_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");

    for pairs in [Difficulty::Hard.pairs() as u16, 64, 1024] {
        let symbols: Vec<u16> = (0..pairs).collect();
        let mut dealer = Dealer::new(0x5eed, Rules::default());

        group.bench_function(format!("deal/{pairs}"), |b| {
            b.iter(|| dealer.deal(black_box(&symbols)).unwrap())
        });

        let mut dealer = Dealer::new(0x5eed, Rules::default());
        group.bench_function(format!("play/{pairs}"), |b| {
            b.iter_batched(
                || dealer.deal(&symbols).unwrap(),
                |state| black_box(play_round(state)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_deal);
criterion_main!(benches);
