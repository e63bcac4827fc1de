use criterion::{black_box, criterion_group, criterion_main, Criterion};
use deck_analyzer::analysis::probability::{prob_at_least, prob_none};
use deck_analyzer::analysis::Analyzer;
use deck_analyzer::card::CardDatabase;
use deck_analyzer::deck::{load_deck, parse_deck_file};

const CARDS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/decks/cards.json");
const DECK: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/decks/charizard.txt");

fn benchmark_single_deck(c: &mut Criterion) {
    let db = CardDatabase::from_file(CARDS).expect("Failed to load cards");
    let deck = load_deck(DECK, Some(&db)).expect("Failed to parse deck");
    let analyzer = Analyzer::default();

    c.bench_function("analyze_charizard", |b| {
        b.iter(|| analyzer.analyze(black_box(&deck)))
    });
}

fn benchmark_batch(c: &mut Criterion) {
    let db = CardDatabase::from_file(CARDS).expect("Failed to load cards");
    let deck = load_deck(DECK, Some(&db)).expect("Failed to parse deck");
    let decks = vec![deck; 100];
    let analyzer = Analyzer::default();

    c.bench_function("analyze_batch_100", |b| {
        b.iter(|| analyzer.analyze_batch(black_box(&decks)))
    });
}

fn benchmark_probabilities(c: &mut Criterion) {
    c.bench_function("hypergeometric", |b| {
        b.iter(|| {
            let none = prob_none(black_box(60), black_box(12), black_box(7));
            let tail = prob_at_least(black_box(60), black_box(12), black_box(12), black_box(3));
            none + tail
        })
    });
}

fn benchmark_deck_parsing(c: &mut Criterion) {
    let db = CardDatabase::from_file(CARDS).expect("Failed to load cards");

    c.bench_function("parse_deck_file", |b| {
        b.iter(|| parse_deck_file(black_box(DECK), black_box(&db)))
    });
}

criterion_group!(
    benches,
    benchmark_single_deck,
    benchmark_batch,
    benchmark_probabilities,
    benchmark_deck_parsing
);
criterion_main!(benches);
