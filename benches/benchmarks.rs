criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        compiling_war_genome,
        compiling_hearts_genome,
        parsing_simple_poker_bytecode,
        running_a_war_batch,
        running_a_hearts_batch,
        evaluating_fitness_under_balanced_style,
        evolving_one_generation,
}

fn compiling_war_genome(c: &mut criterion::Criterion) {
    let genome = known_games::war();
    c.bench_function("compile the War genome", |b| {
        b.iter(|| compile(&genome))
    });
}

fn compiling_hearts_genome(c: &mut criterion::Criterion) {
    let genome = known_games::hearts();
    c.bench_function("compile the Hearts genome", |b| {
        b.iter(|| compile(&genome))
    });
}

fn parsing_simple_poker_bytecode(c: &mut criterion::Criterion) {
    let bytes = compile(&known_games::simple_poker()).unwrap();
    c.bench_function("parse Simple Poker bytecode", |b| {
        b.iter(|| parse(&bytes))
    });
}

fn running_a_war_batch(c: &mut criterion::Criterion) {
    let parsed = parse(&compile(&known_games::war()).unwrap()).unwrap();
    let ai = AiConfig::uniform(AiPolicy::Random);
    c.bench_function("run a 200-game War batch", |b| {
        b.iter(|| run_batch(&parsed, 200, &ai, 42))
    });
}

fn running_a_hearts_batch(c: &mut criterion::Criterion) {
    let parsed = parse(&compile(&known_games::hearts()).unwrap()).unwrap();
    let ai = AiConfig::uniform(AiPolicy::Greedy);
    c.bench_function("run a 200-game Hearts batch", |b| {
        b.iter(|| run_batch(&parsed, 200, &ai, 7))
    });
}

fn evaluating_fitness_under_balanced_style(c: &mut criterion::Criterion) {
    let genome = known_games::crazy_eights();
    c.bench_function("evaluate fitness for Crazy Eights (balanced style)", |b| {
        b.iter(|| fitness::evaluate(&genome, StylePreset::Balanced, 1))
    });
}

fn evolving_one_generation(c: &mut criterion::Criterion) {
    let config = EvolutionConfig { population_size: 20, generations: 1, random_seed: 99, ..EvolutionConfig::default() };
    c.bench_function("evolve one generation of 20 genomes", |b| {
        b.iter(|| run(&config))
    });
}

use cardgenome::ai::{AiConfig, AiPolicy};
use cardgenome::batch::run_batch;
use cardgenome::bytecode::{compile, parse};
use cardgenome::evolution::{run, EvolutionConfig};
use cardgenome::fitness::{self, StylePreset};
use cardgenome::known_games;
