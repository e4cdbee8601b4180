//! `evolve`: the single entry point for running the evolutionary
//! controller end to end. Exits 0 on success, 1 on a usage error, 2 on an
//! internal error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
#[cfg(feature = "cli")]
use colored::Colorize;

use cardgenome::evolution::{run, EvolutionConfig};
use cardgenome::fitness::StylePreset;
use cardgenome::persist;

#[derive(Parser, Debug)]
#[command(name = "evolve", about = "Evolve card-game genomes by fitness-driven genetic search")]
struct Args {
    /// Number of genomes per generation
    #[arg(long, default_value_t = 50)]
    population_size: usize,

    /// Number of generations to run before stopping (plateau may stop earlier)
    #[arg(long, default_value_t = 30)]
    generations: u32,

    /// Style preset: balanced, strategic, bluffing, party, trick-taking
    #[arg(long, default_value = "balanced")]
    style: String,

    /// Fraction of the seed population cloned from known games
    #[arg(long, default_value_t = 0.3)]
    seed_ratio: f32,

    /// Random seed driving every stochastic stage of the run
    #[arg(long, default_value_t = 0)]
    random_seed: u64,

    /// Directory to write top-N genomes and the generation-statistics log to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Number of top genomes to persist at the end of the run
    #[arg(long, default_value_t = 5)]
    top_n: usize,

    /// Fraction of each generation copied through unchanged
    #[arg(long, default_value_t = 0.1)]
    elitism_rate: f32,

    /// Probability that breeding uses crossover rather than mutation-only cloning
    #[arg(long, default_value_t = 0.7)]
    crossover_rate: f32,

    /// Number of candidates drawn per tournament-selection round
    #[arg(long, default_value_t = 4)]
    tournament_size: usize,

    /// Consecutive generations without improvement before stopping early
    #[arg(long, default_value_t = 8)]
    plateau_threshold: u32,

    /// Minimum fitness gain over the plateau window to count as improvement
    #[arg(long, default_value_t = 0.01)]
    improvement_threshold: f32,

    /// Number of players every evolved genome targets
    #[arg(long, default_value_t = 2)]
    player_count: u8,

    /// Skip the greedy/MCTS-vs-random skill evaluation (faster, less selective)
    #[arg(long, default_value_t = false)]
    skip_skill_eval: bool,

    /// Worker threads for the population-evaluation pool (defaults to CPU count)
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    #[cfg(feature = "cli")]
    cardgenome::init_logging(std::path::Path::new("logs"));

    let style = match StylePreset::parse(&args.style) {
        Some(style) => style,
        None => {
            eprintln!("unknown style preset '{}'", args.style);
            return ExitCode::from(1);
        }
    };

    if args.population_size == 0 || args.player_count < 2 || args.player_count > 4 {
        eprintln!("population_size must be > 0 and player_count must be in 2..=4");
        return ExitCode::from(1);
    }

    let workers = args.workers.unwrap_or_else(num_cpus::get);
    if rayon::ThreadPoolBuilder::new().num_threads(workers).build_global().is_err() {
        log::warn!("global thread pool already initialized, --workers ignored");
    }

    let config = EvolutionConfig {
        population_size: args.population_size,
        generations: args.generations,
        style,
        seed_ratio: args.seed_ratio,
        random_seed: args.random_seed,
        elitism_rate: args.elitism_rate,
        crossover_rate: args.crossover_rate,
        tournament_size: args.tournament_size,
        plateau_threshold: args.plateau_threshold,
        improvement_threshold: args.improvement_threshold,
        player_count: args.player_count,
        skip_skill_eval: args.skip_skill_eval,
    };

    log::info!("starting evolution: {} genomes x {} generations, style={:?}", config.population_size, config.generations, config.style);
    let result = run(&config);

    match persist::save_top_n(&result, args.top_n, &args.output_dir) {
        Ok(()) => {
            let best = result.history.last().map(|s| s.best_fitness).unwrap_or(0.0);
            log::info!("evolution complete, best fitness {:.4}, artefacts in {}", best, args.output_dir.display());
            #[cfg(feature = "cli")]
            println!(
                "{} best fitness {} — artefacts in {}",
                "done.".green().bold(),
                format!("{best:.4}").bold(),
                args.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to persist results: {e}");
            ExitCode::from(2)
        }
    }
}
