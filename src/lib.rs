pub mod ai;
pub mod batch;
pub mod bridge;
pub mod bytecode;
pub mod cards;
pub mod evolution;
pub mod fitness;
pub mod genome;
pub mod known_games;
pub mod persist;
pub mod skill;
pub mod validation;
pub mod vm;

/// Initializes dual terminal/file logging. File logs always capture DEBUG;
/// the terminal is capped at INFO.
#[cfg(feature = "cli")]
pub fn init_logging(log_dir: &std::path::Path) {
    std::fs::create_dir_all(log_dir).expect("create log directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(log_dir.join(format!("{}.log", time))).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
