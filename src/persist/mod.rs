//! Persisted artefacts: evolved genomes written as a stable
//! structured text record, one file per top-N genome, plus a
//! generation-statistics log. No binary bytecode is written — genomes are
//! the source of truth and are recompiled on load.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::evolution::{EvolutionResult, GenerationStats};
use crate::genome::Genome;

#[derive(Debug, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub genome: Genome,
    pub fitness: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir { path: String, source: std::io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: String, source: std::io::Error },
    #[error("failed to serialize genome: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes the top `n` genomes by fitness as `genome-0001.json`,
/// `genome-0002.json`, ... (rank order, not genome id), plus
/// `generations.jsonl` with one `GenerationStats` record per line.
pub fn save_top_n(result: &EvolutionResult, n: usize, output_dir: &Path) -> Result<(), PersistError> {
    fs::create_dir_all(output_dir).map_err(|source| PersistError::CreateDir {
        path: output_dir.display().to_string(),
        source,
    })?;

    let mut ranked: Vec<&crate::evolution::Scored> = result.population.iter().filter(|s| s.fitness.valid).collect();
    ranked.sort_by(|a, b| b.fitness.total.partial_cmp(&a.fitness.total).unwrap_or(std::cmp::Ordering::Equal));

    for (rank, scored) in ranked.into_iter().take(n).enumerate() {
        let record = GenomeRecord { genome: scored.genome.clone(), fitness: scored.fitness.total };
        let path = output_dir.join(format!("genome-{:04}.json", rank + 1));
        let body = serde_json::to_string_pretty(&record)?;
        write_file(&path, body.as_bytes())?;
    }

    write_generation_log(&result.history, &output_dir.join("generations.jsonl"))?;
    Ok(())
}

fn write_generation_log(history: &[GenerationStats], path: &Path) -> Result<(), PersistError> {
    let mut body = String::new();
    for stats in history {
        let line = serde_json::json!({
            "generation": stats.generation,
            "best_fitness": stats.best_fitness,
            "mean_fitness": stats.mean_fitness,
            "valid_count": stats.valid_count,
            "population_size": stats.population_size,
        });
        body.push_str(&line.to_string());
        body.push('\n');
    }
    write_file(path, body.as_bytes())
}

fn write_file(path: &Path, body: &[u8]) -> Result<(), PersistError> {
    let mut file = fs::File::create(path).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })?;
    file.write_all(body).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })
}

/// Loads a single persisted genome record back for re-evaluation or
/// inspection. Bytecode is never read from disk; `bytecode::compile` is
/// the only producer of the wire format.
pub fn load_genome(path: &Path) -> Result<GenomeRecord, PersistError> {
    let body = fs::read_to_string(path).map_err(|source| PersistError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::{GenerationStats, Scored};
    use crate::fitness::{evaluate, StylePreset};
    use crate::known_games;

    #[test]
    fn round_trips_a_genome_record() {
        let dir = std::env::temp_dir().join(format!("persist-test-{}", std::process::id()));
        let genome = known_games::war();
        let fitness = evaluate(&genome, StylePreset::Balanced, 1);
        let result = EvolutionResult {
            population: vec![Scored { genome: genome.clone(), fitness }],
            history: vec![GenerationStats {
                generation: 0,
                best_fitness: fitness.total,
                mean_fitness: fitness.total,
                valid_count: 1,
                population_size: 1,
            }],
        };
        save_top_n(&result, 1, &dir).unwrap();
        let loaded = load_genome(&dir.join("genome-0001.json")).unwrap();
        assert_eq!(loaded.genome.id, genome.id);
        fs::remove_dir_all(&dir).ok();
    }
}
