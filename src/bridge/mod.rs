//! Wire boundary for cross-language callers: a length-prefixed
//! binary envelope in front of `batch::run_batch`, with no async runtime
//! in the hot path.

pub mod envelope;

pub use envelope::{
    decode_requests, decode_response, encode_requests, encode_response, EnvelopeError,
    SimulationRequest,
};

use crate::ai::AiConfig;
use crate::batch::{run_batch, AggregatedStats};
use crate::bytecode::{parse, ParseError};

/// Runs one request end to end: parses the embedded genome bytecode, builds
/// the requested AI configuration, and reduces the batch to wire stats.
pub fn handle_request(request: &SimulationRequest) -> Result<AggregatedStats, BridgeError> {
    let parsed = parse(&request.genome_bytes)?;
    let ai = if request.per_player_policies.is_empty() {
        AiConfig::uniform(request.ai_policy)
    } else {
        AiConfig::per_seat(request.per_player_policies.clone())
    };
    Ok(run_batch(&parsed, request.games, &ai, request.seed))
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed request envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("invalid genome bytecode: {0}")]
    Bytecode(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiPolicy;
    use crate::bytecode::compile;
    use crate::known_games;

    #[test]
    fn handles_a_round_tripped_request() {
        let genome = known_games::war();
        let genome_bytes = compile(&genome).unwrap();
        let request = SimulationRequest {
            genome_bytes,
            games: 10,
            ai_policy: AiPolicy::Random,
            per_player_policies: Vec::new(),
            mcts_iterations: 0,
            player_count: 2,
            seed: 7,
        };
        let encoded = request.encode();
        let (decoded, _) = SimulationRequest::decode(&encoded).unwrap();
        let stats = handle_request(&decoded).unwrap();
        assert_eq!(stats.games, 10);
    }
}
