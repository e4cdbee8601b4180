//! Cross-language request/response envelope: a length-prefixed,
//! big-endian binary message, same `byteorder` idiom as the bytecode
//! compiler. The caller releases the request buffer immediately after the
//! call returns; the supervisor on the other side of the boundary owns
//! freeing the response buffer.

use std::io::{Cursor, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use thiserror::Error;

use crate::ai::AiPolicy;
use crate::batch::AggregatedStats;

#[derive(Debug, Error, PartialEq)]
pub enum EnvelopeError {
    #[error("buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },
    #[error("unknown AI policy tag {0}")]
    UnknownPolicyTag(u8),
    #[error("io error while framing envelope: {0}")]
    Io(String),
}

impl From<std::io::Error> for EnvelopeError {
    fn from(e: std::io::Error) -> Self {
        EnvelopeError::Io(e.to_string())
    }
}

fn policy_tag(policy: AiPolicy) -> u8 {
    match policy {
        AiPolicy::Random => 0,
        AiPolicy::Greedy => 1,
        AiPolicy::Mcts { .. } => 2,
    }
}

#[derive(Debug, Clone)]
pub struct SimulationRequest {
    pub genome_bytes: Vec<u8>,
    pub games: u32,
    pub ai_policy: AiPolicy,
    /// Empty means every seat uses `ai_policy`; non-empty overrides per seat.
    pub per_player_policies: Vec<AiPolicy>,
    pub mcts_iterations: u32,
    pub player_count: u8,
    pub seed: u64,
}

impl SimulationRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u32::<BigEndian>(self.genome_bytes.len() as u32).unwrap();
        out.write_all(&self.genome_bytes).unwrap();
        out.write_u32::<BigEndian>(self.games).unwrap();
        out.write_u8(policy_tag(self.ai_policy)).unwrap();
        out.write_u8(self.per_player_policies.len() as u8).unwrap();
        for p in &self.per_player_policies {
            out.write_u8(policy_tag(*p)).unwrap();
        }
        out.write_u32::<BigEndian>(self.mcts_iterations).unwrap();
        out.write_u8(self.player_count).unwrap();
        out.write_u64::<BigEndian>(self.seed).unwrap();
        out
    }

    pub fn decode(buf: &[u8]) -> Result<(Self, usize), EnvelopeError> {
        let mut cursor = Cursor::new(buf);
        let genome_len = cursor.read_u32::<BigEndian>()? as usize;
        let mut genome_bytes = vec![0u8; genome_len];
        cursor.read_exact(&mut genome_bytes)?;
        let games = cursor.read_u32::<BigEndian>()?;
        let ai_policy = decode_policy(cursor.read_u8()?, 0)?;
        let n_seats = cursor.read_u8()? as usize;
        let mut per_player_policies = Vec::with_capacity(n_seats);
        for _ in 0..n_seats {
            per_player_policies.push(decode_policy(cursor.read_u8()?, 0)?);
        }
        let mcts_iterations = cursor.read_u32::<BigEndian>()?;
        let player_count = cursor.read_u8()?;
        let seed = cursor.read_u64::<BigEndian>()?;
        let request = SimulationRequest {
            genome_bytes,
            games,
            ai_policy,
            per_player_policies,
            mcts_iterations,
            player_count,
            seed,
        };
        Ok((request, cursor.position() as usize))
    }
}

fn decode_policy(tag: u8, mcts_iterations: u32) -> Result<AiPolicy, EnvelopeError> {
    match tag {
        0 => Ok(AiPolicy::Random),
        1 => Ok(AiPolicy::Greedy),
        2 => Ok(AiPolicy::Mcts { iterations: mcts_iterations.max(1), exploration: 1.4 }),
        other => Err(EnvelopeError::UnknownPolicyTag(other)),
    }
}

/// Encodes a batch of requests as `count:4` followed by each request's own
/// length-prefixed record.
pub fn encode_requests(requests: &[SimulationRequest]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(requests.len() as u32).unwrap();
    for req in requests {
        let body = req.encode();
        out.write_u32::<BigEndian>(body.len() as u32).unwrap();
        out.write_all(&body).unwrap();
    }
    out
}

pub fn decode_requests(buf: &[u8]) -> Result<Vec<SimulationRequest>, EnvelopeError> {
    let mut cursor = Cursor::new(buf);
    let count = cursor.read_u32::<BigEndian>()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let len = cursor.read_u32::<BigEndian>()? as usize;
        let start = cursor.position() as usize;
        let end = start + len;
        if end > buf.len() {
            return Err(EnvelopeError::BufferTooShort { needed: end, available: buf.len() });
        }
        let (req, _) = SimulationRequest::decode(&buf[start..end])?;
        out.push(req);
        cursor.set_position(end as u64);
    }
    Ok(out)
}

/// `AggregatedStats` on the wire; `duo_wins` is the deprecated fixed
/// 2-element win-count pair kept for backward compatibility with callers
/// that predate the per-player `wins` vector.
pub fn encode_response(stats: &AggregatedStats) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<BigEndian>(stats.games).unwrap();
    out.write_u8(stats.wins.len() as u8).unwrap();
    for &w in &stats.wins {
        out.write_u32::<BigEndian>(w).unwrap();
    }
    let duo_wins = [stats.wins.first().copied().unwrap_or(0), stats.wins.get(1).copied().unwrap_or(0)];
    out.write_u32::<BigEndian>(duo_wins[0]).unwrap();
    out.write_u32::<BigEndian>(duo_wins[1]).unwrap();
    out.write_u32::<BigEndian>(stats.draws).unwrap();
    out.write_u32::<BigEndian>(stats.errors).unwrap();
    out.write_f64::<BigEndian>(stats.mean_turns).unwrap();
    out.write_f64::<BigEndian>(stats.median_turns).unwrap();
    out.write_f32::<BigEndian>(stats.decision_density).unwrap();
    out.write_f32::<BigEndian>(stats.interaction_frequency).unwrap();
    out.write_f32::<BigEndian>(stats.lead_changes_mean).unwrap();
    out.write_f32::<BigEndian>(stats.closest_margin_mean).unwrap();
    out.write_f32::<BigEndian>(stats.decisive_turn_pct_mean).unwrap();
    out.write_f32::<BigEndian>(stats.comeback_rate).unwrap();
    out.write_u32::<BigEndian>(stats.claims).unwrap();
    out.write_u32::<BigEndian>(stats.bluffs).unwrap();
    out.write_u32::<BigEndian>(stats.challenges).unwrap();
    out.write_u32::<BigEndian>(stats.successful_bluffs).unwrap();
    out.write_u32::<BigEndian>(stats.catches).unwrap();
    out.write_u32::<BigEndian>(stats.bets).unwrap();
    out.write_u32::<BigEndian>(stats.all_ins).unwrap();
    out.write_u32::<BigEndian>(stats.fold_wins).unwrap();
    out.write_u32::<BigEndian>(stats.showdown_wins).unwrap();
    out
}

pub fn decode_response(buf: &[u8]) -> Result<AggregatedStats, EnvelopeError> {
    let mut cursor = Cursor::new(buf);
    let games = cursor.read_u32::<BigEndian>()?;
    let n_players = cursor.read_u8()? as usize;
    let mut wins = Vec::with_capacity(n_players);
    for _ in 0..n_players {
        wins.push(cursor.read_u32::<BigEndian>()?);
    }
    let _duo_a = cursor.read_u32::<BigEndian>()?;
    let _duo_b = cursor.read_u32::<BigEndian>()?;
    let draws = cursor.read_u32::<BigEndian>()?;
    let errors = cursor.read_u32::<BigEndian>()?;
    let mean_turns = cursor.read_f64::<BigEndian>()?;
    let median_turns = cursor.read_f64::<BigEndian>()?;
    let decision_density = cursor.read_f32::<BigEndian>()?;
    let interaction_frequency = cursor.read_f32::<BigEndian>()?;
    let lead_changes_mean = cursor.read_f32::<BigEndian>()?;
    let closest_margin_mean = cursor.read_f32::<BigEndian>()?;
    let decisive_turn_pct_mean = cursor.read_f32::<BigEndian>()?;
    let comeback_rate = cursor.read_f32::<BigEndian>()?;
    let claims = cursor.read_u32::<BigEndian>()?;
    let bluffs = cursor.read_u32::<BigEndian>()?;
    let challenges = cursor.read_u32::<BigEndian>()?;
    let successful_bluffs = cursor.read_u32::<BigEndian>()?;
    let catches = cursor.read_u32::<BigEndian>()?;
    let bets = cursor.read_u32::<BigEndian>()?;
    let all_ins = cursor.read_u32::<BigEndian>()?;
    let fold_wins = cursor.read_u32::<BigEndian>()?;
    let showdown_wins = cursor.read_u32::<BigEndian>()?;
    Ok(AggregatedStats {
        games,
        wins,
        draws,
        errors,
        mean_turns,
        median_turns,
        decision_density,
        interaction_frequency,
        move_disruption_rate: 0.0,
        contention_rate: 0.0,
        forced_response_rate: 0.0,
        lead_changes_mean,
        closest_margin_mean,
        decisive_turn_pct_mean,
        comeback_rate,
        claims,
        bluffs,
        challenges,
        successful_bluffs,
        catches,
        bets,
        all_ins,
        fold_wins,
        showdown_wins,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips() {
        let req = SimulationRequest {
            genome_bytes: vec![2, 0, 0, 0, 1, 9, 9, 9, 9, 9, 9, 9, 9],
            games: 500,
            ai_policy: AiPolicy::Mcts { iterations: 200, exploration: 1.4 },
            per_player_policies: vec![AiPolicy::Random, AiPolicy::Greedy],
            mcts_iterations: 200,
            player_count: 2,
            seed: 42,
        };
        let encoded = req.encode();
        let (decoded, consumed) = SimulationRequest::decode(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded.genome_bytes, req.genome_bytes);
        assert_eq!(decoded.games, req.games);
        assert_eq!(decoded.seed, req.seed);
        assert_eq!(decoded.per_player_policies.len(), 2);
    }

    #[test]
    fn response_round_trips() {
        let stats = AggregatedStats {
            games: 10,
            wins: vec![6, 4],
            draws: 0,
            errors: 0,
            mean_turns: 123.5,
            median_turns: 120.0,
            decision_density: 0.4,
            interaction_frequency: 0.2,
            move_disruption_rate: 0.1,
            contention_rate: 0.1,
            forced_response_rate: 0.1,
            lead_changes_mean: 3.0,
            closest_margin_mean: 0.1,
            decisive_turn_pct_mean: 0.8,
            comeback_rate: 0.3,
            claims: 5,
            bluffs: 2,
            challenges: 1,
            successful_bluffs: 1,
            catches: 1,
            bets: 20,
            all_ins: 1,
            fold_wins: 2,
            showdown_wins: 8,
        };
        let encoded = encode_response(&stats);
        let decoded = decode_response(&encoded).unwrap();
        assert_eq!(decoded.games, stats.games);
        assert_eq!(decoded.wins, stats.wins);
        assert_eq!(decoded.claims, stats.claims);
    }

    #[test]
    fn batch_of_requests_round_trips() {
        let requests = vec![
            SimulationRequest {
                genome_bytes: vec![1, 2, 3],
                games: 10,
                ai_policy: AiPolicy::Random,
                per_player_policies: Vec::new(),
                mcts_iterations: 0,
                player_count: 2,
                seed: 1,
            },
            SimulationRequest {
                genome_bytes: vec![4, 5],
                games: 20,
                ai_policy: AiPolicy::Greedy,
                per_player_policies: Vec::new(),
                mcts_iterations: 0,
                player_count: 4,
                seed: 2,
            },
        ];
        let encoded = encode_requests(&requests);
        let decoded = decode_requests(&encoded).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].player_count, 4);
    }
}
