//! UCB1 Monte Carlo tree search. Node-pooled arena indexed by
//! `NodeId` rather than a pointer tree, and enum/struct dispatch throughout
//! rather than policy trait objects, matching the VM's other hot loops.
//! Reward is always from the perspective of the player to move at the root;
//! every other seat is treated as part of the simulation environment and
//! rolled out uniformly at random.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::bytecode::ParsedGenome;
use crate::vm::apply::apply;
use crate::vm::interpreter::advance;
use crate::vm::moves::{generate_legal_moves, LegalMove};
use crate::vm::state::GameState;
use crate::vm::win;

type NodeId = usize;

struct Node {
    parent: Option<NodeId>,
    incoming_move: Option<LegalMove>,
    children: Vec<NodeId>,
    untried: Vec<LegalMove>,
    visits: u32,
    total_reward: f32,
}

/// Rollouts are capped so a genome with no realistic win condition can't
/// spin a simulation forever; this is a pragmatic bound, not a rule.
const MAX_ROLLOUT_PLIES: u32 = 300;

pub fn search(
    genome: &ParsedGenome,
    root_state: &GameState,
    root_moves: &[LegalMove],
    iterations: u32,
    exploration: f32,
    rng: &mut SmallRng,
) -> LegalMove {
    if root_moves.len() == 1 {
        return root_moves[0];
    }
    let root_player = root_state.current_player;
    let mut pool: Vec<Node> = vec![Node {
        parent: None,
        incoming_move: None,
        children: Vec::new(),
        untried: root_moves.to_vec(),
        visits: 0,
        total_reward: 0.0,
    }];

    for _ in 0..iterations {
        let mut state = root_state.clone();
        let mut node = 0usize;

        while pool[node].untried.is_empty() && !pool[node].children.is_empty() && !state.is_terminal() {
            node = select_child(&pool, node, exploration);
            step(&mut state, genome, pool[node].incoming_move.unwrap());
        }

        if !state.is_terminal() && !pool[node].untried.is_empty() {
            let i = rng.gen_range(0..pool[node].untried.len());
            let mv = pool[node].untried.swap_remove(i);
            step(&mut state, genome, mv);
            let child_untried = if state.is_terminal() { Vec::new() } else { generate_legal_moves(&state, genome) };
            let child = pool.len();
            pool.push(Node {
                parent: Some(node),
                incoming_move: Some(mv),
                children: Vec::new(),
                untried: child_untried,
                visits: 0,
                total_reward: 0.0,
            });
            pool[node].children.push(child);
            node = child;
        }

        let reward = rollout(&mut state, genome, root_player, rng);

        let mut cursor = Some(node);
        while let Some(id) = cursor {
            pool[id].visits += 1;
            pool[id].total_reward += reward;
            cursor = pool[id].parent;
        }
    }

    pool[0]
        .children
        .iter()
        .max_by_key(|&&c| pool[c].visits)
        .and_then(|&c| pool[c].incoming_move)
        .unwrap_or(root_moves[0])
}

fn step(state: &mut GameState, genome: &ParsedGenome, mv: LegalMove) {
    apply(state, genome, mv, 0);
    if !win::evaluate(state, genome) {
        advance(state, genome);
    }
}

fn select_child(pool: &[Node], node: NodeId, exploration: f32) -> NodeId {
    let parent_visits = (pool[node].visits.max(1)) as f32;
    *pool[node]
        .children
        .iter()
        .max_by(|&&a, &&b| ucb1(&pool[a], parent_visits, exploration).total_cmp(&ucb1(&pool[b], parent_visits, exploration)))
        .unwrap()
}

fn ucb1(node: &Node, parent_visits: f32, exploration: f32) -> f32 {
    if node.visits == 0 {
        return f32::INFINITY;
    }
    let exploitation = node.total_reward / node.visits as f32;
    exploitation + exploration * (parent_visits.ln() / node.visits as f32).sqrt()
}

fn rollout(state: &mut GameState, genome: &ParsedGenome, root_player: usize, rng: &mut SmallRng) -> f32 {
    let mut plies = 0;
    while !state.is_terminal() && plies < MAX_ROLLOUT_PLIES {
        let legal = generate_legal_moves(state, genome);
        if legal.is_empty() {
            break;
        }
        let mv = legal[rng.gen_range(0..legal.len())];
        step(state, genome, mv);
        plies += 1;
    }
    match state.winner {
        Some(w) if w == root_player => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{compile, parse};
    use crate::known_games;
    use rand::SeedableRng;

    #[test]
    fn search_returns_one_of_the_offered_moves() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(2);
        state.hands[0] = vec![crate::cards::Card::from(0u8), crate::cards::Card::from(5u8)];
        state.hands[1] = vec![crate::cards::Card::from(1u8)];
        let moves = generate_legal_moves(&state, &parsed);
        let mut rng = SmallRng::seed_from_u64(3);
        let chosen = search(&parsed, &state, &moves, 32, 1.4, &mut rng);
        assert!(moves.contains(&chosen));
    }

    #[test]
    fn single_legal_move_short_circuits_search() {
        let genome = known_games::war();
        let bytes = compile(&genome).unwrap();
        let parsed = parse(&bytes).unwrap();
        let mut state = GameState::new(2);
        state.hands[0] = vec![crate::cards::Card::from(0u8)];
        state.hands[1] = vec![crate::cards::Card::from(1u8)];
        let moves = generate_legal_moves(&state, &parsed);
        let mut rng = SmallRng::seed_from_u64(1);
        let chosen = search(&parsed, &state, &moves, 1000, 1.4, &mut rng);
        assert_eq!(chosen, moves[0]);
    }
}
