//! Structural and semantic validation, run before a genome ever
//! reaches the VM. A genome failing either gate gets `valid=false,
//! fitness=0` and is never simulated.

pub mod coherence;
pub mod structural;

pub use coherence::{check as check_coherence, CoherenceError};
pub use structural::{validate as validate_structural, StructuralError};

use crate::genome::Genome;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Coherence(#[from] CoherenceError),
}

pub fn validate(genome: &Genome) -> Result<(), ValidationError> {
    validate_structural(genome)?;
    check_coherence(genome)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known_games;

    #[test]
    fn known_games_pass_both_gates() {
        assert!(validate(&known_games::war()).is_ok());
        assert!(validate(&known_games::crazy_eights()).is_ok());
        assert!(validate(&known_games::hearts()).is_ok());
        assert!(validate(&known_games::simple_poker()).is_ok());
    }
}
