use tracing::{debug, error};

use crate::{
    board::{Board, Cell, N_CELLS, Symbol},
    gate::Gate,
    register::{Register, RegisterError},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoveError {
    #[error("Position {0} is not on the board, pick a square from 1-9")]
    InvalidPosition(usize),
    #[error("Position {0} is already filled")]
    OccupiedCell(usize),
    #[error("A quantum move needs two different squares, got {0} twice")]
    SamePosition(usize),
    #[error("There aren't enough empty squares for a quantum move ({occupied} of 9 filled)")]
    InsufficientSpace { occupied: usize },
    #[error("Internal consistency error: {0}")]
    InternalConsistency(#[from] RegisterError),
}

fn require_empty(board: &Board, position: usize) -> Result<usize, MoveError> {
    let qubit = Board::qubit_of(position).ok_or(MoveError::InvalidPosition(position))?;
    match board.cell(position) {
        Some(cell) if cell.is_empty() => Ok(qubit),
        _ => Err(MoveError::OccupiedCell(position)),
    }
}

/// Issues `gates` in order, rolling the register back if one fails
fn issue(register: &mut Register, gates: &[Gate]) -> Result<(), MoveError> {
    let checkpoint = register.clone();
    for &gate in gates {
        if let Err(e) = register.apply(gate) {
            error!(%gate, error = %e, "gate rejected mid-move");
            *register = checkpoint;
            return Err(e.into());
        }
    }
    Ok(())
}

/// Places `symbol` permanently on `position`
pub fn apply_classic_move(
    board: &mut Board,
    register: &mut Register,
    position: usize,
    symbol: Symbol,
) -> Result<(), MoveError> {
    let qubit = require_empty(board, position)?;

    issue(register, &[Gate::BitFlip(qubit)])?;
    board.set(position, Cell::classical(symbol));
    debug!(%symbol, position, "classic move");
    Ok(())
}

/// Places `symbol` in superposition across `first` and `second`
///
/// After a collapse exactly one of the two cells keeps the symbol,
/// each with probability one half.
pub fn apply_quantum_move(
    board: &mut Board,
    register: &mut Register,
    first: usize,
    second: usize,
    symbol: Symbol,
) -> Result<(), MoveError> {
    let occupied = board.occupied_count();
    if occupied >= N_CELLS - 1 {
        return Err(MoveError::InsufficientSpace { occupied });
    }
    if first == second {
        return Err(MoveError::SamePosition(first));
    }
    let q1 = require_empty(board, first)?;
    let q2 = require_empty(board, second)?;

    issue(
        register,
        &[Gate::Hadamard(q1), Gate::BitFlip(q2), Gate::ControlledNot(q1, q2)],
    )?;
    board.set(first, Cell::quantum(symbol));
    board.set(second, Cell::quantum(symbol));
    debug!(%symbol, first, second, "quantum move");
    Ok(())
}
