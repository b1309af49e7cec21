use rand::Rng;
use tracing::{error, info, warn};

use crate::{
    board::{Board, Cell, Mode, N_CELLS, Symbol},
    gate::Gate,
    register::{Bitstring, Register, RegisterError},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollapseError {
    #[error("{0} has already used their collapse this game")]
    CollapseAlreadyUsed(Symbol),
    #[error("Internal consistency error: qubit for position {0} measured 1 on an empty cell")]
    PhantomMark(usize),
    #[error("Internal consistency error: classical mark at position {0} measured 0")]
    LostClassicalMark(usize),
    #[error("Internal consistency error: {0}")]
    InternalConsistency(#[from] RegisterError),
}

impl CollapseError {
    /// Whether the error signals a broken invariant rather than a refused request
    pub fn is_internal(&self) -> bool {
        !matches!(self, CollapseError::CollapseAlreadyUsed(_))
    }
}

/// Each player may trigger one voluntary collapse per game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapsePowers {
    x: bool,
    o: bool,
}

impl Default for CollapsePowers {
    fn default() -> Self {
        Self { x: true, o: true }
    }
}

impl CollapsePowers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_available(&self, symbol: Symbol) -> bool {
        match symbol {
            Symbol::X => self.x,
            Symbol::O => self.o,
        }
    }

    /// Spends the power of `symbol`, failing if it is already spent
    pub fn consume(&mut self, symbol: Symbol) -> Result<(), CollapseError> {
        let slot = match symbol {
            Symbol::X => &mut self.x,
            Symbol::O => &mut self.o,
        };
        if !*slot {
            warn!(%symbol, "collapse refused, power already used");
            return Err(CollapseError::CollapseAlreadyUsed(symbol));
        }
        *slot = false;
        Ok(())
    }
}

/// Board after applying `outcome`, or the first cell that contradicts it
fn reconcile(board: &Board, outcome: Bitstring) -> Result<Board, CollapseError> {
    let mut next = board.clone();
    for (position, cell) in board.positions() {
        let kept = outcome.bit(position - 1);
        let resolved = match (cell.symbol(), kept) {
            (Some(symbol), true) => Cell::classical(symbol),
            (None, true) => return Err(CollapseError::PhantomMark(position)),
            (Some(_), false) if cell.mode() == Mode::Classical => {
                return Err(CollapseError::LostClassicalMark(position));
            }
            (_, false) => Cell::EMPTY,
        };
        next.set(position, resolved);
    }
    Ok(next)
}

/// Rebuilds the register as the product state encoding `board`
fn resync(board: &Board, register: &mut Register) -> Result<(), RegisterError> {
    register.apply(Gate::ResetAll)?;
    for (position, cell) in board.positions() {
        if !cell.is_empty() {
            register.apply(Gate::BitFlip(position - 1))?;
        }
    }
    Ok(())
}

/// Measures the whole register and resolves every quantum cell
///
/// Afterwards every cell is classical and the register is the basis
/// state matching the board. On error neither is changed. Power
/// bookkeeping is left to the caller.
pub fn collapse<R: Rng + ?Sized>(
    board: &mut Board,
    register: &mut Register,
    rng: &mut R,
) -> Result<Bitstring, CollapseError> {
    let mut measured = register.clone();
    let outcome = measured.measure_all(rng)?;
    settle(board, register, measured, outcome)
}

/// [`collapse`] with the uniform draw supplied by the caller
pub fn collapse_with_draw(
    board: &mut Board,
    register: &mut Register,
    draw: f32,
) -> Result<Bitstring, CollapseError> {
    let mut measured = register.clone();
    let outcome = measured.measure_with_draw(draw)?;
    settle(board, register, measured, outcome)
}

/// Commits `measured` and the reconciled board once both agree on `outcome`
fn settle(
    board: &mut Board,
    register: &mut Register,
    mut measured: Register,
    outcome: Bitstring,
) -> Result<Bitstring, CollapseError> {
    let next = reconcile(board, outcome).inspect_err(|e| {
        error!(%outcome, error = %e, "measurement disagrees with the board");
    })?;

    resync(&next, &mut measured)?;
    let occupied = next.occupied_count();
    if occupied != outcome.count_ones() || measured.basis_state() != Some(outcome) {
        error!(%outcome, occupied, "register out of step with the board after collapse");
        return Err(RegisterError::InvalidOperation(format!(
            "re-synchronised register does not encode {occupied} of {N_CELLS} marks"
        ))
        .into());
    }
    *board = next;
    *register = measured;

    info!(%outcome, occupied, "board collapsed");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        moves::{apply_classic_move, apply_quantum_move},
        win::check_win,
    };
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_quantum_move_scenario() {
        let mut board = Board::new();
        let mut register = Register::new();
        apply_quantum_move(&mut board, &mut register, 1, 2, Symbol::X).unwrap();

        // Cumulative probability is 0.5 after 000000001, 1.0 after 000000010
        let outcome = collapse_with_draw(&mut board, &mut register, 0.75).unwrap();
        assert_eq!(outcome.to_string(), "000000010");
        assert!(board.cell(1).unwrap().is_empty());
        assert_eq!(board.cell(2).unwrap().symbol(), Some(Symbol::X));
        assert_eq!(board.cell(2).unwrap().mode(), Mode::Classical);
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_quantum_move_keeps_exactly_one_cell_for_every_draw() {
        for draw in [0.0, 0.1, 0.49, 0.5, 0.51, 0.9, 0.999_999] {
            let mut board = Board::new();
            let mut register = Register::new();
            apply_quantum_move(&mut board, &mut register, 4, 8, Symbol::O).unwrap();
            collapse_with_draw(&mut board, &mut register, draw).unwrap();

            let kept: Vec<bool> = [4, 8]
                .iter()
                .map(|&p| board.cell(p).unwrap().symbol() == Some(Symbol::O))
                .collect();
            assert!(kept[0] ^ kept[1], "draw {draw} kept {kept:?}");
            assert_eq!(board.occupied_count(), 1);
        }
    }

    #[test]
    fn test_quantum_move_is_fair() {
        let runs = 4000;
        let mut first_wins = 0;
        for seed in 0..runs {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = Board::new();
            let mut register = Register::new();
            apply_quantum_move(&mut board, &mut register, 3, 7, Symbol::X).unwrap();
            collapse(&mut board, &mut register, &mut rng).unwrap();
            if !board.cell(3).unwrap().is_empty() {
                first_wins += 1;
            }
        }
        let fraction = first_wins as f64 / runs as f64;
        // Five standard deviations of a fair coin over 4000 flips
        assert!((fraction - 0.5).abs() < 0.04, "fraction was {fraction}");
    }

    #[test]
    fn test_classical_marks_survive_collapse() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut board = Board::new();
            let mut register = Register::new();
            apply_classic_move(&mut board, &mut register, 5, Symbol::X).unwrap();
            apply_quantum_move(&mut board, &mut register, 1, 9, Symbol::O).unwrap();
            apply_quantum_move(&mut board, &mut register, 2, 3, Symbol::X).unwrap();
            collapse(&mut board, &mut register, &mut rng).unwrap();

            assert_eq!(board.cell(5).unwrap().symbol(), Some(Symbol::X));
            assert_eq!(board.occupied_count(), 3);
        }
    }

    #[test]
    fn test_collapse_resyncs_register() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut board = Board::new();
        let mut register = Register::new();
        apply_quantum_move(&mut board, &mut register, 1, 2, Symbol::X).unwrap();
        apply_quantum_move(&mut board, &mut register, 5, 6, Symbol::O).unwrap();
        apply_classic_move(&mut board, &mut register, 9, Symbol::X).unwrap();

        let outcome = collapse(&mut board, &mut register, &mut rng).unwrap();
        assert!(board.cells().iter().all(|c| c.mode() == Mode::Classical));
        assert_eq!(register.basis_state(), Some(outcome));
        for draw in [0.0, 0.5, 0.99] {
            assert_eq!(register.measure_with_draw(draw).unwrap(), outcome);
        }
        assert_eq!(
            &register.circuit().instructions()[7..9],
            &[Gate::MeasureAll, Gate::ResetAll]
        );
    }

    #[test]
    fn test_collapse_on_classical_board_changes_nothing() {
        let mut board = Board::new();
        let mut register = Register::new();
        apply_classic_move(&mut board, &mut register, 2, Symbol::O).unwrap();
        let before = board.clone();
        let outcome = collapse_with_draw(&mut board, &mut register, 0.3).unwrap();
        assert_eq!(outcome.bits(), 0b10);
        assert_eq!(board, before);
    }

    #[test]
    fn test_phantom_mark_is_an_internal_error() {
        let mut board = Board::new();
        let mut register = Register::new();
        register.bit_flip(6).unwrap();
        let gates_before = register.circuit().len();
        let result = collapse_with_draw(&mut board, &mut register, 0.2);
        assert_eq!(result, Err(CollapseError::PhantomMark(7)));
        assert!(result.unwrap_err().is_internal());
        assert_eq!(board, Board::new());
        assert_eq!(register.circuit().len(), gates_before);
    }

    #[test]
    fn test_lost_classical_mark_is_an_internal_error() {
        let mut board = Board::new();
        let mut register = Register::new();
        apply_quantum_move(&mut board, &mut register, 1, 2, Symbol::O).unwrap();
        apply_classic_move(&mut board, &mut register, 3, Symbol::X).unwrap();
        register.bit_flip(2).unwrap();
        let before = board.clone();
        let state_before = register.state_vector().clone();
        let gates_before = register.circuit().len();
        assert_eq!(
            collapse_with_draw(&mut board, &mut register, 0.2),
            Err(CollapseError::LostClassicalMark(3))
        );
        assert_eq!(board, before);
        assert!(board.cell(1).unwrap().is_quantum());
        assert_eq!(register.state_vector(), &state_before);
        assert_eq!(register.basis_state(), None);
        assert_eq!(register.circuit().len(), gates_before);
    }

    #[test]
    fn test_powers_are_single_use() {
        let mut powers = CollapsePowers::new();
        assert!(powers.is_available(Symbol::X));
        powers.consume(Symbol::X).unwrap();
        assert!(!powers.is_available(Symbol::X));
        assert!(powers.is_available(Symbol::O));

        let refused = powers.consume(Symbol::X);
        assert_eq!(refused, Err(CollapseError::CollapseAlreadyUsed(Symbol::X)));
        assert!(!refused.unwrap_err().is_internal());
        powers.consume(Symbol::O).unwrap();
    }
}
