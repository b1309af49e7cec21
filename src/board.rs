use std::fmt::Display;

use crate::gate::N_QUBITS;

/// Number of cells on the board, one per qubit
pub const N_CELLS: usize = N_QUBITS;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    X,
    O,
}

impl Symbol {
    pub fn other(&self) -> Self {
        match self {
            Symbol::X => Symbol::O,
            Symbol::O => Symbol::X,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::X => f.write_str("X"),
            Symbol::O => f.write_str("O"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Classical,
    Quantum,
}

/// A single square. An empty cell is always classical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    symbol: Option<Symbol>,
    mode: Mode,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        symbol: None,
        mode: Mode::Classical,
    };

    pub fn classical(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            mode: Mode::Classical,
        }
    }

    pub fn quantum(symbol: Symbol) -> Self {
        Self {
            symbol: Some(symbol),
            mode: Mode::Quantum,
        }
    }

    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.symbol.is_none()
    }

    pub fn is_quantum(&self) -> bool {
        self.mode == Mode::Quantum
    }
}

/// The nine cells, position `p` (1-based) backed by qubit `p - 1`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; N_CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `position` names a cell (1..=9)
    pub fn is_valid_position(position: usize) -> bool {
        (1..=N_CELLS).contains(&position)
    }

    /// Qubit backing `position`, `None` when off the board
    pub fn qubit_of(position: usize) -> Option<usize> {
        Self::is_valid_position(position).then(|| position - 1)
    }

    pub fn cell(&self, position: usize) -> Option<&Cell> {
        Self::qubit_of(position).map(|q| &self.cells[q])
    }

    pub fn cells(&self) -> &[Cell; N_CELLS] {
        &self.cells
    }

    /// Cells paired with their 1-based position
    pub fn positions(&self) -> impl Iterator<Item = (usize, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (i + 1, c))
    }

    /// Counted from the cells on every call
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn quantum_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_quantum()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == N_CELLS
    }

    pub(crate) fn set(&mut self, position: usize, cell: Cell) {
        if let Some(q) = Self::qubit_of(position) {
            self.cells[q] = cell;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty_and_classical() {
        let board = Board::new();
        assert_eq!(board.occupied_count(), 0);
        assert!(board.cells().iter().all(|c| c.is_empty() && !c.is_quantum()));
    }

    #[test]
    fn test_position_mapping() {
        assert_eq!(Board::qubit_of(1), Some(0));
        assert_eq!(Board::qubit_of(9), Some(8));
        assert_eq!(Board::qubit_of(0), None);
        assert_eq!(Board::qubit_of(10), None);
        assert!(Board::new().cell(0).is_none());
    }

    #[test]
    fn test_counts_are_derived_from_cells() {
        let mut board = Board::new();
        board.set(1, Cell::classical(Symbol::X));
        board.set(5, Cell::quantum(Symbol::O));
        board.set(9, Cell::quantum(Symbol::O));
        assert_eq!(board.occupied_count(), 3);
        assert_eq!(board.quantum_count(), 2);
        assert!(!board.is_full());

        board.set(5, Cell::EMPTY);
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_positions_are_one_based() {
        let mut board = Board::new();
        board.set(4, Cell::classical(Symbol::O));
        let (position, cell) = board.positions().nth(3).unwrap();
        assert_eq!(position, 4);
        assert_eq!(cell.symbol(), Some(Symbol::O));
    }

    #[test]
    fn test_symbol_other() {
        assert_eq!(Symbol::X.other(), Symbol::O);
        assert_eq!(Symbol::O.other(), Symbol::X);
    }
}
