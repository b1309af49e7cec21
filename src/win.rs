use crate::board::{Board, Mode, Symbol};

/// Rows, columns and diagonals by 1-based position
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [1, 2, 3],
    [4, 5, 6],
    [7, 8, 9],
    [1, 4, 7],
    [2, 5, 8],
    [3, 6, 9],
    [1, 5, 9],
    [3, 5, 7],
];

/// Symbol owning `line` when all three cells hold it classically
fn line_owner(board: &Board, line: &[usize; 3]) -> Option<Symbol> {
    let mut cells = line.iter().map(|&p| board.cell(p));
    let first = cells.next()??;
    let symbol = first.symbol()?;
    if first.mode() != Mode::Classical {
        return None;
    }
    cells
        .all(|c| c.is_some_and(|c| c.symbol() == Some(symbol) && c.mode() == Mode::Classical))
        .then_some(symbol)
}

/// First completed classical line and its owner
pub fn winning_line(board: &Board) -> Option<(Symbol, [usize; 3])> {
    WINNING_LINES
        .iter()
        .find_map(|line| line_owner(board, line).map(|s| (s, *line)))
}

/// Winner of the board, if any
///
/// Quantum marks never count towards a line.
pub fn check_win(board: &Board) -> Option<Symbol> {
    winning_line(board).map(|(symbol, _)| symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn board_with(cells: &[(usize, Cell)]) -> Board {
        let mut board = Board::new();
        for &(position, cell) in cells {
            board.set(position, cell);
        }
        board
    }

    #[test]
    fn test_every_line_wins() {
        for line in WINNING_LINES {
            let board = board_with(&line.map(|p| (p, Cell::classical(Symbol::O))));
            assert_eq!(winning_line(&board), Some((Symbol::O, line)));
        }
    }

    #[test]
    fn test_mixed_symbols_do_not_win() {
        let board = board_with(&[
            (1, Cell::classical(Symbol::X)),
            (2, Cell::classical(Symbol::O)),
            (3, Cell::classical(Symbol::X)),
        ]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_quantum_marks_suppress_line() {
        for quantum in [1, 5, 9] {
            let cells: Vec<(usize, Cell)> = [1, 5, 9]
                .iter()
                .map(|&p| {
                    let cell = if p == quantum {
                        Cell::quantum(Symbol::X)
                    } else {
                        Cell::classical(Symbol::X)
                    };
                    (p, cell)
                })
                .collect();
            assert_eq!(check_win(&board_with(&cells)), None);
        }
    }

    #[test]
    fn test_empty_board_has_no_winner() {
        assert_eq!(check_win(&Board::new()), None);
    }
}
