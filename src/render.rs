use std::io::{self, Write};

use crossterm::{
    queue,
    style::{self, Color, StyledContent, Stylize},
};

use crate::board::{Board, Mode};

/// Colours handed out to quantum marks, one per quantum move
pub const QUANTUM_PALETTE: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

/// Colour of the `n`:th quantum mark in scan order
///
/// Consecutive pairs share a colour, so both halves of a quantum
/// move usually light up together.
pub fn quantum_colour(n: usize) -> Color {
    QUANTUM_PALETTE[(n / 2) % QUANTUM_PALETTE.len()]
}

fn coloured(text: String, colour: Option<Color>) -> StyledContent<String> {
    match colour {
        Some(colour) => text.with(colour),
        None => text.stylize(),
    }
}

/// Draws the board as a 3x3 grid
pub fn render_board<W: Write>(out: &mut W, board: &Board) -> io::Result<()> {
    let mut quantum_seen = 0;
    queue!(out, style::Print("\r\n"))?;
    for (position, cell) in board.positions() {
        let mark = cell.symbol().map_or(" ".to_string(), |s| s.to_string());
        let colour = match cell.mode() {
            Mode::Quantum => {
                let colour = quantum_colour(quantum_seen);
                quantum_seen += 1;
                Some(colour)
            }
            Mode::Classical => None,
        };
        queue!(out, style::PrintStyledContent(coloured(mark, colour)))?;

        if position % 3 == 0 {
            queue!(out, style::Print("\r\n"))?;
            if position != 9 {
                queue!(out, style::Print("-+-+-\r\n"))?;
            }
        } else {
            queue!(out, style::Print("|"))?;
        }
    }
    out.flush()
}
