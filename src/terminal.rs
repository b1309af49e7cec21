mod command;
mod parse;

pub use command::*;
pub use parse::*;

use crate::{
    board::Board,
    config::GameConfig,
    game::{Action, Game, Outcome, Turn},
    parse_position,
    render::render_board,
};
use crossterm::{
    queue,
    style::{self, Attributes, Color, ContentStyle, StyledContent},
};
use std::{
    fmt::Display,
    io::{self, BufRead, Write},
};
use tracing::info;

const TITLE: &str = "\
###########################\r
### Quantum Tic-Tac-Toe ###\r
###########################\r
";

const START_MENU: &str = "\
Start Menu:\r
  1. Start Game\r
  2. How to Play\r
  3. Quit\r
";

const HOW_TO_PLAY: &str = "\
Line up three of your marks to win. Only solid (classical) marks count.\r
\r
  classic <square>        put a solid mark on an empty square\r
  quantum <sq1> <sq2>     put one mark in superposition over two empty squares,\r
                          it will end up on exactly one of them\r
  collapse                measure the board now, once per player per game\r
  board | circuit | help | quit\r
\r
Quantum marks are drawn in colour, both halves of a move share one.\r
When the board is full it collapses on its own and every superposed mark\r
settles on one of its two squares.\r
";

/// How a single game ended from the terminal's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Finished(Outcome),
    Abandoned,
    EndOfInput,
}

/// Line-based front-end driving [`Game`]s
pub struct GameTerminal<R, W> {
    input: R,
    output: W,
    config: GameConfig,
    games_played: u64,
    input_buffer: String,
}

impl<R: BufRead, W: Write> GameTerminal<R, W> {
    pub fn new(input: R, output: W, config: GameConfig) -> Self {
        Self {
            input,
            output,
            config,
            games_played: 0,
            input_buffer: String::default(),
        }
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Start menu, then games until the player declines a rematch
    pub fn run(&mut self) -> io::Result<()> {
        Self::print(&mut self.output, &TITLE)?;
        if !self.start_menu()? {
            Self::print(&mut self.output, &"Goodbye\r\n")?;
            return Ok(());
        }

        loop {
            let mut game = Game::new(self.config.game_seed(self.games_played));
            self.games_played += 1;
            info!(game = self.games_played, "starting game");

            match self.play(&mut game)? {
                Ending::EndOfInput => return Ok(()),
                Ending::Finished(outcome) => info!(?outcome, "game over"),
                Ending::Abandoned => info!("game abandoned"),
            }
            match self.read_line("Play again? (y/n) ")? {
                Some(answer) if answer.eq_ignore_ascii_case("y") => continue,
                _ => break,
            }
        }
        Self::print(&mut self.output, &"Goodbye\r\n")
    }

    /// `true` once the player picks "Start Game"
    fn start_menu(&mut self) -> io::Result<bool> {
        Self::print(&mut self.output, &START_MENU)?;
        loop {
            let Some(choice) = self.read_line("What would you like to do? ")? else {
                return Ok(false);
            };
            match choice.as_str() {
                "1" => return Ok(true),
                "2" => Self::print(&mut self.output, &HOW_TO_PLAY)?,
                "3" => return Ok(false),
                other => Self::error(&mut self.output, &format!("Unknown choice \"{other}\"\r\n"))?,
            }
        }
    }

    fn play(&mut self, game: &mut Game) -> io::Result<Ending> {
        loop {
            render_board(&mut self.output, game.board())?;
            let player = game.turn();
            let prompt = format!(
                "\r\nIt's your turn {player}. (1) classic, (2) quantum, (3) collapse{}, (4) quit: ",
                if game.powers().is_available(player) { "" } else { " [used]" }
            );
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(Ending::EndOfInput);
            };

            let command = match Command::parse_tokens(into_tokens(&line)) {
                Ok(c) => c,
                Err(e) => {
                    Self::error(&mut self.output, &format!("{e}\r\n"))?;
                    continue;
                }
            };

            let action = match command {
                Command::Quit => return Ok(Ending::Abandoned),
                Command::Help => {
                    Self::print(&mut self.output, &HOW_TO_PLAY)?;
                    continue;
                }
                Command::Board => continue,
                Command::Circuit => {
                    Self::print(&mut self.output, &game.register().circuit())?;
                    continue;
                }
                Command::Collapse => Action::Collapse,
                Command::Classic(position) => match self.position_or_ask(position)? {
                    Some(p) => Action::Classic(p),
                    None => return Ok(Ending::EndOfInput),
                },
                Command::Quantum(first, second) => {
                    let Some(first) = self.position_or_ask(first)? else {
                        return Ok(Ending::EndOfInput);
                    };
                    let Some(second) = self.position_or_ask(second)? else {
                        return Ok(Ending::EndOfInput);
                    };
                    Action::Quantum(first, second)
                }
            };

            let turn = match game.play(action) {
                Ok(turn) => turn,
                Err(e) => {
                    Self::error(&mut self.output, &format!("{e}\r\n"))?;
                    continue;
                }
            };
            self.report(&turn, game.board())?;
            if self.config.show_circuit {
                Self::print(&mut self.output, &game.register().circuit())?;
            }

            if turn.outcome.is_over() {
                render_board(&mut self.output, game.board())?;
                let verdict = match turn.outcome {
                    Outcome::Win(symbol) => format!("\r\nGame Over.\r\n **** {symbol} won ****\r\n"),
                    _ => "\r\nGame Over.\r\nIt's a Tie!\r\n".to_string(),
                };
                Self::print(&mut self.output, &verdict)?;
                return Ok(Ending::Finished(turn.outcome));
            }
        }
    }

    fn report(&mut self, turn: &Turn, board: &Board) -> io::Result<()> {
        if let Some(outcome) = turn.collapsed {
            Self::print(
                &mut self.output,
                &format!("\r\n{} triggered a collapse: {outcome}\r\n", turn.player),
            )?;
        }
        if let Some(outcome) = turn.forced {
            Self::print(
                &mut self.output,
                &format!(
                    "\r\nBoard full, collapsing: {outcome} ({} marks remain)\r\n",
                    board.occupied_count()
                ),
            )?;
        }
        Ok(())
    }

    /// `position` if given, otherwise prompts until a number is typed
    fn position_or_ask(&mut self, position: Option<usize>) -> io::Result<Option<usize>> {
        if position.is_some() {
            return Ok(position);
        }
        loop {
            let Some(line) = self.read_line("Which location? (1-9) ")? else {
                return Ok(None);
            };
            match parse_position!(line.as_str()) {
                Ok(p) => return Ok(Some(p)),
                Err(e) => Self::error(&mut self.output, &format!("{e}\r\n"))?,
            }
        }
    }

    /// Trimmed line of input, `None` at end of input
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Self::print(&mut self.output, &prompt)?;
        self.input_buffer.clear();
        if self.input.read_line(&mut self.input_buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.input_buffer.trim().to_string()))
    }

    fn print<T: Display>(output: &mut W, text: &T) -> io::Result<()> {
        queue!(output, style::Print(text))?;
        output.flush()
    }

    fn error<T: Display>(output: &mut W, text: &T) -> io::Result<()> {
        queue!(
            output,
            style::PrintStyledContent(StyledContent::new(
                ContentStyle {
                    foreground_color: Some(Color::Red),
                    background_color: None,
                    underline_color: None,
                    attributes: Attributes::default()
                },
                "Error: "
            )),
            style::Print(text.to_string())
        )?;
        output.flush()
    }
}
