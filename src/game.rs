use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    board::{Board, Symbol},
    collapse::{CollapseError, CollapsePowers, collapse},
    moves::{MoveError, apply_classic_move, apply_quantum_move},
    register::{Bitstring, Register},
    win::check_win,
};

/// Fresh board and register for a new game
pub fn new_game() -> (Board, Register) {
    (Board::new(), Register::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Classic(usize),
    Quantum(usize, usize),
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Win(Symbol),
    Tie,
}

impl Outcome {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::Continue)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Collapse(#[from] CollapseError),
    #[error("The game is over")]
    GameOver,
}

/// What happened during one call to [`Game::play`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub player: Symbol,
    pub action: Action,
    /// Outcome of the voluntary collapse, if the action was one
    pub collapsed: Option<Bitstring>,
    /// Outcome of the collapse forced by a full board
    pub forced: Option<Bitstring>,
    pub outcome: Outcome,
}

/// One game of quantum tic-tac-toe
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    register: Register,
    turn: Symbol,
    powers: CollapsePowers,
    rng: StdRng,
    outcome: Outcome,
}

impl Game {
    /// Starts with `X` to move. Without a seed the generator is seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng)
    }

    pub fn with_rng(rng: StdRng) -> Self {
        let (board, register) = new_game();
        Self {
            board,
            register,
            turn: Symbol::X,
            powers: CollapsePowers::new(),
            rng,
            outcome: Outcome::Continue,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    pub fn turn(&self) -> Symbol {
        self.turn
    }

    pub fn powers(&self) -> &CollapsePowers {
        &self.powers
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Performs `action` for the player to move
    ///
    /// A move passes the turn, a voluntary collapse does not. A full
    /// board is collapsed straight away regardless of powers. The turn
    /// is staged on copies, so errors leave the game untouched.
    pub fn play(&mut self, action: Action) -> Result<Turn, GameError> {
        if self.outcome.is_over() {
            return Err(GameError::GameOver);
        }
        let player = self.turn;
        let mut board = self.board.clone();
        let mut register = self.register.clone();
        let mut powers = self.powers;
        let mut rng = self.rng.clone();

        let mut collapsed = None;
        match action {
            Action::Classic(position) => {
                apply_classic_move(&mut board, &mut register, position, player)?
            }
            Action::Quantum(first, second) => {
                apply_quantum_move(&mut board, &mut register, first, second, player)?
            }
            Action::Collapse => {
                powers.consume(player)?;
                collapsed = Some(collapse(&mut board, &mut register, &mut rng)?);
            }
        }

        let mut forced = None;
        let mut outcome = check_win(&board).map_or(Outcome::Continue, Outcome::Win);
        if !outcome.is_over() && board.is_full() {
            debug!("board full, forcing a collapse");
            forced = Some(collapse(&mut board, &mut register, &mut rng)?);
            outcome = match check_win(&board) {
                Some(symbol) => Outcome::Win(symbol),
                None if board.is_full() => Outcome::Tie,
                None => Outcome::Continue,
            };
        }

        self.board = board;
        self.register = register;
        self.powers = powers;
        self.rng = rng;
        if action != Action::Collapse {
            self.turn = player.other();
        }
        if outcome.is_over() {
            info!(?outcome, "game finished");
        }
        self.outcome = outcome;

        Ok(Turn {
            player,
            action,
            collapsed,
            forced,
            outcome,
        })
    }
}
