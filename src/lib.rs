//! Quantum tic-tac-toe.
//!
//! Every board cell is backed by one qubit of a nine-qubit state
//! vector. A classical move flips its qubit, a quantum move entangles
//! two qubits so that exactly one of the two cells survives the next
//! collapse. Only classical marks count towards a line.

mod backend;
mod board;
mod circuit;
mod collapse;
mod config;
mod ext;
mod game;
mod gate;
mod moves;
mod register;
mod render;
mod terminal;
mod win;

pub use backend::*;
pub use board::*;
pub use circuit::*;
pub use collapse::*;
pub use config::*;
pub use ext::*;
pub use game::*;
pub use gate::*;
pub use moves::*;
pub use register::*;
pub use render::*;
pub use terminal::*;
pub use win::*;
