use qttt::{Board, Register, Symbol, apply_classic_move, apply_quantum_move, collapse};
use rand::{SeedableRng, rngs::StdRng};

fn main() {
    divan::main();
}

#[divan::bench(args = [0, 1, 2, 3, 4, 5, 6, 7, 8])]
fn hadamard(qubit: usize) -> Register {
    let mut register = Register::new();
    register.hadamard(qubit).unwrap();
    register
}

#[divan::bench]
fn quantum_moves_then_collapse() -> Board {
    let mut rng = StdRng::seed_from_u64(0);
    let mut board = Board::new();
    let mut register = Register::new();
    apply_quantum_move(&mut board, &mut register, 1, 2, Symbol::X).unwrap();
    apply_quantum_move(&mut board, &mut register, 3, 4, Symbol::O).unwrap();
    apply_quantum_move(&mut board, &mut register, 5, 6, Symbol::X).unwrap();
    apply_quantum_move(&mut board, &mut register, 7, 8, Symbol::O).unwrap();
    apply_classic_move(&mut board, &mut register, 9, Symbol::X).unwrap();
    collapse(&mut board, &mut register, &mut rng).unwrap();
    board
}
