use std::{f32::consts::FRAC_1_SQRT_2, fmt::Display};

use nalgebra::{Complex, Matrix2};

use crate::cart;

/// Number of two-level systems in a register, one per board cell
pub const N_QUBITS: usize = 9;

/// Mask of qubits, one bit per qubit index
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct QBits(usize);

impl QBits {
    /// Specify qubits from bitstring
    pub fn from_bitstring(bits: usize) -> Self {
        Self(bits)
    }

    /// Specify qubits from a list of indices
    pub fn from_indices<'a, I>(indices: I) -> Self
    where
        I: IntoIterator<Item = &'a usize>,
    {
        Self(indices.into_iter().fold(0, |bits, i| bits | (1 << i)))
    }

    /// Mask covering every qubit of the register
    pub fn all() -> Self {
        Self((1 << N_QUBITS) - 1)
    }

    pub fn get_bitstring(&self) -> usize {
        self.0
    }

    pub fn get_indices(&self) -> Vec<usize> {
        (0..usize::BITS as usize)
            .filter(|i| (self.0 >> i) & 1 == 1)
            .collect()
    }
}

/// Every operation the register understands
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gate {
    BitFlip(usize),
    Hadamard(usize),
    ControlledNot(usize, usize),
    MeasureAll,
    ResetAll,
}

impl Gate {
    #[rustfmt::skip]
    pub const PAULI_X_DATA: [Complex<f32>; 4] = [
        cart!(0.0), cart!(1.0),
        cart!(1.0), cart!(0.0),
    ];

    #[rustfmt::skip]
    pub const HADAMARD_DATA: [Complex<f32>; 4] = [
        cart!(FRAC_1_SQRT_2), cart!(FRAC_1_SQRT_2),
        cart!(FRAC_1_SQRT_2), cart!(-FRAC_1_SQRT_2),
    ];

    /// 2x2 matrix acting on the target qubit, `None` for
    /// the non-unitary operations
    pub fn matrix(&self) -> Option<Matrix2<Complex<f32>>> {
        let data = match self {
            Gate::BitFlip(_) | Gate::ControlledNot(_, _) => &Self::PAULI_X_DATA,
            Gate::Hadamard(_) => &Self::HADAMARD_DATA,
            Gate::MeasureAll | Gate::ResetAll => return None,
        };
        Some(Matrix2::from_row_slice(data))
    }

    pub fn get_control_bits(&self) -> QBits {
        match self {
            Gate::ControlledNot(control, _) => QBits::from_indices([control]),
            _ => QBits::default(),
        }
    }

    pub fn get_target_bits(&self) -> QBits {
        match self {
            Gate::BitFlip(target) | Gate::Hadamard(target) | Gate::ControlledNot(_, target) => {
                QBits::from_indices([target])
            }
            Gate::MeasureAll | Gate::ResetAll => QBits::all(),
        }
    }

}

impl Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gate::BitFlip(q) => write!(f, "x q[{q}];"),
            Gate::Hadamard(q) => write!(f, "h q[{q}];"),
            Gate::ControlledNot(c, t) => write!(f, "cx q[{c}],q[{t}];"),
            Gate::MeasureAll => f.write_str("measure q -> c;"),
            Gate::ResetAll => f.write_str("reset q;"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qbits_indices_roundtrip_mask() {
        let bits = QBits::from_indices(&[0, 3, 8]);
        assert_eq!(bits.get_bitstring(), 0b1_0000_1001);
        assert_eq!(bits.get_indices(), vec![0, 3, 8]);
    }

    #[test]
    fn test_all_covers_nine_qubits() {
        assert_eq!(QBits::all().get_indices(), (0..N_QUBITS).collect::<Vec<_>>());
    }

    #[test]
    fn test_controlled_not_masks() {
        let gate = Gate::ControlledNot(2, 5);
        assert_eq!(gate.get_control_bits().get_bitstring(), 1 << 2);
        assert_eq!(gate.get_target_bits().get_bitstring(), 1 << 5);
    }

    #[test]
    fn test_non_unitary_gates_have_no_matrix() {
        assert!(Gate::MeasureAll.matrix().is_none());
        assert!(Gate::ResetAll.matrix().is_none());
        assert!(Gate::Hadamard(0).matrix().is_some());
    }

    #[test]
    fn test_display_is_qasm_like() {
        assert_eq!(Gate::Hadamard(0).to_string(), "h q[0];");
        assert_eq!(Gate::ControlledNot(0, 1).to_string(), "cx q[0],q[1];");
        assert_eq!(Gate::BitFlip(8).to_string(), "x q[8];");
        assert_eq!(Gate::MeasureAll.to_string(), "measure q -> c;");
    }
}
