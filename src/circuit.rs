use std::fmt::Display;

use crate::gate::{Gate, N_QUBITS};

/// Ordered log of every gate issued to a register
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Circuit {
    instructions: Vec<Gate>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, gate: Gate) {
        self.instructions.push(gate);
    }

    pub fn instructions(&self) -> &[Gate] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "qreg q[{N_QUBITS}];")?;
        writeln!(f, "creg c[{N_QUBITS}];")?;
        for gate in &self.instructions {
            writeln!(f, "{gate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_gates_in_order() {
        let mut circuit = Circuit::new();
        circuit.push(Gate::Hadamard(0));
        circuit.push(Gate::BitFlip(1));
        circuit.push(Gate::ControlledNot(0, 1));

        let text = circuit.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["qreg q[9];", "creg c[9];", "h q[0];", "x q[1];", "cx q[0],q[1];"]
        );
        assert_eq!(circuit.len(), 3);
    }
}
