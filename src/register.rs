use std::fmt::Display;

use nalgebra::{Complex, DVector, Vector2};
use rand::Rng;
use tracing::{debug, trace};

use crate::{
    backend::{LocalSimulator, MeasurementBackend},
    cart,
    circuit::Circuit,
    ext::total_probability,
    gate::{Gate, N_QUBITS, QBits},
};

/// Number of basis states spanned by the register
pub const STATE_SIZE: usize = 1 << N_QUBITS;

/// Allowed drift of the total probability away from 1
pub const NORM_TOLERANCE: f32 = 1e-4;

/// Probabilities at or below this are treated as zero when
/// deciding whether the register sits in a basis state
const ZERO_PROBABILITY: f32 = 1e-6;

/// Outcome of measuring every qubit, bit `i` belongs to qubit `i`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitstring(u16);

impl Bitstring {
    /// Bits above the register width are dropped
    pub fn from_bits(bits: usize) -> Self {
        Self((bits & QBits::all().get_bitstring()) as u16)
    }

    pub fn bits(&self) -> usize {
        self.0 as usize
    }

    pub fn bit(&self, qubit: usize) -> bool {
        qubit < N_QUBITS && (self.0 >> qubit) & 1 == 1
    }

    pub fn count_ones(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl Display for Bitstring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0width$b}", self.0, width = N_QUBITS)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegisterError {
    #[error("Qubit {0} is outside the register (expected 0-8)")]
    InvalidQubit(usize),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Register is not normalized (total probability {0})")]
    NotNormalized(f32),
    #[error("Qubit {0} cannot be reset while the register is superposed")]
    Superposed(usize),
    #[error("Measurement needs a random source")]
    MeasurementNeedsSampler,
}

/// State vector of the nine cell qubits
///
/// Index `i` of the state vector is the basis state whose bit `q`
/// is the value of qubit `q`.
#[derive(Debug, Clone)]
pub struct Register {
    state_vector: DVector<Complex<f32>>,
    circuit: Circuit,
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

impl Register {
    /// Register with every qubit at 0
    pub fn new() -> Self {
        let mut register = Self {
            state_vector: DVector::from_element(STATE_SIZE, cart!(0.0)),
            circuit: Circuit::new(),
        };
        register.initialize();
        register
    }

    /// Puts the register back to the all-zero basis state and clears the circuit
    pub fn initialize(&mut self) {
        self.state_vector.fill(cart!(0.0));
        self.state_vector[0] = cart!(1.0);
        self.circuit = Circuit::new();
    }

    /// Get current state of the quantum system
    pub fn state_vector(&self) -> &DVector<Complex<f32>> {
        &self.state_vector
    }

    /// Gates issued since the register was created
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn probabilities(&self) -> Vec<f32> {
        self.state_vector.iter().map(|c| c.norm_sqr()).collect()
    }

    pub fn total_probability(&self) -> f32 {
        total_probability(&self.state_vector)
    }

    /// The single basis state holding all probability, if there is one
    pub fn basis_state(&self) -> Option<Bitstring> {
        let mut occupied = self
            .state_vector
            .iter()
            .enumerate()
            .filter(|(_, c)| c.norm_sqr() > ZERO_PROBABILITY)
            .map(|(i, _)| i);
        match (occupied.next(), occupied.next()) {
            (Some(index), None) => Some(Bitstring::from_bits(index)),
            _ => None,
        }
    }

    pub fn apply(&mut self, gate: Gate) -> Result<(), RegisterError> {
        self.check_normalized()?;
        match gate {
            Gate::BitFlip(q) | Gate::Hadamard(q) => Self::check_qubit(q)?,
            Gate::ControlledNot(control, target) => {
                Self::check_qubit(control)?;
                Self::check_qubit(target)?;
                if control == target {
                    return Err(RegisterError::InvalidOperation(format!(
                        "controlled-not needs distinct qubits, got {control} twice"
                    )));
                }
            }
            Gate::ResetAll => return self.reset_all(),
            Gate::MeasureAll => return Err(RegisterError::MeasurementNeedsSampler),
        }

        debug!(%gate, "applying gate");
        self.gate(&gate);
        self.circuit.push(gate);
        Ok(())
    }

    pub fn bit_flip(&mut self, qubit: usize) -> Result<(), RegisterError> {
        self.apply(Gate::BitFlip(qubit))
    }

    pub fn hadamard(&mut self, qubit: usize) -> Result<(), RegisterError> {
        self.apply(Gate::Hadamard(qubit))
    }

    pub fn controlled_not(&mut self, control: usize, target: usize) -> Result<(), RegisterError> {
        self.apply(Gate::ControlledNot(control, target))
    }

    /// Forces `qubit` to 0
    ///
    /// Only defined while the register is a basis state, which it
    /// always is after a measurement.
    pub fn reset(&mut self, qubit: usize) -> Result<(), RegisterError> {
        self.check_normalized()?;
        Self::check_qubit(qubit)?;
        let basis = self
            .basis_state()
            .ok_or(RegisterError::Superposed(qubit))?;
        if basis.bit(qubit) {
            self.apply(Gate::BitFlip(qubit))?;
        }
        Ok(())
    }

    /// Forces every qubit to 0, logged as a single `ResetAll`
    pub fn reset_all(&mut self) -> Result<(), RegisterError> {
        self.check_normalized()?;
        let basis = self
            .basis_state()
            .ok_or_else(|| RegisterError::Superposed(self.first_superposed_qubit()))?;

        for qubit in QBits::from_bitstring(basis.bits()).get_indices() {
            self.gate(&Gate::BitFlip(qubit));
        }
        debug!(from = %basis, "reset all qubits");
        self.circuit.push(Gate::ResetAll);
        Ok(())
    }

    /// Samples every qubit jointly and collapses onto the outcome
    pub fn measure_all<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Bitstring, RegisterError> {
        self.measure_all_with(&LocalSimulator, rng)
    }

    pub fn measure_all_with<B, R>(
        &mut self,
        backend: &B,
        rng: &mut R,
    ) -> Result<Bitstring, RegisterError>
    where
        B: MeasurementBackend,
        R: Rng + ?Sized,
    {
        self.check_normalized()?;
        let outcome = backend.sample_measurement(self, rng)?;
        self.collapse_to(outcome);
        Ok(outcome)
    }

    /// Same as [`Register::measure_all`] with the uniform draw supplied by the caller
    pub fn measure_with_draw(&mut self, draw: f32) -> Result<Bitstring, RegisterError> {
        self.check_normalized()?;
        let outcome = Bitstring::from_bits(self.sample_index(draw)?);
        self.collapse_to(outcome);
        Ok(outcome)
    }

    /// Picks the basis state selected by `draw` on the cumulative distribution
    ///
    /// The first basis state with non-zero probability whose cumulative
    /// probability reaches `draw` wins. Rounding shortfall falls back to
    /// the last basis state with non-zero probability.
    pub fn sample_index(&self, draw: f32) -> Result<usize, RegisterError> {
        if !(0.0..1.0).contains(&draw) {
            return Err(RegisterError::InvalidOperation(format!(
                "measurement draw {draw} is outside [0, 1)"
            )));
        }

        let mut cumulative = 0.0;
        let mut last = None;
        for (i, amplitude) in self.state_vector.iter().enumerate() {
            let probability = amplitude.norm_sqr();
            if probability <= 0.0 {
                continue;
            }
            cumulative += probability;
            last = Some(i);
            if cumulative >= draw {
                return Ok(i);
            }
        }

        last.ok_or(RegisterError::NotNormalized(cumulative))
    }

    /// Lowest qubit whose value differs between populated basis states
    fn first_superposed_qubit(&self) -> usize {
        let (any, all) = self
            .state_vector
            .iter()
            .enumerate()
            .filter(|(_, c)| c.norm_sqr() > ZERO_PROBABILITY)
            .fold((0, usize::MAX), |(any, all), (i, _)| (any | i, all & i));
        ((any ^ all).trailing_zeros() as usize).min(N_QUBITS - 1)
    }

    fn collapse_to(&mut self, outcome: Bitstring) {
        self.state_vector.fill(cart!(0.0));
        self.state_vector[outcome.bits()] = cart!(1.0);
        self.circuit.push(Gate::MeasureAll);
        trace!(%outcome, "register collapsed");
    }

    fn check_qubit(qubit: usize) -> Result<(), RegisterError> {
        if qubit < N_QUBITS {
            Ok(())
        } else {
            Err(RegisterError::InvalidQubit(qubit))
        }
    }

    fn check_normalized(&self) -> Result<(), RegisterError> {
        let total = self.total_probability();
        if (total - 1.0).abs() > NORM_TOLERANCE || total.is_nan() {
            return Err(RegisterError::NotNormalized(total));
        }
        Ok(())
    }

    /// Checks that all control bits are 1
    fn controls_active(i: usize, controls: QBits) -> bool {
        let control_mask = controls.get_bitstring();
        (i & control_mask) == control_mask
    }

    /// Checks that all target bits are 0
    fn is_block_base(i: usize, targets: QBits) -> bool {
        let target_mask = targets.get_bitstring();
        (i & target_mask) == 0
    }

    /// Applies a single-target gate to every (target=0, target=1) pair
    /// whose controls are set. Each index is visited once.
    fn gate(&mut self, gate: &Gate) {
        let Some(u) = gate.matrix() else {
            return;
        };
        let controls = gate.get_control_bits();
        let targets = gate.get_target_bits();
        let target_mask = targets.get_bitstring();

        for i in 0..self.state_vector.len() {
            if !Self::is_block_base(i, targets) {
                continue;
            }

            if !Self::controls_active(i, controls) {
                continue;
            }

            let j = i | target_mask;
            let v = Vector2::new(self.state_vector[i], self.state_vector[j]);
            let v2 = u * v;
            self.state_vector[i] = v2[0];
            self.state_vector[j] = v2[1];
        }
    }
}
