use rand::Rng;

use crate::register::{Bitstring, Register, RegisterError};

/// # MeasurementBackend
/// Anything able to draw one joint outcome from a
/// register should implement this trait.
///
/// The backend only samples. Collapsing the register onto
/// the outcome is left to [`Register::measure_all_with`].
pub trait MeasurementBackend {
    fn sample_measurement<R: Rng + ?Sized>(
        &self,
        register: &Register,
        rng: &mut R,
    ) -> Result<Bitstring, RegisterError>;
}

/// Samples the in-process state vector with a single uniform draw
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSimulator;

impl MeasurementBackend for LocalSimulator {
    fn sample_measurement<R: Rng + ?Sized>(
        &self,
        register: &Register,
        rng: &mut R,
    ) -> Result<Bitstring, RegisterError> {
        let draw: f32 = rng.random();
        register.sample_index(draw).map(Bitstring::from_bits)
    }
}
