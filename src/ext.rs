use nalgebra::{Complex, DVector};

/// Builds a `Complex<f32>` from its cartesian parts.
///
/// `cart!(re)` leaves the imaginary part at zero. Usable in
/// `const` items.
#[macro_export]
macro_rules! cart {
    ($re:expr) => {
        $crate::cart!($re, 0.0)
    };
    ($re:expr, $im:expr) => {
        ::nalgebra::Complex::<f32>::new($re, $im)
    };
}

/// Sum of the squared magnitudes of every amplitude
pub fn total_probability(state: &DVector<Complex<f32>>) -> f32 {
    state.iter().map(|c| c.norm_sqr()).sum()
}

/// Compares two amplitudes component-wise
///
/// Two amplitudes are considered equal when both the real and
/// imaginary parts differ by no more than `margin`. Any `NAN`
/// component makes the comparison fail.
pub fn equal_c(lhs: Complex<f32>, rhs: Complex<f32>, margin: f32) -> bool {
    let margin = margin.abs();
    (lhs.re - rhs.re).abs() <= margin && (lhs.im - rhs.im).abs() <= margin
}

/// Compares two state vectors element by element using [`equal_c`]
///
/// Vectors of different length are never equal.
pub fn equal_to_state(
    lhs: &DVector<Complex<f32>>,
    rhs: &DVector<Complex<f32>>,
    margin: f32,
) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs.iter())
            .all(|(&l, &r)| equal_c(l, r, margin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_cart_defaults_imaginary_to_zero() {
        let c: Complex<f32> = cart!(1.5);
        assert_eq!(c.re, 1.5);
        assert_eq!(c.im, 0.0);
    }

    #[test]
    fn test_total_probability_of_even_split() {
        let state = DVector::from_vec(vec![cart!(FRAC_1_SQRT_2), cart!(0.0), cart!(FRAC_1_SQRT_2)]);
        assert!((total_probability(&state) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_equal_c_rejects_nan() {
        assert!(!equal_c(cart!(f32::NAN), cart!(0.0), 0.1));
        assert!(equal_c(cart!(0.5, 0.1), cart!(0.5001, 0.1), 0.001));
    }

    #[test]
    fn test_equal_to_state_length_mismatch() {
        let a = DVector::from_vec(vec![cart!(1.0), cart!(0.0)]);
        let b = DVector::from_vec(vec![cart!(1.0)]);
        assert!(!equal_to_state(&a, &b, 0.001));
        assert!(equal_to_state(&a, &a.clone(), 0.0));
    }
}
