//! Golden quotient and clipping.

use ndarray::{Array2, Zip};

use crate::common::MetricError;

/// Fails unless both arrays have the same shape.
pub(crate) fn check_shapes(left: &Array2<f32>, right: &Array2<f32>) -> Result<(), MetricError> {
    if left.dim() == right.dim() {
        Ok(())
    } else {
        Err(MetricError::ShapeMismatch {
            left: left.dim(),
            right: right.dim(),
        })
    }
}

/// Raises divisors below `floor` to `floor`.
///
/// NaN divisors are kept, so a NaN operand yields a NaN quotient.
#[inline]
pub fn floor_divisor(divisor: f32, floor: f32) -> f32 {
    if divisor < floor { floor } else { divisor }
}

/// Computes the floating-point quotient the hardware should approximate.
///
/// `reference[i] = observed[i] / max(illumination[i], floor)`, in single
/// precision.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the operands differ in shape.
///
/// # Examples
///
/// ```
/// use imgdiv_core::verify::golden::golden_reference;
/// use ndarray::array;
///
/// let illumination = array![[0.5_f32, 0.0], [1.0, 0.05]];
/// let observed = array![[0.25_f32, 0.3], [0.5, 0.1]];
/// let reference = golden_reference(&illumination, &observed, 0.05).unwrap();
/// assert_eq!(reference[[0, 0]], 0.5);
/// assert_eq!(reference[[1, 1]], 2.0);
/// assert!((reference[[0, 1]] - 6.0).abs() < 1e-5);
/// ```
pub fn golden_reference(
    illumination: &Array2<f32>,
    observed: &Array2<f32>,
    floor: f32,
) -> Result<Array2<f32>, MetricError> {
    check_shapes(illumination, observed)?;
    Ok(Zip::from(observed)
        .and(illumination)
        .map_collect(|&num, &den| num / floor_divisor(den, floor)))
}

/// Clips a value to `[0, max]`. NaN passes through.
#[inline]
pub fn clip_value(value: f32, max: f32) -> f32 {
    if value < 0.0 {
        0.0
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clips every element to `[0, max]`.
pub fn clip(values: &Array2<f32>, max: f32) -> Array2<f32> {
    values.mapv(|v| clip_value(v, max))
}
