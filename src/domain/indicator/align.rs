//! Trailing-offset alignment of indicator series.
//!
//! Indicator outputs warm up at different rates, so two series computed from
//! the same input usually differ in length. Both end at the latest input
//! value; aligning them means dropping the extra head of the longer one.

/// Right-align two series: returns the trailing `min(a.len(), b.len())`
/// elements of each, so index `i` of both results refers to the same input
/// position.
pub fn right_align<'a>(a: &'a [f64], b: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let len = a.len().min(b.len());
    (&a[a.len() - len..], &b[b.len() - len..])
}

/// Pointwise combination of two right-aligned series.
pub fn zip_aligned<F>(a: &[f64], b: &[f64], f: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    let (a, b) = right_align(a, b);
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

/// The last two values of a series as `(previous, current)`.
pub fn last_two(series: &[f64]) -> Option<(f64, f64)> {
    match series {
        [.., prev, curr] => Some((*prev, *curr)),
        _ => None,
    }
}
