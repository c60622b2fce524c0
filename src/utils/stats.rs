//! Small statistics helpers shared by the estimators

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Cyclically repeat `values` until `len` entries are produced.
///
/// `[a, b, c, d]` resized to 6 becomes `[a, b, c, d, a, b]`.
pub fn resize_cyclic(values: &[f64], len: usize) -> Vec<f64> {
    if values.is_empty() {
        return vec![0.0; len];
    }
    values.iter().copied().cycle().take(len).collect()
}
