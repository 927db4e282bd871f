/// Scales a sparse vector to unit L2 norm in place. Vectors with a
/// vanishing norm are left untouched.
pub(crate) fn l2_normalize(entries: &mut [(usize, f32)]) {
    let norm: f32 = entries.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 1e-10 {
        for (_, weight) in entries.iter_mut() {
            *weight /= norm;
        }
    }
}

pub(crate) fn sigmoid(score: f32) -> f32 {
    1.0 / (1.0 + (-score).exp())
}

/// Numerically stable softmax over raw class scores.
pub(crate) fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|&score| (score - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|exp| exp / sum).collect()
}
