use ndarray::{Array1, Array2};

use crate::artifact::ClassifierArtifact;

use super::utils::{sigmoid, softmax};

/// Linear classifier stage restored from a pipeline artifact.
///
/// Holds a single weight row in the binary sigmoid form (two classes, the
/// row scores the second class) or one row per class in the multinomial
/// softmax form.
#[derive(Debug, Clone)]
pub struct LinearModel {
    classes: Vec<String>,
    coef: Array2<f32>,
    intercept: Array1<f32>,
}

impl LinearModel {
    /// Builds the stage from a validated artifact.
    pub(crate) fn from_artifact(artifact: ClassifierArtifact) -> Self {
        let rows = artifact.coef.len();
        let columns = artifact.coef.first().map_or(0, Vec::len);
        let flat: Vec<f32> = artifact.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, columns), flat)
            .expect("validated artifact has a rectangular weight matrix");
        Self {
            classes: artifact.classes,
            coef,
            intercept: Array1::from_vec(artifact.intercept),
        }
    }

    /// Class labels in distribution order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Probability distribution over `classes()` for a sparse input vector.
    pub fn predict_proba(&self, vector: &[(usize, f32)]) -> Vec<f32> {
        let scores: Vec<f32> = (0..self.coef.nrows())
            .map(|row| {
                let weights = self.coef.row(row);
                self.intercept[row]
                    + vector
                        .iter()
                        .map(|&(column, weight)| weights[column] * weight)
                        .sum::<f32>()
            })
            .collect();
        if self.coef.nrows() == 1 {
            // Binary export: the single row scores classes[1].
            let p = sigmoid(scores[0]);
            vec![1.0 - p, p]
        } else {
            softmax(&scores)
        }
    }

    /// Index of the largest probability; the earliest class wins a tie.
    pub(crate) fn argmax(probabilities: &[f32]) -> usize {
        let mut best = 0;
        for (index, p) in probabilities.iter().enumerate().skip(1) {
            if *p > probabilities[best] {
                best = index;
            }
        }
        best
    }
}
