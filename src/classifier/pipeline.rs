use std::path::Path;

use log::debug;

use crate::artifact::{load_artifact, ArtifactError, PipelineArtifact};

use super::explain::{rank_terms, TermWeight};
use super::linear::LinearModel;
use super::vectorizer::Vectorizer;
use super::PipelineInfo;

/// The trained two-stage pipeline: TF-IDF vectorizer plus linear
/// classifier.
///
/// Immutable after construction; the server loads one instance per process
/// and shares it across request tasks.
#[derive(Debug, Clone)]
pub struct Pipeline {
    vectorizer: Vectorizer,
    model: LinearModel,
}

/// A classified message: the winning label and the maximum probability of
/// the distribution, as a fraction in [0, 1].
#[derive(Debug, Clone)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Pipeline>();
    }
};

impl Pipeline {
    /// Validates an artifact and builds the in-memory pipeline.
    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, ArtifactError> {
        artifact.validate()?;
        Ok(Self {
            vectorizer: Vectorizer::from_artifact(artifact.vectorizer),
            model: LinearModel::from_artifact(artifact.classifier),
        })
    }

    /// Reads, validates, and builds the pipeline from a JSON artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        Self::from_artifact(load_artifact(path)?)
    }

    /// The vectorizer stage, for callers that need raw feature vectors.
    pub fn vectorizer(&self) -> &Vectorizer {
        &self.vectorizer
    }

    /// Class labels in distribution order.
    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    /// Probability distribution over `classes()` for the text.
    ///
    /// Text without a single vocabulary hit vectorizes to all zeros and
    /// yields the intercept-driven distribution. That is the trained
    /// model's answer for such input, not an error.
    pub fn predict_proba(&self, text: &str) -> Vec<f32> {
        self.model.predict_proba(&self.vectorizer.transform(text))
    }

    /// The most probable label for the text.
    pub fn predict(&self, text: &str) -> String {
        self.classify(text).label
    }

    /// Label plus confidence, the maximum probability of the distribution.
    pub fn classify(&self, text: &str) -> Prediction {
        let probabilities = self.predict_proba(text);
        let winner = LinearModel::argmax(&probabilities);
        debug!(
            "Classified as '{}' with probability {:.4}",
            self.model.classes()[winner],
            probabilities[winner]
        );
        Prediction {
            label: self.model.classes()[winner].clone(),
            confidence: probabilities[winner],
        }
    }

    /// The `k` heaviest vocabulary terms in the vectorized text, descending
    /// by weight, ties in vocabulary order. Fewer than `k` non-zero terms
    /// pad out with zero-weight terms.
    pub fn top_terms(&self, text: &str, k: usize) -> Vec<TermWeight> {
        let vector = self.vectorizer.transform(text);
        rank_terms(&vector, self.vectorizer.feature_names(), k)
    }

    /// Returns information about the pipeline's shape
    pub fn info(&self) -> PipelineInfo {
        PipelineInfo {
            vocabulary_size: self.vectorizer.len(),
            classes: self.model.classes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn test_pipeline() -> Pipeline {
        let artifact: PipelineArtifact = serde_json::from_value(json!({
            "schema_version": 1,
            "vectorizer": {
                "vocabulary": {"food": 0, "need": 1, "water": 2},
                "idf": [1.4, 1.1, 1.3]
            },
            "classifier": {
                "classes": ["other", "request"],
                "coef": [[1.7, 2.1, 1.8]],
                "intercept": [-0.4]
            }
        }))
        .unwrap();
        Pipeline::from_artifact(artifact).unwrap()
    }

    #[test]
    fn test_classify_reports_winning_class() {
        let pipeline = test_pipeline();
        let prediction = pipeline.classify("we need water and food");
        assert_eq!(prediction.label, "request");
        assert!(prediction.confidence > 0.9);
        assert!(prediction.confidence < 1.0);
    }

    #[test]
    fn test_predict_matches_classify() {
        let pipeline = test_pipeline();
        assert_eq!(
            pipeline.predict("we need water"),
            pipeline.classify("we need water").label
        );
    }

    #[test]
    fn test_no_vocabulary_hit_is_intercept_driven() {
        let pipeline = test_pipeline();
        // sigmoid(-0.4) = 0.4013, so "other" wins at 0.5987.
        let prediction = pipeline.classify("nothing matches at all");
        assert_eq!(prediction.label, "other");
        assert!((prediction.confidence - 0.5987).abs() < 1e-3);
    }

    #[test]
    fn test_distribution_matches_classes() {
        let pipeline = test_pipeline();
        let probabilities = pipeline.predict_proba("need food");
        assert_eq!(probabilities.len(), pipeline.classes().len());
        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_terms_ranks_by_weight() {
        let pipeline = test_pipeline();
        // need twice at idf 1.1 outweighs water once at idf 1.3.
        let terms = pipeline.top_terms("need need water", 10);
        assert_eq!(terms.len(), 3);
        assert_eq!(terms[0].term, "need");
        assert_eq!(terms[1].term, "water");
        assert_eq!(terms[2].term, "food");
        assert_eq!(terms[2].weight, 0.0);
    }

    #[test]
    fn test_info_reports_shape() {
        let pipeline = test_pipeline();
        let info = pipeline.info();
        assert_eq!(info.vocabulary_size, 3);
        assert_eq!(info.classes, ["other", "request"]);
    }

    #[test]
    fn test_from_artifact_rejects_invalid() {
        let artifact: PipelineArtifact = serde_json::from_value(json!({
            "schema_version": 1,
            "vectorizer": {
                "vocabulary": {"food": 0},
                "idf": [1.4, 9.9]
            },
            "classifier": {
                "classes": ["other", "request"],
                "coef": [[1.7]],
                "intercept": [-0.4]
            }
        }))
        .unwrap();
        assert!(Pipeline::from_artifact(artifact).is_err());
    }
}
