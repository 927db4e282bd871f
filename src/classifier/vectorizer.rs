use std::collections::HashMap;

use crate::artifact::VectorizerArtifact;

use super::utils::l2_normalize;

/// TF-IDF vectorizer stage restored from a pipeline artifact.
///
/// Mirrors the vectorizer that produced the artifact: text is lowercased,
/// tokens are runs of alphanumeric or underscore characters at least two
/// characters long, raw term counts are scaled by the per-column idf, and
/// the resulting vector is L2-normalized.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    feature_names: Vec<String>,
}

impl Vectorizer {
    /// Builds the stage from a validated artifact.
    pub(crate) fn from_artifact(artifact: VectorizerArtifact) -> Self {
        let mut feature_names = vec![String::new(); artifact.vocabulary.len()];
        for (term, &column) in &artifact.vocabulary {
            feature_names[column] = term.clone();
        }
        Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            feature_names,
        }
    }

    /// Number of feature columns (vocabulary size).
    pub fn len(&self) -> usize {
        self.feature_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feature_names.is_empty()
    }

    /// Vocabulary terms in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Turns text into a sparse TF-IDF vector sorted by column index.
    ///
    /// Tokens outside the vocabulary are ignored; text without a single
    /// vocabulary hit yields an empty vector.
    pub fn transform(&self, text: &str) -> Vec<(usize, f32)> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for token in tokens(&lowered) {
            if let Some(&column) = self.vocabulary.get(token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }
        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column]))
            .collect();
        entries.sort_unstable_by_key(|&(column, _)| column);
        l2_normalize(&mut entries);
        entries
    }
}

/// Splits lowercased text into tokens: maximal runs of alphanumeric or
/// underscore characters, single characters dropped.
fn tokens(lowered: &str) -> impl Iterator<Item = &str> {
    lowered
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|token| token.chars().count() >= 2)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::artifact::VectorizerArtifact;

    use super::*;

    fn test_vectorizer() -> Vectorizer {
        Vectorizer::from_artifact(VectorizerArtifact {
            vocabulary: HashMap::from([
                ("dlo".to_string(), 0),
                ("manje".to_string(), 1),
                ("water".to_string(), 2),
            ]),
            idf: vec![2.0, 3.0, 1.0],
        })
    }

    #[test]
    fn test_feature_names_follow_column_order() {
        let vectorizer = test_vectorizer();
        assert_eq!(vectorizer.feature_names(), ["dlo", "manje", "water"]);
        assert_eq!(vectorizer.len(), 3);
        assert!(!vectorizer.is_empty());
    }

    #[test]
    fn test_tokens_lowercase_split_and_length_rule() {
        let lowered = "We NEED dlo, ak-manje_x 7 a!".to_lowercase();
        let collected: Vec<&str> = tokens(&lowered).collect();
        assert_eq!(collected, ["we", "need", "dlo", "ak", "manje_x"]);
    }

    #[test]
    fn test_transform_counts_scales_and_normalizes() {
        let vectorizer = test_vectorizer();
        // dlo twice, manje once: tf-idf (4.0, 3.0), norm 5.0.
        let vector = vectorizer.transform("Dlo, dlo! Manje.");
        assert_eq!(vector.len(), 2);
        assert_eq!(vector[0].0, 0);
        assert!((vector[0].1 - 0.8).abs() < 1e-6);
        assert_eq!(vector[1].0, 1);
        assert!((vector[1].1 - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_single_hit_normalizes_to_one() {
        let vectorizer = test_vectorizer();
        let vector = vectorizer.transform("water w");
        assert_eq!(vector.len(), 1);
        assert_eq!(vector[0].0, 2);
        assert!((vector[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let vectorizer = test_vectorizer();
        assert!(vectorizer.transform("nothing matches here").is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_vector() {
        let vectorizer = test_vectorizer();
        assert!(vectorizer.transform("").is_empty());
        assert!(vectorizer.transform("   \n\t").is_empty());
    }
}
