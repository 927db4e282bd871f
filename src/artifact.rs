use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

/// Artifact schema revision this build understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Failed to read pipeline artifact {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse pipeline artifact {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported artifact schema version {found} (this build supports {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("Inconsistent pipeline artifact: {0}")]
    Inconsistent(String),
}

/// On-disk form of the trained pipeline: a TF-IDF vectorizer stage and a
/// linear classifier stage, exported as JSON by the training environment.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineArtifact {
    pub schema_version: u32,
    pub vectorizer: VectorizerArtifact,
    pub classifier: ClassifierArtifact,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    /// Term to feature column. Columns must cover 0..len exactly.
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierArtifact {
    /// Output labels, in the order the probability distribution uses.
    pub classes: Vec<String>,
    /// One weight row per class, or a single row for the binary sigmoid
    /// form where the row scores the second class.
    pub coef: Vec<Vec<f32>>,
    /// One bias term per weight row.
    pub intercept: Vec<f32>,
}

/// Reads and parses a pipeline artifact from disk. Consistency of the two
/// stages is checked when the artifact is turned into a
/// [`Pipeline`](crate::Pipeline).
pub fn load_artifact<P: AsRef<Path>>(path: P) -> Result<PipelineArtifact, ArtifactError> {
    let path = path.as_ref();
    info!("Loading pipeline artifact from {}", path.display());
    let bytes = fs::read(path).map_err(|source| ArtifactError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: PipelineArtifact =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "Read artifact: {} vocabulary terms, {} classes",
        artifact.vectorizer.vocabulary.len(),
        artifact.classifier.classes.len()
    );
    Ok(artifact)
}

impl PipelineArtifact {
    /// Checks that the two stages agree on their shared dimensions and that
    /// every number in the artifact is usable.
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.schema_version != SUPPORTED_SCHEMA_VERSION {
            return Err(ArtifactError::UnsupportedSchema {
                found: self.schema_version,
                supported: SUPPORTED_SCHEMA_VERSION,
            });
        }

        let vocabulary_size = self.vectorizer.vocabulary.len();
        if vocabulary_size == 0 {
            return Err(ArtifactError::Inconsistent("vocabulary is empty".into()));
        }
        if self.vectorizer.idf.len() != vocabulary_size {
            return Err(ArtifactError::Inconsistent(format!(
                "idf has {} entries for {} vocabulary terms",
                self.vectorizer.idf.len(),
                vocabulary_size
            )));
        }
        if let Some(value) = self
            .vectorizer
            .idf
            .iter()
            .find(|value| !value.is_finite() || **value < 0.0)
        {
            return Err(ArtifactError::Inconsistent(format!(
                "idf contains invalid value {value}"
            )));
        }

        // len() entries, all below len(), none repeated: the columns cover
        // 0..len() exactly.
        let mut assigned = vec![false; vocabulary_size];
        for (term, &column) in &self.vectorizer.vocabulary {
            if column >= vocabulary_size {
                return Err(ArtifactError::Inconsistent(format!(
                    "term '{term}' maps to column {column}, outside 0..{vocabulary_size}"
                )));
            }
            if assigned[column] {
                return Err(ArtifactError::Inconsistent(format!(
                    "column {column} is assigned to more than one term"
                )));
            }
            assigned[column] = true;
        }

        let classifier = &self.classifier;
        if classifier.classes.len() < 2 {
            return Err(ArtifactError::Inconsistent(format!(
                "classifier needs at least two classes, found {}",
                classifier.classes.len()
            )));
        }
        if classifier.coef.is_empty() {
            return Err(ArtifactError::Inconsistent(
                "classifier has no weight rows".into(),
            ));
        }
        if classifier.intercept.len() != classifier.coef.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} intercepts for {} weight rows",
                classifier.intercept.len(),
                classifier.coef.len()
            )));
        }
        if classifier.coef.len() == 1 {
            if classifier.classes.len() != 2 {
                return Err(ArtifactError::Inconsistent(format!(
                    "a single weight row implies binary classification, found {} classes",
                    classifier.classes.len()
                )));
            }
        } else if classifier.coef.len() != classifier.classes.len() {
            return Err(ArtifactError::Inconsistent(format!(
                "{} weight rows for {} classes",
                classifier.coef.len(),
                classifier.classes.len()
            )));
        }
        for (row, weights) in classifier.coef.iter().enumerate() {
            if weights.len() != vocabulary_size {
                return Err(ArtifactError::Inconsistent(format!(
                    "weight row {row} has {} columns for {vocabulary_size} vocabulary terms",
                    weights.len()
                )));
            }
            if weights.iter().any(|weight| !weight.is_finite()) {
                return Err(ArtifactError::Inconsistent(format!(
                    "weight row {row} contains a non-finite value"
                )));
            }
        }
        if classifier.intercept.iter().any(|bias| !bias.is_finite()) {
            return Err(ArtifactError::Inconsistent(
                "intercept contains a non-finite value".into(),
            ));
        }

        Ok(())
    }
}
