mod explain;
mod linear;
mod pipeline;
mod utils;
mod vectorizer;

pub use explain::TermWeight;
pub use linear::LinearModel;
pub use pipeline::{Pipeline, Prediction};
pub use vectorizer::Vectorizer;

/// Information about the shape of a loaded pipeline
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    /// Number of vocabulary terms (feature columns)
    pub vocabulary_size: usize,
    /// Labels of the classes, in distribution order
    pub classes: Vec<String>,
}
