//! Urgency triage for multilingual disaster-response messages.
//!
//! The crate restores a pre-trained TF-IDF + linear-classifier pipeline from
//! a JSON artifact, translates incoming text to English through a
//! best-effort external call, classifies the translated text, and serves a
//! single-page web interface showing the label, the confidence, and the top
//! contributing vocabulary terms.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use mayday::{Pipeline, PipelineArtifact};
//!
//! let artifact: PipelineArtifact = serde_json::from_str(
//!     r#"{
//!         "schema_version": 1,
//!         "vectorizer": {
//!             "vocabulary": {"food": 0, "need": 1, "water": 2},
//!             "idf": [1.4, 1.1, 1.3]
//!         },
//!         "classifier": {
//!             "classes": ["other", "request"],
//!             "coef": [[1.7, 2.1, 1.8]],
//!             "intercept": [-0.4]
//!         }
//!     }"#,
//! )?;
//!
//! let pipeline = Pipeline::from_artifact(artifact)?;
//! let prediction = pipeline.classify("We need water and food!");
//! assert_eq!(prediction.label, "request");
//! assert!(prediction.confidence > 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The pipeline is immutable after construction and can be shared across
//! threads using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # use mayday::{Pipeline, PipelineArtifact};
//! # let artifact: PipelineArtifact = serde_json::from_str(
//! #     r#"{"schema_version": 1,
//! #         "vectorizer": {"vocabulary": {"help": 0}, "idf": [1.0]},
//! #         "classifier": {"classes": ["other", "request"],
//! #                        "coef": [[2.0]], "intercept": [-0.5]}}"#,
//! # )?;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let pipeline = Arc::new(Pipeline::from_artifact(artifact)?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let pipeline = Arc::clone(&pipeline);
//!     handles.push(thread::spawn(move || {
//!         pipeline.classify("send help");
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod classifier;
pub mod translate;
pub mod web;

pub use artifact::{
    load_artifact, ArtifactError, ClassifierArtifact, PipelineArtifact, VectorizerArtifact,
};
pub use classifier::{Pipeline, PipelineInfo, Prediction, TermWeight, Vectorizer};
pub use translate::{Translation, Translator, TranslatorConfig};

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
