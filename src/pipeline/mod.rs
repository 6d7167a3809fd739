// Evaluation pipeline: analyzer seam, result normalization, orchestration.

pub mod builder;
pub mod normalize;
pub mod orchestrator;
pub mod traits;
pub mod value;

pub use builder::{build_pipeline, Collaborators};
pub use orchestrator::{AnalyzerSet, EvaluationReport, Pipeline};
pub use traits::{Analyzer, DocumentPair};
pub use value::AnalysisValue;
