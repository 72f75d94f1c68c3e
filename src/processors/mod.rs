pub mod cleaner;
pub mod normalizer;
pub mod pipeline;
pub mod reshaper;

pub use cleaner::{Cleaner, CleaningReport};
pub use normalizer::YearNormalizer;
pub use pipeline::{ReshapeConfig, ReshapePipeline, RunSummary};
pub use reshaper::Reshaper;
