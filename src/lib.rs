//! Churn prep - подготовка выборок оттока клиентов для классификатора

pub mod config;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod preprocessing;
pub mod split;
pub mod types;

pub use config::{PipelineConfig, ScalerFit};
pub use error::{PrepError, Result};
pub use pipeline::{prepare, prepare_file, run};
pub use preprocessing::*;
pub use split::{SplitIndices, StratifiedSplitter};
pub use types::*;
