/// Модуль предобработки данных

pub mod cleaning;
pub mod feature_engineering;
pub mod normalization;

pub use cleaning::DataCleaner;
pub use feature_engineering::FeatureEngineer;
pub use normalization::DataNormalizer;
