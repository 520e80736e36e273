//! Ошибки подготовки данных

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Required column is missing: {0}")]
    MissingColumn(String),

    #[error("Unexpected target value {value:?} at row {row}")]
    InvalidLabel { row: usize, value: String },

    #[error("Column {column} has non-numeric value {value:?} at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Dataset is empty after cleaning")]
    EmptyDataset,

    #[error("None of the requested feature columns are present")]
    NoFeatures,

    #[error(
        "The least populated class in y ({class}) has only {count} member(s), \
         at least 2 are required"
    )]
    LeastPopulatedClass { class: usize, count: usize },

    #[error("{part} size {size} is smaller than the number of classes {classes}")]
    SplitTooSmall {
        part: &'static str,
        size: usize,
        classes: usize,
    },

    #[error("test_size must be in (0, 1), got {0}")]
    InvalidTestSize(f64),

    #[error("Feature column {column} contains an infinite value")]
    InfiniteValue { column: usize },

    #[error("Normalizer is not fitted")]
    NotFitted,

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PrepError>;
