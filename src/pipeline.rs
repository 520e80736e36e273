//! Конвейер: очистка → отбор → кодирование → масштабирование → разбиение

use std::path::Path;

use linfa::{Dataset, DatasetBase};
use ndarray::{Axis, Ix1};

use crate::config::{PipelineConfig, ScalerFit};
use crate::error::Result;
use crate::io::{load_table, write_split};
use crate::preprocessing::{DataCleaner, DataNormalizer, FeatureEngineer};
use crate::split::StratifiedSplitter;
use crate::types::{PreparedSplit, RawTable, SplitSummary};

/// Готовит выборки из таблицы в памяти, без файлового ввода-вывода
pub fn prepare(mut table: RawTable, config: &PipelineConfig) -> Result<PreparedSplit> {
    config.validate()?;
    let rows_loaded = table.n_rows();

    DataCleaner::normalize_headers(&mut table);
    let rows_dropped = DataCleaner::coerce_numeric(&mut table, &config.coerce_column)?;
    table.drop_column(&config.id_column)?;

    let labels = DataCleaner::extract_labels(
        &table,
        &config.target_column,
        &config.positive_label,
        &config.negative_label,
    )?;
    table.drop_column(&config.target_column)?;

    let projection = FeatureEngineer::select_features(&table, &config.features);
    let encoded = FeatureEngineer::encode(&table, &projection, &config.categorical)?;

    let indices = StratifiedSplitter::new(config.test_size, config.seed).split(&labels)?;

    let mut normalizer = DataNormalizer::new();
    let scaled = match config.scaler_fit {
        ScalerFit::Combined => normalizer.fit_transform(&encoded.matrix)?,
        ScalerFit::TrainOnly => {
            normalizer.fit(&encoded.matrix.select(Axis(0), &indices.train))?;
            normalizer.transform(&encoded.matrix)?
        }
    };

    let train: Dataset<f64, usize, Ix1> = DatasetBase::new(
        scaled.select(Axis(0), &indices.train),
        labels.select(Axis(0), &indices.train),
    )
    .with_feature_names(encoded.names.clone());
    let test: Dataset<f64, usize, Ix1> = DatasetBase::new(
        scaled.select(Axis(0), &indices.test),
        labels.select(Axis(0), &indices.test),
    )
    .with_feature_names(encoded.names.clone());

    let summary = SplitSummary {
        rows_loaded,
        rows_dropped,
        train_rows: indices.train.len(),
        test_rows: indices.test.len(),
        n_features: encoded.names.len(),
        train_positive: train.targets().iter().filter(|&&l| l == 1).count(),
        test_positive: test.targets().iter().filter(|&&l| l == 1).count(),
        missing_features: projection.missing,
    };

    Ok(PreparedSplit {
        train,
        test,
        feature_names: encoded.names,
        summary,
    })
}

pub fn prepare_file<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<PreparedSplit> {
    let table = load_table(path)?;
    prepare(table, config)
}

/// Полный прогон: читает `input_path`, пишет `train_path` и `test_path`.
/// Файлы пишутся только после успешной подготовки.
pub fn run(config: &PipelineConfig) -> Result<SplitSummary> {
    let split = prepare_file(&config.input_path, config)?;
    write_split(&split, &config.train_path, &config.test_path)?;
    Ok(split.summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;

    const HEADERS: [&str; 6] = [
        "customerID",
        "tenure",
        "TotalCharges",
        "Contract",
        "Tech Support",
        "Churn",
    ];

    fn row(i: usize, churn: bool) -> Vec<String> {
        let contract = ["Month-to-month", "One year", "Two year"][i % 3];
        let support = ["No", "Yes"][i % 2];
        vec![
            format!("C{:03}", i),
            (i * 3 % 17).to_string(),
            format!("{}.5", 20 + i * 7),
            contract.to_string(),
            support.to_string(),
            if churn { "Yes" } else { "No" }.to_string(),
        ]
    }

    fn table(n: usize, positives: usize) -> RawTable {
        RawTable::from_text(&HEADERS, (0..n).map(|i| row(i, i % (n / positives) == 0))).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            features: ["tenure", "TotalCharges", "Contract", "Tech_Support"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            categorical: vec!["Contract".to_string(), "Tech_Support".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_shapes_and_names() {
        let split = prepare(table(20, 5), &config()).unwrap();

        assert_eq!(
            split.feature_names,
            vec![
                "tenure",
                "TotalCharges",
                "Contract_One year",
                "Contract_Two year",
                "Tech_Support_Yes"
            ]
        );
        assert_eq!(split.train.records().nrows() + split.test.records().nrows(), 20);
        assert_eq!(split.test.records().nrows(), 6);
        assert_eq!(split.train.records().ncols(), 5);
        assert_eq!(split.summary.train_positive + split.summary.test_positive, 5);
        assert_eq!(split.train.feature_names(), split.feature_names);
    }

    #[test]
    fn test_combined_scaling_has_zero_mean() {
        let split = prepare(table(30, 10), &config()).unwrap();
        let combined = ndarray::concatenate(
            Axis(0),
            &[split.train.records().view(), split.test.records().view()],
        )
        .unwrap();
        for column in combined.columns() {
            assert!(column.mean().unwrap().abs() < 1e-9);
            assert!((column.std(0.0) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_train_only_scaling_centers_train() {
        let config = PipelineConfig {
            scaler_fit: ScalerFit::TrainOnly,
            ..config()
        };
        let split = prepare(table(30, 10), &config).unwrap();
        for column in split.train.records().columns() {
            assert!(column.mean().unwrap().abs() < 1e-9);
        }
    }

    #[test]
    fn test_rows_with_blank_total_charges_are_dropped() {
        let mut rows: Vec<Vec<String>> = (0..12).map(|i| row(i, i % 3 == 0)).collect();
        rows[4][2] = " ".to_string();
        let table = RawTable::from_text(&HEADERS, rows).unwrap();

        let split = prepare(table, &config()).unwrap();
        assert_eq!(split.summary.rows_loaded, 12);
        assert_eq!(split.summary.rows_dropped, 1);
        assert_eq!(split.summary.train_rows + split.summary.test_rows, 11);
    }

    #[test]
    fn test_missing_optional_feature_only_narrows_output() {
        let full = prepare(table(20, 5), &config()).unwrap();

        let mut narrow_config = config();
        narrow_config.features.push("MonthlyCharges".to_string());
        let narrow = prepare(table(20, 5), &narrow_config).unwrap();
        assert_eq!(narrow.summary.missing_features, vec!["MonthlyCharges"]);
        assert_eq!(narrow.feature_names, full.feature_names);

        let mut without_contract = config();
        without_contract.features.retain(|f| f != "Contract");
        let reduced = prepare(table(20, 5), &without_contract).unwrap();
        assert_eq!(reduced.feature_names.len(), full.feature_names.len() - 2);
    }

    #[test]
    fn test_missing_required_columns_are_fatal() {
        let mut config = config();
        config.id_column = "customer_id".to_string();
        let err = prepare(table(20, 5), &config).err().unwrap();
        assert!(matches!(err, PrepError::MissingColumn(ref c) if c == "customer_id"));

        let mut config = self::config();
        config.target_column = "Exited".to_string();
        let err = prepare(table(20, 5), &config).err().unwrap();
        assert!(matches!(err, PrepError::MissingColumn(_)));
    }

    #[test]
    fn test_all_blank_coercion_column_fails() {
        let rows: Vec<Vec<String>> = (0..6)
            .map(|i| {
                let mut r = row(i, i % 2 == 0);
                r[2] = String::new();
                r
            })
            .collect();
        let table = RawTable::from_text(&HEADERS, rows).unwrap();
        let err = prepare(table, &config()).err().unwrap();
        assert!(matches!(err, PrepError::EmptyDataset));
    }
}
