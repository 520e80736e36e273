//! Параметры конвейера подготовки данных

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// На какой части данных оценивать среднее и стандартное отклонение
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerFit {
    /// По всей таблице до разбиения (совместимо с исходными файлами)
    Combined,
    /// Только по обучающей части
    TrainOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_input_path")]
    pub input_path: String,
    #[serde(default = "default_train_path")]
    pub train_path: String,
    #[serde(default = "default_test_path")]
    pub test_path: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_target_column")]
    pub target_column: String,
    #[serde(default = "default_positive_label")]
    pub positive_label: String,
    #[serde(default = "default_negative_label")]
    pub negative_label: String,
    /// Текстовая колонка, которая приводится к числу; строки без значения удаляются
    #[serde(default = "default_coerce_column")]
    pub coerce_column: String,
    #[serde(default = "default_features")]
    pub features: Vec<String>,
    #[serde(default = "default_categorical")]
    pub categorical: Vec<String>,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_scaler_fit")]
    pub scaler_fit: ScalerFit,
}

fn default_input_path() -> String { "WA_Fn-UseC_-Telco-Customer-Churn.csv".to_string() }
fn default_train_path() -> String { "train_reducido.csv".to_string() }
fn default_test_path() -> String { "test_reducido.csv".to_string() }
fn default_id_column() -> String { "customerID".to_string() }
fn default_target_column() -> String { "Churn".to_string() }
fn default_positive_label() -> String { "Yes".to_string() }
fn default_negative_label() -> String { "No".to_string() }
fn default_coerce_column() -> String { "TotalCharges".to_string() }
fn default_test_size() -> f64 { 0.30 }
fn default_seed() -> u64 { 42 }
fn default_scaler_fit() -> ScalerFit { ScalerFit::Combined }

fn default_features() -> Vec<String> {
    [
        "tenure",
        "MonthlyCharges",
        "TotalCharges",
        "SeniorCitizen",
        "Contract",
        "InternetService",
        "OnlineSecurity",
        "TechSupport",
        "PaymentMethod",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_categorical() -> Vec<String> {
    [
        "Contract",
        "InternetService",
        "OnlineSecurity",
        "TechSupport",
        "PaymentMethod",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PrepError::InvalidTestSize(self.test_size));
        }
        if self.id_column == self.target_column {
            return Err(PrepError::Config(format!(
                "id column and target column are both {:?}",
                self.id_column
            )));
        }
        if self.positive_label == self.negative_label {
            return Err(PrepError::Config(format!(
                "positive and negative labels are both {:?}",
                self.positive_label
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            train_path: default_train_path(),
            test_path: default_test_path(),
            id_column: default_id_column(),
            target_column: default_target_column(),
            positive_label: default_positive_label(),
            negative_label: default_negative_label(),
            coerce_column: default_coerce_column(),
            features: default_features(),
            categorical: default_categorical(),
            test_size: default_test_size(),
            seed: default_seed(),
            scaler_fit: default_scaler_fit(),
        }
    }
}
