//! Нормализация данных

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, ArrayView1, ErrorKind, ShapeError};

use crate::error::{PrepError, Result};

/// Стандартизация по колонкам: (x - mean) / std.
/// Пропуски (NaN) не участвуют в оценке и остаются NaN после преобразования.
#[derive(Debug, Clone)]
pub struct DataNormalizer {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    is_fitted: bool,
}

/// Среднее, дисперсия (ddof = 0) и число значений без учёта NaN
fn nan_moments(column: ArrayView1<f64>) -> (f64, f64, usize) {
    let values: Vec<f64> = column.iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return (f64::NAN, f64::NAN, 0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance, values.len())
}

/// Колонка постоянна, если дисперсия не превышает ошибку округления при её вычислении
fn is_constant(mean: f64, variance: f64, n_samples: usize) -> bool {
    let n = n_samples as f64;
    let upper_bound = n * f64::EPSILON * variance + (n * mean * f64::EPSILON).powi(2);
    variance <= upper_bound
}

impl DataNormalizer {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PrepError::EmptyDataset);
        }

        if let Some(column) = X
            .columns()
            .into_iter()
            .position(|c| c.iter().any(|v| v.is_infinite()))
        {
            return Err(PrepError::InfiniteValue { column });
        }

        // Вычисляем среднее и стандартное отклонение по каждому признаку
        let mut mean = Vec::with_capacity(X.ncols());
        let mut std = Vec::with_capacity(X.ncols());
        for column in X.columns() {
            let (m, variance, n) = nan_moments(column);
            mean.push(m);
            // Избегаем деления на ноль
            std.push(if is_constant(m, variance, n) { 1.0 } else { variance.sqrt() });
        }

        self.mean = Some(Array1::from(mean));
        self.std = Some(Array1::from(std));
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PrepError::NotFitted);
        }

        let mean = self.mean.as_ref().ok_or(PrepError::NotFitted)?;
        let std = self.std.as_ref().ok_or(PrepError::NotFitted)?;
        if X.ncols() != mean.len() {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }

        // Нормализация: (X - mean) / std
        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / std[i];
            }
        }

        Ok(normalized)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn std(&self) -> Option<&Array1<f64>> {
        self.std.as_ref()
    }
}

impl Default for DataNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
