/// Типы данных конвейера подготовки

use linfa::Dataset;
use ndarray::{Array2, Ix1};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Значения, которые при чтении считаются пропуском (как у pandas по умолчанию)
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Сырая таблица: заголовок и строки, пропуск хранится как `None`
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let expected = headers.len();
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != expected)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(PrepError::RaggedRow { row, expected, found });
        }
        Ok(Self { headers, rows })
    }

    /// Построение из текстовых ячеек; пропуски распознаются по `MISSING_TOKENS`
    pub fn from_text<H, R, C>(headers: &[H], rows: R) -> Result<Self>
    where
        H: AsRef<str>,
        R: IntoIterator<Item = Vec<C>>,
        C: AsRef<str>,
    {
        let headers = headers
            .iter()
            .map(|h| {
                let h: &str = h.as_ref();
                h.to_string()
            })
            .collect();
        let rows = rows
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let cell: &str = cell.as_ref();
                        if is_missing_token(cell) {
                            None
                        } else {
                            Some(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut [String] {
        &mut self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PrepError::MissingColumn(name.to_string()))
    }

    /// `None` и для пропуска, и для индекса за пределами таблицы
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |r| r.get(col).and_then(Option::as_deref))
    }

    pub(crate) fn set_cell(&mut self, row: usize, col: usize, value: Option<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        let col = self.require_column(name)?;
        self.headers.remove(col);
        for row in &mut self.rows {
            row.remove(col);
        }
        Ok(())
    }

    /// Оставляет строки, для которых `keep[i] == true`
    pub fn retain_rows(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.rows.retain(|_| flags.next().copied().unwrap_or(false));
    }
}

/// Результат «мягкой» проекции: что взяли и чего не нашли
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub kept: Vec<String>,
    pub missing: Vec<String>,
}

/// Числовая матрица признаков с именами колонок
#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    pub names: Vec<String>,
    pub matrix: Array2<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub n_features: usize,
    pub train_positive: usize,
    pub test_positive: usize,
    pub missing_features: Vec<String>,
}

/// Готовые выборки; цель: 1 = ушёл, 0 = остался
pub struct PreparedSplit {
    pub train: Dataset<f64, usize, Ix1>,
    pub test: Dataset<f64, usize, Ix1>,
    pub feature_names: Vec<String>,
    pub summary: SplitSummary,
}
