//! Очистка сырой таблицы

use ndarray::Array1;

use crate::error::{PrepError, Result};
use crate::types::RawTable;

/// Число из текстовой ячейки; NaN, бесконечность и мусор считаются пропуском
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub struct DataCleaner;

impl DataCleaner {
    /// Пробелы в именах колонок заменяются на `_`
    pub fn normalize_headers(table: &mut RawTable) {
        for header in table.headers_mut() {
            if header.contains(' ') {
                *header = header.replace(' ', "_");
            }
        }
    }

    /// Приводит колонку к числу и удаляет строки, где это не удалось.
    /// Возвращает число удалённых строк.
    pub fn coerce_numeric(table: &mut RawTable, column: &str) -> Result<usize> {
        let col = table.require_column(column)?;

        let parsed: Vec<Option<f64>> = table
            .column(col)
            .map(|cell| cell.and_then(parse_number))
            .collect();

        let keep: Vec<bool> = parsed.iter().map(Option::is_some).collect();
        for (row, value) in parsed.iter().enumerate() {
            if let Some(v) = value {
                table.set_cell(row, col, Some(v.to_string()));
            }
        }

        let before = table.n_rows();
        table.retain_rows(&keep);
        let dropped = before - table.n_rows();

        tracing::info!(column, dropped, remaining = table.n_rows(), "Coerced numeric column");
        Ok(dropped)
    }

    /// Бинарная метка из текстовой цели: `positive` → 1, `negative` → 0
    pub fn extract_labels(
        table: &RawTable,
        column: &str,
        positive: &str,
        negative: &str,
    ) -> Result<Array1<usize>> {
        let col = table.require_column(column)?;

        table
            .column(col)
            .enumerate()
            .map(|(row, cell)| match cell {
                Some(v) if v == positive => Ok(1),
                Some(v) if v == negative => Ok(0),
                other => Err(PrepError::InvalidLabel {
                    row,
                    value: other.unwrap_or_default().to_string(),
                }),
            })
            .collect::<Result<Vec<usize>>>()
            .map(Array1::from)
    }
}
