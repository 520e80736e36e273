//! Отбор признаков и one-hot кодирование категорий

use std::cmp::Ordering;
use std::collections::BTreeSet;

use ndarray::Array2;

use crate::error::{PrepError, Result};
use crate::types::{EncodedFeatures, Projection, RawTable};

pub struct FeatureEngineer;

impl FeatureEngineer {
    /// «Мягкая» проекция: берёт запрошенные колонки в запрошенном порядке,
    /// отсутствующие не считаются ошибкой, а возвращаются в `missing`.
    pub fn select_features(table: &RawTable, desired: &[String]) -> Projection {
        let mut projection = Projection::default();

        for name in desired {
            if projection.kept.contains(name) || projection.missing.contains(name) {
                continue;
            }
            if table.column_index(name).is_some() {
                projection.kept.push(name.clone());
            } else {
                tracing::warn!(column = %name, "Requested feature column is not present, skipping");
                projection.missing.push(name.clone());
            }
        }

        tracing::info!(
            kept = projection.kept.len(),
            missing = projection.missing.len(),
            "Selected feature columns"
        );
        projection
    }

    /// Числовые колонки идут первыми в порядке отбора, затем индикаторы категорий.
    /// Уровни категории сортируются, первый уровень отбрасывается как опорный.
    pub fn encode(
        table: &RawTable,
        projection: &Projection,
        categorical: &[String],
    ) -> Result<EncodedFeatures> {
        let n_rows = table.n_rows();
        let mut names: Vec<String> = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();

        // Числовые признаки
        for name in projection.kept.iter().filter(|n| !categorical.contains(*n)) {
            let col = table.require_column(name)?;
            let values = table
                .column(col)
                .enumerate()
                .map(|(row, cell)| match cell {
                    None => Ok(f64::NAN),
                    Some(text) => match text.trim().parse::<f64>() {
                        Ok(v) if v.is_finite() => Ok(v),
                        _ => Err(PrepError::NonNumeric {
                            column: name.clone(),
                            row,
                            value: text.to_string(),
                        }),
                    },
                })
                .collect::<Result<Vec<f64>>>()?;
            names.push(name.clone());
            columns.push(values);
        }

        // Категориальные признаки, в порядке списка категорий
        let mut seen: Vec<&String> = Vec::new();
        for name in categorical.iter().filter(|n| projection.kept.contains(*n)) {
            if seen.contains(&name) {
                continue;
            }
            seen.push(name);

            let col = table.require_column(name)?;
            let levels = sorted_levels(table.column(col).flatten());

            for level in levels.iter().skip(1) {
                names.push(format!("{}_{}", name, level));
                columns.push(
                    table
                        .column(col)
                        .map(|cell| if cell == Some(*level) { 1.0 } else { 0.0 })
                        .collect(),
                );
            }

            if levels.len() <= 1 {
                tracing::debug!(
                    column = %name,
                    "Categorical column has a single level, no indicators"
                );
            }
        }

        if columns.is_empty() {
            return Err(PrepError::NoFeatures);
        }

        let matrix = Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| columns[j][i]);
        tracing::info!(rows = n_rows, features = names.len(), "Encoded feature matrix");

        Ok(EncodedFeatures { names, matrix })
    }
}

/// Уникальные уровни категории. Если все уровни читаются как числа,
/// порядок числовой ("2" < "10"), иначе лексикографический.
fn sorted_levels<'a>(cells: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut levels: Vec<&str> = cells.collect::<BTreeSet<_>>().into_iter().collect();

    let as_number = |level: &str| level.trim().parse::<f64>().ok().filter(|v| !v.is_nan());
    if levels.iter().all(|l| as_number(*l).is_some()) {
        levels.sort_by(|a, b| match (as_number(*a), as_number(*b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal).then(a.cmp(b)),
            _ => a.cmp(b),
        });
    }
    levels
}
