//! Стратифицированное разбиение на обучающую и тестовую выборки

use std::cmp::Ordering;
use std::collections::BTreeMap;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{PrepError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Раскладывает `n_draws` по классам пропорционально их размерам.
/// Остаток раздаётся классам с наибольшей дробной частью, при равных долях выбор случаен.
pub fn approximate_mode(
    class_counts: &[usize],
    n_draws: usize,
    rng: &mut StdRng,
) -> Vec<usize> {
    let total: usize = class_counts.iter().sum();
    if total == 0 {
        return vec![0; class_counts.len()];
    }

    let continuous: Vec<f64> = class_counts
        .iter()
        .map(|&c| c as f64 / total as f64 * n_draws as f64)
        .collect();
    let mut floored: Vec<usize> = continuous.iter().map(|v| v.floor() as usize).collect();
    let mut need_to_add = n_draws.saturating_sub(floored.iter().sum());

    if need_to_add > 0 {
        let remainder: Vec<f64> = continuous
            .iter()
            .zip(&floored)
            .map(|(c, &f)| c - f as f64)
            .collect();

        let mut values = remainder.clone();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        values.dedup();

        for value in values {
            let inds: Vec<usize> = (0..remainder.len())
                .filter(|&i| remainder[i] == value)
                .collect();
            let add_now = inds.len().min(need_to_add);
            for &i in inds.choose_multiple(rng, add_now) {
                floored[i] += 1;
            }
            need_to_add -= add_now;
            if need_to_add == 0 {
                break;
            }
        }
    }

    floored
}

pub struct StratifiedSplitter {
    test_size: f64,
    seed: u64,
}

impl StratifiedSplitter {
    pub fn new(test_size: f64, seed: u64) -> Self {
        Self { test_size, seed }
    }

    /// Непересекающиеся индексы train/test с сохранением долей классов.
    /// Одинаковые seed и порядок входа всегда дают одно и то же разбиение.
    pub fn split(&self, y: &Array1<usize>) -> Result<SplitIndices> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PrepError::InvalidTestSize(self.test_size));
        }

        let n_samples = y.len();
        if n_samples == 0 {
            return Err(PrepError::EmptyDataset);
        }

        let n_test = (self.test_size * n_samples as f64).ceil() as usize;
        let n_train = n_samples - n_test;

        // Индексы по классам в порядке возрастания метки
        let mut class_indices: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, &label) in y.iter().enumerate() {
            class_indices.entry(label).or_default().push(i);
        }
        let n_classes = class_indices.len();

        if let Some((&class, indices)) = class_indices.iter().min_by_key(|(_, v)| v.len()) {
            if indices.len() < 2 {
                return Err(PrepError::LeastPopulatedClass {
                    class,
                    count: indices.len(),
                });
            }
        }
        if n_train < n_classes {
            return Err(PrepError::SplitTooSmall {
                part: "train",
                size: n_train,
                classes: n_classes,
            });
        }
        if n_test < n_classes {
            return Err(PrepError::SplitTooSmall {
                part: "test",
                size: n_test,
                classes: n_classes,
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);

        let class_counts: Vec<usize> = class_indices.values().map(Vec::len).collect();
        let n_i = approximate_mode(&class_counts, n_train, &mut rng);
        let remaining: Vec<usize> = class_counts.iter().zip(&n_i).map(|(c, n)| c - n).collect();
        let t_i = approximate_mode(&remaining, n_test, &mut rng);

        let mut train = Vec::with_capacity(n_train);
        let mut test = Vec::with_capacity(n_test);
        for (k, indices) in class_indices.values().enumerate() {
            let mut permuted = indices.clone();
            permuted.shuffle(&mut rng);
            train.extend_from_slice(&permuted[..n_i[k]]);
            test.extend_from_slice(&permuted[n_i[k]..n_i[k] + t_i[k]]);
        }

        train.shuffle(&mut rng);
        test.shuffle(&mut rng);

        tracing::info!(
            train = train.len(),
            test = test.len(),
            classes = n_classes,
            seed = self.seed,
            "Stratified split"
        );

        Ok(SplitIndices { train, test })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(negatives: usize, positives: usize) -> Array1<usize> {
        // Чередуем классы, чтобы порядок не совпадал с сортировкой
        let mut y = Vec::new();
        let (mut n, mut p) = (negatives, positives);
        while n + p > 0 {
            if n > 0 {
                y.push(0);
                n -= 1;
            }
            if p > 0 {
                y.push(1);
                p -= 1;
            }
        }
        Array1::from(y)
    }

    fn positives(y: &Array1<usize>, indices: &[usize]) -> usize {
        indices.iter().filter(|&&i| y[i] == 1).count()
    }

    #[test]
    fn test_ten_rows_three_positive() {
        let y = labels(7, 3);
        let split = StratifiedSplitter::new(0.30, 42).split(&y).unwrap();

        assert_eq!(split.train.len(), 7);
        assert_eq!(split.test.len(), 3);
        assert_eq!(positives(&y, &split.train), 2);
        assert_eq!(positives(&y, &split.test), 1);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let y = labels(700, 333);
        let split = StratifiedSplitter::new(0.30, 42).split(&y).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..y.len()).collect::<Vec<_>>());
        assert_eq!(split.test.len(), (0.30 * y.len() as f64).ceil() as usize);
    }

    #[test]
    fn test_class_proportions_preserved() {
        let y = labels(5174, 1869);
        let split = StratifiedSplitter::new(0.30, 42).split(&y).unwrap();

        let overall = 1869.0 / y.len() as f64;
        for part in [&split.train, &split.test] {
            let expected = overall * part.len() as f64;
            let actual = positives(&y, part) as f64;
            assert!((actual - expected).abs() <= 1.0, "{} vs {}", actual, expected);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let y = labels(40, 17);
        let a = StratifiedSplitter::new(0.30, 42).split(&y).unwrap();
        let b = StratifiedSplitter::new(0.30, 42).split(&y).unwrap();
        assert_eq!(a, b);

        let c = StratifiedSplitter::new(0.30, 7).split(&y).unwrap();
        assert_eq!(c.train.len(), a.train.len());
    }

    #[test]
    fn test_least_populated_class() {
        let y = labels(9, 1);
        let err = StratifiedSplitter::new(0.30, 42).split(&y).unwrap_err();
        assert!(matches!(err, PrepError::LeastPopulatedClass { class: 1, count: 1 }));
    }

    #[test]
    fn test_too_small_and_empty() {
        let y = labels(2, 2);
        let err = StratifiedSplitter::new(0.9, 42).split(&y).unwrap_err();
        assert!(matches!(err, PrepError::SplitTooSmall { part: "train", .. }));

        let empty = Array1::<usize>::zeros(0);
        let err = StratifiedSplitter::new(0.30, 42).split(&empty).unwrap_err();
        assert!(matches!(err, PrepError::EmptyDataset));
    }

    #[test]
    fn test_approximate_mode_largest_remainder() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(approximate_mode(&[7, 3], 7, &mut rng), vec![5, 2]);
        assert_eq!(approximate_mode(&[2, 1], 3, &mut rng), vec![2, 1]);

        // Равные остатки: ровно одна единица достаётся одному из классов
        let drawn = approximate_mode(&[1, 1], 1, &mut rng);
        assert_eq!(drawn.iter().sum::<usize>(), 1);
    }
}
