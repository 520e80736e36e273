//! Чтение исходного CSV и запись выборок

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use linfa::Dataset;
use ndarray::Ix1;

use crate::error::Result;
use crate::types::{is_missing_token, PreparedSplit, RawTable};

/// Загружает CSV с заголовком.
/// Отсутствие файла или битая строка считаются фатальной ошибкой.
pub fn load_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(path.as_ref())?;
    let table = read_table(file)?;
    tracing::info!(
        path = %path.as_ref().display(),
        rows = table.n_rows(),
        columns = table.headers().len(),
        "Loaded raw table"
    );
    Ok(table)
}

pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|cell| {
                    if is_missing_token(cell) {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect(),
        );
    }

    RawTable::new(headers, rows)
}

/// Записывает обе выборки, перезаписывая существующие файлы
pub fn write_split<P: AsRef<Path>, Q: AsRef<Path>>(
    split: &PreparedSplit,
    train_path: P,
    test_path: Q,
) -> Result<()> {
    for (dataset, path) in [
        (&split.train, train_path.as_ref()),
        (&split.test, test_path.as_ref()),
    ] {
        let file = File::create(path)?;
        write_dataset(dataset, file)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.records().nrows(),
            features = dataset.records().ncols(),
            "Wrote split"
        );
    }
    Ok(())
}

/// Признаки через запятую, метка последней колонкой; без заголовка и индекса
pub fn write_dataset<W: Write>(dataset: &Dataset<f64, usize, Ix1>, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    let records = dataset.records();
    let targets = dataset.targets();
    let mut fields: Vec<String> = Vec::with_capacity(records.ncols() + 1);

    for (row, label) in records.rows().into_iter().zip(targets.iter()) {
        fields.clear();
        fields.extend(row.iter().map(|&v| format_value(v)));
        fields.push(label.to_string());
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}

/// Кратчайшее точное представление в стиле Python `repr`: `0.0`, `1.5`, `-1.2e-05`.
/// NaN записывается пустым полем.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = format!("{}", value);
    if formatted.contains('.') {
        formatted
    } else {
        formatted + ".0"
    }
}
