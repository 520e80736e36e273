/// Генерация train_reducido.csv и test_reducido.csv из исходного датасета

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use churn_prep::PipelineConfig;

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("churn_prep=info")),
        )
        .init();

    let config = PipelineConfig::default();
    tracing::info!(input = %config.input_path, "Preparing churn dataset");

    let summary = churn_prep::run(&config)
        .with_context(|| format!("Failed to prepare dataset from {}", config.input_path))?;

    let report = serde_json::to_string(&summary)?;
    tracing::info!(
        summary = %report,
        "Files generated: {} ({} rows), {} ({} rows), {} features + label",
        config.train_path,
        summary.train_rows,
        config.test_path,
        summary.test_rows,
        summary.n_features
    );

    Ok(())
}
