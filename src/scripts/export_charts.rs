use route_charts::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

// Manejo de errores personalizado
#[derive(Debug, thiserror::Error)]
enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

#[instrument(skip(chart))]
fn write_chart<T: Serialize>(output_path: &Path, chart: Result<T, ChartError>) -> Result<(), ExportError> {
    let chart = chart?;

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, &chart)?;

    info!("Chart written to {}", output_path.display());
    Ok(())
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn export_all(loader: &DataLoader, output_dir: &Path) -> Vec<(PathBuf, Result<(), ExportError>)> {
    let mut results = Vec::new();
    let mut export = |name: String, result: Result<(), ExportError>| {
        results.push((output_dir.join(name), result));
    };

    for algorithm in loader.algorithms() {
        let dir = output_dir.join(slug(&algorithm.name));
        let charts: Vec<(&str, Result<ChartData, ChartError>)> = vec![
            ("distance.json", distance_data(algorithm)),
            ("stop_count.json", stop_count_data(algorithm)),
            ("cost.json", cost_data(algorithm)),
            ("packages_over_time.json", packages_over_time_data(algorithm)),
            ("distance_over_time.json", distance_over_time_data(algorithm)),
            ("cost_over_time.json", cost_over_time_data(algorithm)),
            ("all_packages_delivered.json", all_packages_delivered_data(algorithm)),
        ];
        for (file, chart) in charts {
            let path = dir.join(file);
            export(format!("{}/{}", slug(&algorithm.name), file), write_chart(&path, chart));
        }
    }

    let algorithms = loader.algorithms();
    let pairs: Vec<(&str, Result<[ChartData; 2], ChartError>)> = vec![
        ("cost_and_idle_time.json", cost_and_idle_time_data(algorithms)),
        ("distance_and_time.json", distance_and_time_data(algorithms)),
    ];
    for (file, chart) in pairs {
        export(format!("comparison/{}", file), write_chart(&output_dir.join("comparison").join(file), chart));
    }

    let comparisons: Vec<(&str, Result<ChartData, ChartError>)> = vec![
        ("packages_over_time.json", packages_over_time_comparison_data(algorithms)),
        ("distance_over_time.json", distance_over_time_comparison_data(algorithms)),
        ("cost_over_time.json", cost_over_time_comparison_data(algorithms)),
        ("total_distance_box_plot.json", total_distance_box_plot_data(loader.run_sets())),
        ("total_time_box_plot.json", total_time_box_plot_data(loader.run_sets())),
        ("total_costs_box_plot.json", total_costs_box_plot_data(loader.run_sets())),
    ];
    for (file, chart) in comparisons {
        export(format!("comparison/{}", file), write_chart(&output_dir.join("comparison").join(file), chart));
    }

    if !loader.depot_groups().is_empty() {
        let groups = Ok(loader.depot_groups().to_vec());
        export("depots.json".into(), write_chart(&output_dir.join("depots.json"), groups));
    }

    results
}

fn main() {
    // Inicializar el sistema de logging
    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return;
        }
    };

    let mut loader = DataLoader::new(&config.data_dir);
    if let Err(e) = loader.load_all(&config) {
        error!("Failed to load data from {}: {}", config.data_dir.display(), e);
        return;
    }

    let results = export_all(&loader, &config.output_dir);

    // Reportar resultados
    let mut success_count = 0;
    let mut error_count = 0;

    for (path, result) in &results {
        match result {
            Ok(_) => success_count += 1,
            Err(e) => {
                error_count += 1;
                error!("Failed to export {}: {}", path.display(), e);
            }
        }
    }

    info!("Export finished. Succeeded: {}, failed: {}", success_count, error_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Almende Rollout"), "almende_rollout");
    }

    #[test]
    fn test_write_chart() -> Result<(), ExportError> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("chart.json");

        write_chart(&path, Ok(ChartData::labelled("Cost", Vec::new())))?;

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(written["labels"][0], "Cost");
        Ok(())
    }

    #[test]
    fn test_write_chart_propagates_chart_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.json");

        let result = write_chart::<ChartData>(&path, Err(ChartError::EmptyCollection));
        assert!(matches!(result, Err(ExportError::Chart(ChartError::EmptyCollection))));
        assert!(!path.exists());
    }
}
