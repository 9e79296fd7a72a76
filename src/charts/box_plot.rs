use super::preprocess::*;
use super::vehicle_charts::vehicle_cost;
use crate::models::*;
use tracing::debug;

/// Construye un diagrama de caja con una serie por algoritmo.
///
/// Cada ejecución del algoritmo aporta una muestra: la suma de `per_vehicle` sobre
/// todos sus vehículos.
pub fn box_plot_data<F>(run_sets: &[RunSet], name: &str, per_vehicle: F) -> Result<ChartData, ChartError>
where
    F: Fn(&Algorithm, u32) -> Result<f64, ChartError>,
{
    let mut datasets = Vec::new();

    for (run_set, color_index) in run_sets.iter().zip(1u32..) {
        let first = run_set.runs.first().ok_or(ChartError::EmptyCollection)?;

        let samples = run_set
            .runs
            .iter()
            .map(|run| run_total(run, &per_vehicle))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("{} ({}): {:?}", name, run_set.name, samples);
        let color = color_of(&first.geojson, color_index);
        datasets.push(Dataset::filled(&run_set.name, vec![DataValue::Samples(samples)], color));
    }

    Ok(ChartData::labelled(name, datasets))
}

fn run_total<F>(run: &Algorithm, per_vehicle: &F) -> Result<f64, ChartError>
where
    F: Fn(&Algorithm, u32) -> Result<f64, ChartError>,
{
    run.geojson.ensure_not_empty()?;

    let mut total = 0.0;
    for vehicle_id in vehicle_ids(&run.geojson)? {
        total += per_vehicle(run, vehicle_id)?;
    }
    Ok(round_to(total, 2))
}

fn last_delivery(run: &Algorithm, vehicle_id: u32) -> Result<RouteFeature, ChartError> {
    sorted_deliveries(&run.geojson, Some(vehicle_id))?
        .pop()
        .ok_or(ChartError::NoMatchingVehicle(vehicle_id))
}

/// Distancia total (km) hasta la última entrega de cada vehículo.
pub fn total_distance_box_plot_data(run_sets: &[RunSet]) -> Result<ChartData, ChartError> {
    box_plot_data(run_sets, "Total distance in km", |run, vehicle_id| {
        Ok(round_to(last_delivery(run, vehicle_id)?.distance()? / 1000.0, 1))
    })
}

/// Tiempo total (minutos) hasta la última entrega de cada vehículo.
pub fn total_time_box_plot_data(run_sets: &[RunSet]) -> Result<ChartData, ChartError> {
    box_plot_data(run_sets, "Total time in minutes", |run, vehicle_id| {
        Ok(last_delivery(run, vehicle_id)?.arrival()?.minutes() as f64)
    })
}

/// Costo total de cada vehículo.
pub fn total_costs_box_plot_data(run_sets: &[RunSet]) -> Result<ChartData, ChartError> {
    box_plot_data(run_sets, "Total cost in euro's", vehicle_cost)
}
