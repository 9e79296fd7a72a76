use super::preprocess::*;
use super::vehicle_charts::cost_data;
use crate::models::*;
use std::collections::BTreeMap;
use tracing::debug;

/// Recorre los algoritmos con un índice de color que empieza en 1.
///
/// En las vistas de comparación cada algoritmo toma el color del vehículo cuyo id
/// coincide con su posición.
fn with_colors<'a>(algorithms: &'a [Algorithm]) -> impl Iterator<Item = (&'a Algorithm, Option<String>)> + 'a {
    algorithms
        .iter()
        .zip(1u32..)
        .map(|(algorithm, color_index)| (algorithm, color_of(&algorithm.geojson, color_index)))
}

/// Costo total e inactividad de cada algoritmo: `[Cost, Idle Time]`.
pub fn cost_and_idle_time_data(algorithms: &[Algorithm]) -> Result<[ChartData; 2], ChartError> {
    let mut cost_datasets = Vec::new();
    let mut idle_time_datasets = Vec::new();

    for (algorithm, color) in with_colors(algorithms) {
        let idle = idle_time(algorithm)?;
        let cost: f64 = cost_data(algorithm)?.first_values().iter().sum();

        debug!("{}: cost {} idle time {}", algorithm.name, cost, idle);
        cost_datasets.push(Dataset::filled(&algorithm.name, vec![round_to(cost, 1).into()], color.clone()));
        idle_time_datasets.push(Dataset::filled(&algorithm.name, vec![idle.into()], color));
    }

    Ok([
        ChartData::labelled("Cost", cost_datasets),
        ChartData::labelled("Idle Time", idle_time_datasets),
    ])
}

/// Minutos de inactividad: duración de las paradas más la espera antes de cada fin de ruta.
///
/// La cuenta empieza en la primera parada de cada vehículo; el tiempo hasta ella no se
/// considera inactivo para ningún algoritmo.
pub fn idle_time(algorithm: &Algorithm) -> Result<f64, ChartError> {
    algorithm.geojson.ensure_not_empty()?;

    let mut time = 0.0;
    for vehicle_id in vehicle_ids(&algorithm.geojson)? {
        let mut prev = 0;
        for stop in sorted_stops(&algorithm.geojson, vehicle_id)? {
            let minutes = stop.arrival()?.minutes();
            time += stop.duration()?;
            if stop.is_end() {
                time += minutes as f64 - prev as f64;
            }
            prev = minutes;
        }
    }
    Ok(time)
}

/// Distancia (km) y tiempo (minutos) totales de las rutas: `[Distance, Time]`.
pub fn distance_and_time_data(algorithms: &[Algorithm]) -> Result<[ChartData; 2], ChartError> {
    let mut distance_datasets = Vec::new();
    let mut time_datasets = Vec::new();

    for (algorithm, color) in with_colors(algorithms) {
        algorithm.geojson.ensure_not_empty()?;

        let mut distance = 0.0;
        let mut time = 0;
        for route in algorithm.geojson.routes() {
            distance += route.distance()?;
            time += route.route_minutes()?;
        }

        distance_datasets.push(Dataset::filled(
            &algorithm.name,
            vec![round_to(distance / 1000.0, 1).into()],
            color.clone(),
        ));
        time_datasets.push(Dataset::filled(&algorithm.name, vec![(time as f64).into()], color));
    }

    Ok([
        ChartData::labelled("Distance", distance_datasets),
        ChartData::labelled("Time", time_datasets),
    ])
}

/// Paquetes entregados por cada algoritmo a lo largo del tiempo (x en minutos).
pub fn packages_over_time_comparison_data(algorithms: &[Algorithm]) -> Result<ChartData, ChartError> {
    let mut datasets = Vec::new();

    for (algorithm, color) in with_colors(algorithms) {
        algorithm.geojson.ensure_not_empty()?;

        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        for (count, delivery) in sorted_deliveries(&algorithm.geojson, None)?.iter().enumerate() {
            let minutes = delivery.arrival()?.minutes() as f64;
            data.push(DataPoint::new(minutes, (count + 1) as f64).into());
        }

        datasets.push(Dataset::comparison(&algorithm.name, data, color));
    }

    Ok(ChartData::unlabelled(datasets))
}

/// Distancia total recorrida por la flota de cada algoritmo a lo largo del tiempo.
///
/// Los vehículos del algoritmo se numeran desde 1 en el GeoJSON (`id + 1`).
pub fn distance_over_time_comparison_data(algorithms: &[Algorithm]) -> Result<ChartData, ChartError> {
    let mut datasets = Vec::new();

    for (algorithm, color) in with_colors(algorithms) {
        algorithm.geojson.ensure_not_empty()?;

        let mut prev_distances: BTreeMap<u32, f64> =
            algorithm.vehicles.iter().map(|vehicle| (vehicle.id + 1, 0.0)).collect();

        let events = algorithm
            .geojson
            .features
            .iter()
            .filter(|feature| feature.is_delivery() || feature.is_end())
            .cloned()
            .collect();

        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        let mut total_prev = 0.0;

        for event in sort_by_arrival(events)? {
            let vehicle_id = event.properties.vehicle.ok_or(ChartError::missing("vehicle"))?;
            let prev_distance = prev_distances
                .get_mut(&vehicle_id)
                .ok_or(ChartError::NoMatchingVehicle(vehicle_id))?;

            let distance = event.distance()?;
            let new_distance = distance - *prev_distance + total_prev;
            *prev_distance = distance;
            total_prev = new_distance;

            let minutes = event.arrival()?.minutes() as f64;
            data.push(DataPoint::new(minutes, round_to(new_distance / 1000.0, 1)).into());
        }

        datasets.push(Dataset::comparison(&algorithm.name, data, color));
    }

    Ok(ChartData::unlabelled(datasets))
}

/// Costo acumulado de la flota de cada algoritmo a lo largo del tiempo (x en minutos).
pub fn cost_over_time_comparison_data(algorithms: &[Algorithm]) -> Result<ChartData, ChartError> {
    let mut datasets = Vec::new();

    for (algorithm, color) in with_colors(algorithms) {
        algorithm.geojson.ensure_not_empty()?;

        let mut stops = Vec::new();
        for vehicle_id in vehicle_ids(&algorithm.geojson)? {
            stops.extend(sorted_stops(&algorithm.geojson, vehicle_id)?);
        }

        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        let mut total_cost = 0.0;
        let mut prev_time = 0;

        for stop in sort_by_arrival(stops)? {
            total_cost += incremental_cost(&algorithm.scenario, &stop, 0.0, prev_time)?;
            prev_time = stop.arrival()?.minutes();
            data.push(DataPoint::new(prev_time as f64, round_to(total_cost, 2)).into());
        }

        datasets.push(Dataset::comparison(&algorithm.name, data, color));
    }

    Ok(ChartData::unlabelled(datasets))
}

#[cfg(test)]
mod tests {
    use super::super::preprocess::test_helpers::*;
    use super::*;

    fn algorithm(id: u32, name: &str, features: Vec<RouteFeature>) -> Algorithm {
        Algorithm {
            id,
            name: name.into(),
            geojson: RouteCollection::new(features),
            scenario: Scenario::with_costs(100.0, 50.0),
            vehicles: vec![VehicleRef { id: 0 }, VehicleRef { id: 1 }],
        }
    }

    fn ors() -> Algorithm {
        let mut end = stop(1, "end", 1, 30, (0.0, 0.0));
        end.properties.duration = Some(0.0);
        end.properties.distance = Some(9000.0);

        algorithm(
            1,
            "ORS",
            vec![
                stop(1, "start", 0, 0, (0.0, 0.0)),
                delivery(1, 0, 20, 2000.0),
                delivery(2, 0, 10, 1500.0),
                delivery(1, 1, 0, 5000.0),
                end,
                route(1, 9000.0, 1, 30, "#e6194b"),
                route(2, 1500.0, 0, 10, "#3cb44b"),
            ],
        )
    }

    fn almende() -> Algorithm {
        algorithm(
            2,
            "Almende",
            vec![
                delivery(1, 0, 40, 3000.0),
                delivery(2, 0, 50, 4000.0),
                route(1, 3000.0, 0, 40, "#4363d8"),
                route(2, 4000.0, 0, 50, "#f58231"),
            ],
        )
    }

    #[test]
    fn test_colors_follow_algorithm_position() {
        let chart = packages_over_time_comparison_data(&[ors(), almende()]).unwrap();
        assert_eq!(chart.datasets[0].background_color.as_deref(), Some("#e6194b"));
        assert_eq!(chart.datasets[1].background_color.as_deref(), Some("#f58231"));
        assert_eq!(chart.datasets[1].show_line, Some(true));
    }

    #[test]
    fn test_packages_over_time_comparison_pools_vehicles() {
        let chart = packages_over_time_comparison_data(&[ors()]).unwrap();
        assert_eq!(
            chart.datasets[0].data,
            vec![point(0.0, 0.0), point(10.0, 1.0), point(20.0, 2.0), point(60.0, 3.0)]
        );
    }

    #[test]
    fn test_distance_over_time_comparison() {
        let chart = distance_over_time_comparison_data(&[ors()]).unwrap();
        // 1.5 km del vehículo 2, luego 2 + 3 + 4 km del vehículo 1
        assert_eq!(
            chart.datasets[0].data,
            vec![
                point(0.0, 0.0),
                point(10.0, 1.5),
                point(20.0, 3.5),
                point(60.0, 6.5),
                point(90.0, 10.5),
            ]
        );
    }

    #[test]
    fn test_distance_over_time_comparison_unknown_vehicle() {
        let mut alg = ors();
        alg.vehicles = vec![VehicleRef { id: 0 }];
        assert_eq!(distance_over_time_comparison_data(&[alg]), Err(ChartError::NoMatchingVehicle(2)));
    }

    #[test]
    fn test_cost_over_time_comparison() {
        let chart = cost_over_time_comparison_data(&[ors()]).unwrap();
        let data = &chart.datasets[0].data;
        assert_eq!(data.len(), 5);
        // 10 minutos a 150 centavos más 1 minuto de parada
        assert_eq!(data[1], point(10.0, 15.5));
        assert_eq!(data[4], point(90.0, 136.5));
    }

    #[test]
    fn test_cost_and_idle_time_data() {
        let [cost, idle] = cost_and_idle_time_data(&[ors(), almende()]).unwrap();
        assert_eq!(cost.labels, vec!["Cost"]);
        assert_eq!(idle.labels, vec!["Idle Time"]);
        assert_eq!(cost.first_values(), vec![151.5, 136.0]);
        // Vehículo 1: 2 paradas + 30 minutos de espera antes del fin; vehículo 2: 1 parada
        assert_eq!(idle.first_values(), vec![33.0, 2.0]);
    }

    #[test]
    fn test_distance_and_time_data() {
        let [distance, time] = distance_and_time_data(&[ors(), almende()]).unwrap();
        assert_eq!(distance.first_values(), vec![10.5, 7.0]);
        assert_eq!(time.first_values(), vec![100.0, 90.0]);
        assert_eq!(time.datasets[0].label, "ORS");
    }

    #[test]
    fn test_end_recognised_by_name() {
        let mut alg = ors();
        for feature in alg.geojson.features.iter_mut().filter(|f| f.has_type("end")) {
            feature.properties.name = Some("end".into());
            feature.properties.r#type = Some("stop".into());
        }

        assert_eq!(idle_time(&alg).unwrap(), 33.0);
        let chart = distance_over_time_comparison_data(&[alg]).unwrap();
        assert_eq!(chart.datasets[0].data.last(), Some(&point(90.0, 10.5)));
    }

    #[test]
    fn test_empty_algorithm_is_rejected() {
        let empty = algorithm(3, "Empty", Vec::new());
        assert_eq!(cost_over_time_comparison_data(&[ors(), empty]), Err(ChartError::EmptyCollection));
    }
}
