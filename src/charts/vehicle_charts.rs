use super::preprocess::*;
use crate::models::*;
use std::collections::BTreeMap;
use tracing::debug;

fn vehicle_label(vehicle_id: u32) -> String {
    format!("Vehicle {}", vehicle_id)
}

/// Construye una serie por vehículo con el color asignado a cada uno.
fn per_vehicle<F>(algorithm: &Algorithm, mut compute: F) -> Result<Vec<Dataset>, ChartError>
where
    F: FnMut(u32) -> Result<Vec<DataValue>, ChartError>,
{
    algorithm.geojson.ensure_not_empty()?;

    vehicle_ids(&algorithm.geojson)?
        .into_iter()
        .map(|vehicle_id| -> Result<Dataset, ChartError> {
            let data = compute(vehicle_id)?;
            let color = color_of(&algorithm.geojson, vehicle_id);
            Ok(Dataset::line(vehicle_label(vehicle_id), data, color))
        })
        .collect()
}

/// Costo final de un vehículo recorriendo sus paradas en orden.
pub fn vehicle_cost(algorithm: &Algorithm, vehicle_id: u32) -> Result<f64, ChartError> {
    let mut cost = 0.0;
    let mut prev_time = 0;
    for stop in sorted_stops(&algorithm.geojson, vehicle_id)? {
        cost = incremental_cost(&algorithm.scenario, &stop, cost, prev_time)?;
        prev_time = stop.arrival()?.minutes();
    }
    Ok(cost)
}

/// Distancia total por vehículo, en km con un decimal.
pub fn distance_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| {
        let route = route_of(&algorithm.geojson, vehicle_id)?;
        Ok(vec![round_to(route.distance()? / 1000.0, 1).into()])
    })?;

    Ok(ChartData::labelled("Distance", datasets))
}

/// Número de paradas (ya fusionadas) por vehículo.
pub fn stop_count_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| {
        let stops = sorted_stops(&algorithm.geojson, vehicle_id)?;
        Ok(vec![(stops.len() as f64).into()])
    })?;

    Ok(ChartData::labelled("Stop Count", datasets))
}

/// Costo total por vehículo.
pub fn cost_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| Ok(vec![vehicle_cost(algorithm, vehicle_id)?.into()]))?;

    Ok(ChartData::labelled("Cost", datasets))
}

/// Paquetes entregados a lo largo del tiempo (x en horas).
pub fn packages_over_time_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| {
        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        for (count, delivery) in sorted_deliveries(&algorithm.geojson, Some(vehicle_id))?.iter().enumerate() {
            data.push(DataPoint::new(delivery.arrival()?.hours(), (count + 1) as f64).into());
        }
        Ok(data)
    })?;

    Ok(ChartData::unlabelled(datasets))
}

/// Distancia recorrida a lo largo del tiempo, cerrando con el total de la ruta.
pub fn distance_over_time_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| {
        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        for delivery in sorted_deliveries(&algorithm.geojson, Some(vehicle_id))? {
            data.push(DataPoint::new(delivery.arrival()?.hours(), delivery.distance()? / 1000.0).into());
        }

        let route = route_of(&algorithm.geojson, vehicle_id)?;
        let final_time = route.route_minutes()? as f64 / 60.0;
        data.push(DataPoint::new(final_time, route.distance()? / 1000.0).into());
        Ok(data)
    })?;

    Ok(ChartData::unlabelled(datasets))
}

/// Costo acumulado a lo largo del tiempo (x en horas).
pub fn cost_over_time_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    let datasets = per_vehicle(algorithm, |vehicle_id| {
        let mut data: Vec<DataValue> = vec![DataPoint::new(0.0, 0.0).into()];
        let mut cost = 0.0;
        let mut prev_time = 0;

        for stop in sorted_stops(&algorithm.geojson, vehicle_id)? {
            let arrival = stop.arrival()?;
            cost = incremental_cost(&algorithm.scenario, &stop, cost, prev_time)?;
            data.push(DataPoint::new(arrival.hours(), cost).into());
            prev_time = arrival.minutes();
        }
        Ok(data)
    })?;

    Ok(ChartData::unlabelled(datasets))
}

/// Minutos transcurridos entre entregas consecutivas de cada vehículo.
///
/// Las etiquetas van de 1 hasta el mayor número de entregas de una ruta.
pub fn all_packages_delivered_data(algorithm: &Algorithm) -> Result<ChartData, ChartError> {
    algorithm.geojson.ensure_not_empty()?;

    let mut datasets = Vec::new();
    for vehicle_id in vehicle_ids(&algorithm.geojson)? {
        let mut data = Vec::new();
        let mut total_prev = 0;
        for delivery in sorted_deliveries(&algorithm.geojson, Some(vehicle_id))? {
            let minutes = delivery.arrival()?.minutes();
            data.push(DataValue::Number(minutes as f64 - total_prev as f64));
            total_prev = minutes;
        }

        let color = color_of(&algorithm.geojson, vehicle_id);
        datasets.push(Dataset::filled(vehicle_label(vehicle_id), data, color));
    }

    let mut counts: BTreeMap<u32, usize> = algorithm
        .geojson
        .routes()
        .filter_map(|route| route.properties.number)
        .map(|number| (number, 0))
        .collect();
    for delivery in algorithm.geojson.features.iter().filter(|f| f.has_type("delivery")) {
        let route_number = delivery.properties.route_number.ok_or(ChartError::missing("route_number"))?;
        *counts.entry(route_number).or_default() += 1;
    }

    let highest = counts.values().copied().max().unwrap_or(0);
    debug!("Highest delivery count on a single route: {}", highest);

    let labels = (1..=highest).map(|i| i.to_string()).collect();
    Ok(ChartData::new(labels, datasets))
}

#[cfg(test)]
mod tests {
    use super::super::preprocess::test_helpers::*;
    use super::*;

    fn sample_algorithm() -> Algorithm {
        let mut end = stop(1, "end", 2, 0, (0.0, 0.0));
        end.properties.duration = Some(0.0);
        end.properties.distance = Some(12000.0);

        Algorithm {
            id: 1,
            name: "ORS".into(),
            geojson: RouteCollection::new(vec![
                stop(1, "start", 0, 0, (0.0, 0.0)),
                delivery(1, 0, 30, 4000.0),
                delivery(1, 1, 0, 7500.0),
                end,
                route(1, 12345.0, 2, 15, "#e6194b"),
                delivery(2, 0, 45, 3000.0),
                route(2, 6000.0, 1, 30, "#3cb44b"),
            ]),
            scenario: Scenario::with_costs(100.0, 50.0),
            vehicles: vec![VehicleRef { id: 0 }, VehicleRef { id: 1 }],
        }
    }

    #[test]
    fn test_distance_data() {
        let chart = distance_data(&sample_algorithm()).unwrap();
        assert_eq!(chart.labels, vec!["Distance"]);
        assert_eq!(chart.first_values(), vec![12.3, 6.0]);
        assert_eq!(chart.datasets[0].label, "Vehicle 1");
        assert_eq!(chart.datasets[0].background_color.as_deref(), Some("#e6194b"));
        assert_eq!(chart.datasets[1].border_color.as_deref(), Some("#3cb44b"));
    }

    #[test]
    fn test_distance_data_without_route() {
        let mut algorithm = sample_algorithm();
        algorithm.geojson.features.retain(|f| !(f.has_type("route") && f.properties.number == Some(2)));
        assert_eq!(distance_data(&algorithm), Err(ChartError::NoMatchingVehicle(2)));
    }

    #[test]
    fn test_empty_collection() {
        let mut algorithm = sample_algorithm();
        algorithm.geojson = RouteCollection::default();
        assert_eq!(cost_data(&algorithm), Err(ChartError::EmptyCollection));
    }

    #[test]
    fn test_stop_count_data() {
        let chart = stop_count_data(&sample_algorithm()).unwrap();
        assert_eq!(chart.first_values(), vec![3.0, 1.0]);
    }

    #[test]
    fn test_cost_data_equals_sum_of_increments() {
        let algorithm = sample_algorithm();
        let chart = cost_data(&algorithm).unwrap();

        let stops = sorted_stops(&algorithm.geojson, 1).unwrap();
        let mut prev_cost = 0.0;
        let mut prev_time = 0;
        let mut increments = 0.0;
        for stop in &stops {
            let cost = incremental_cost(&algorithm.scenario, stop, prev_cost, prev_time).unwrap();
            increments += cost - prev_cost;
            prev_cost = cost;
            prev_time = stop.arrival().unwrap().minutes();
        }

        assert!((chart.first_values()[0] - increments).abs() < 1e-9);
        // 120 minutos a 150 centavos más 2 minutos de paradas del conductor
        assert_eq!(chart.first_values()[0], 181.0);
    }

    #[test]
    fn test_packages_over_time_data() {
        let chart = packages_over_time_data(&sample_algorithm()).unwrap();
        assert!(chart.labels.is_empty());
        assert_eq!(
            chart.datasets[0].data,
            vec![point(0.0, 0.0), point(0.5, 1.0), point(1.0, 2.0)]
        );
    }

    #[test]
    fn test_distance_over_time_ends_with_route_totals() {
        let chart = distance_over_time_data(&sample_algorithm()).unwrap();
        let data = &chart.datasets[0].data;
        assert_eq!(data.len(), 4);
        assert_eq!(data[1], point(0.5, 4.0));
        assert_eq!(data[3], point(2.25, 12.345));
    }

    #[test]
    fn test_cost_over_time_data() {
        let chart = cost_over_time_data(&sample_algorithm()).unwrap();
        let data = &chart.datasets[1].data;
        // 45 minutos a 150 centavos más 1 minuto de parada a 50 centavos
        assert_eq!(data, &vec![point(0.0, 0.0), point(0.75, 68.0)]);
    }

    #[test]
    fn test_all_packages_delivered_data() {
        let chart = all_packages_delivered_data(&sample_algorithm()).unwrap();
        assert_eq!(chart.labels, vec!["1", "2"]);
        assert_eq!(chart.datasets[0].data, vec![DataValue::Number(30.0), DataValue::Number(30.0)]);
        assert_eq!(chart.datasets[1].data, vec![DataValue::Number(45.0)]);
        assert_eq!(chart.datasets[0].fill, None);
    }
}
