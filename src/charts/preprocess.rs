use crate::models::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Compara dos features por hora de llegada (hora y luego minuto).
pub fn compare_by_arrival(a: &RouteFeature, b: &RouteFeature) -> Result<Ordering, ChartError> {
    Ok(a.arrival()?.cmp(&b.arrival()?))
}

/// Ordena los features por llegada. El orden es estable para llegadas iguales.
pub fn sort_by_arrival(features: Vec<RouteFeature>) -> Result<Vec<RouteFeature>, ChartError> {
    let mut keyed = features
        .into_iter()
        .map(|feature| -> Result<_, ChartError> { Ok((feature.arrival()?, feature)) })
        .collect::<Result<Vec<_>, ChartError>>()?;

    keyed.sort_by_key(|(arrival, _)| *arrival);

    Ok(keyed.into_iter().map(|(_, feature)| feature).collect())
}

/// Ids de los vehículos que tienen al menos una entrega.
pub fn vehicle_ids(collection: &RouteCollection) -> Result<BTreeSet<u32>, ChartError> {
    collection
        .features
        .iter()
        .filter(|feature| feature.is_delivery())
        .map(|feature| feature.properties.vehicle.ok_or(ChartError::missing("vehicle")))
        .collect()
}

/// Entregas ordenadas por llegada, de un vehículo o de todos si no se indica ninguno.
pub fn sorted_deliveries(
    collection: &RouteCollection,
    vehicle_id: Option<u32>,
) -> Result<Vec<RouteFeature>, ChartError> {
    let deliveries = collection
        .features
        .iter()
        .filter(|feature| feature.is_delivery())
        .filter(|feature| vehicle_id.is_none() || feature.properties.vehicle == vehicle_id)
        .cloned()
        .collect();

    sort_by_arrival(deliveries)
}

/// Paradas de un vehículo ordenadas por llegada, sin el inicio.
///
/// Las paradas consecutivas en las mismas coordenadas se fusionan en una sola cuya
/// duración es la suma; el resto de propiedades son las de la primera parada.
pub fn sorted_stops(collection: &RouteCollection, vehicle_id: u32) -> Result<Vec<RouteFeature>, ChartError> {
    let stops = collection
        .features
        .iter()
        .filter(|feature| {
            feature.is_point() && !feature.has_type("start") && feature.properties.vehicle == Some(vehicle_id)
        })
        .cloned()
        .collect();

    let stops = merge_stops(sort_by_arrival(stops)?)?;
    debug!("Vehicle {} has {} stops", vehicle_id, stops.len());
    Ok(stops)
}

/// Fusiona paradas consecutivas con las mismas coordenadas. Conserva el orden de entrada.
pub fn merge_stops(stops: Vec<RouteFeature>) -> Result<Vec<RouteFeature>, ChartError> {
    let mut merged: Vec<RouteFeature> = Vec::with_capacity(stops.len());

    for stop in stops {
        match merged.last_mut() {
            Some(prev) if prev.same_location(&stop) => {
                let duration = prev.duration()? + stop.duration()?;
                prev.properties.duration = Some(duration);
            }
            _ => merged.push(stop),
        }
    }

    Ok(merged)
}

/// Color asignado a un vehículo, tomado del primer feature con estilo.
pub fn color_of(collection: &RouteCollection, vehicle_id: u32) -> Option<String> {
    collection
        .features
        .iter()
        .filter(|feature| feature.vehicle_id() == Some(vehicle_id) && !feature.has_type("start"))
        .find_map(|feature| feature.properties.style.as_ref())
        .and_then(|style| style.color.clone())
}

/// Feature de tipo "route" del vehículo.
pub fn route_of(collection: &RouteCollection, vehicle_id: u32) -> Result<&RouteFeature, ChartError> {
    collection
        .routes()
        .find(|route| route.properties.number == Some(vehicle_id))
        .ok_or(ChartError::NoMatchingVehicle(vehicle_id))
}

/// Costo acumulado después de llegar a `stop`.
///
/// El tiempo desde el evento anterior se cobra a la tarifa del vehículo, más la del
/// conductor si la llegada es manual; en ese caso también se cobra la duración de la
/// parada al conductor. El resultado se redondea a dos decimales.
pub fn incremental_cost(
    scenario: &Scenario,
    stop: &RouteFeature,
    prev_cost: f64,
    prev_time: u32,
) -> Result<f64, ChartError> {
    let mins_diff = stop.arrival()?.minutes() as f64 - prev_time as f64;
    let manual = stop.is_manual();

    let rate = if manual {
        scenario.cost_vehicle + scenario.cost_driver
    } else {
        scenario.cost_vehicle
    };

    let mut cost = mins_diff * rate / 100.0;
    if manual {
        cost += stop.duration()? * scenario.cost_driver / 100.0;
    }
    cost += prev_cost;

    Ok(round_to(cost, 2))
}
