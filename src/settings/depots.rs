use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(alias = "ID", alias = "Index")]
    pub id: u32,
    #[serde(alias = "Depot")]
    pub depot: String,
    #[serde(alias = "Capacity")]
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    #[serde(alias = "ID", alias = "Index")]
    pub id: String,
    #[serde(default, alias = "Lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Lon")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepotVehicle {
    pub id: u32,
    pub capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepotGroup {
    pub id: String,
    pub vehicles: Vec<DepotVehicle>,
}

/// Agrupa los vehículos por depósito, en el orden de los depósitos.
///
/// Cada vehículo va al primer depósito con el mismo id. Los vehículos sin depósito
/// se descartan.
pub fn group_vehicles_by_depot(vehicles: &[Vehicle], depots: &[Depot]) -> Vec<DepotGroup> {
    let mut groups: Vec<DepotGroup> = depots
        .iter()
        .map(|depot| DepotGroup {
            id: depot.id.clone(),
            vehicles: Vec::new(),
        })
        .collect();

    for vehicle in vehicles {
        match groups.iter_mut().find(|group| group.id == vehicle.depot) {
            Some(group) => group.vehicles.push(DepotVehicle {
                id: vehicle.id,
                capacity: vehicle.capacity,
            }),
            None => warn!("Vehicle {} has no matching depot {}", vehicle.id, vehicle.depot),
        }
    }

    groups
}
