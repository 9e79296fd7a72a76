pub mod depots;

pub use depots::{group_vehicles_by_depot, Depot, DepotGroup, DepotVehicle, Vehicle};
