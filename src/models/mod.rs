pub mod _structs;
pub mod scenario;

pub use _structs::*;
pub use scenario::{Parcel, Scenario, ScenarioError};
