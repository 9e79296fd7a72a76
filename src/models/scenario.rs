use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing scenario value: {0}")]
    MissingValue(&'static str),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("Invalid parcel line: {0}")]
    InvalidParcel(String),
    #[error("Unexpected line in scenario header: {0}")]
    UnexpectedLine(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parcel {
    pub request_origin: u32,
    pub request_destination: u32,
    pub request_time: u32,
}

/// Configuración de costos de un escenario. Los costos están en centavos por minuto.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub vehicles: u32,
    pub capacity: u32,
    pub drivers: u32,
    pub time_active: u32,
    pub time_mode: u32,
    pub cost_vehicle: f64,
    pub cost_driver: f64,
    pub parcels: Vec<Parcel>,
}

impl Scenario {
    pub fn with_costs(cost_vehicle: f64, cost_driver: f64) -> Self {
        Self {
            cost_vehicle,
            cost_driver,
            ..Default::default()
        }
    }

    /// Lee un escenario en formato de texto plano.
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        info!("Loading scenario {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Formato de texto: un valor por línea, línea en blanco y luego una encomienda por línea.
    pub fn to_file_string(&self) -> String {
        let mut res = format!(
            "{}\n{}\n{}\n{}\n{}\n{}\n{}\n\n",
            self.vehicles,
            self.capacity,
            self.drivers,
            self.time_active,
            self.time_mode,
            self.cost_vehicle,
            self.cost_driver
        );
        for parcel in &self.parcels {
            res.push_str(&format!(
                "{} {} {}\n",
                parcel.request_origin, parcel.request_destination, parcel.request_time
            ));
        }
        res
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        // El encabezado termina en la primera línea vacía, aunque tenga espacios
        let mut lines = contents.lines();
        let header: Vec<&str> = lines.by_ref().take_while(|line| !line.trim().is_empty()).collect();

        // Solo cuenta el primer token de cada línea; el resto son comentarios
        let mut values = header.iter().filter_map(|line| line.split_whitespace().next());

        let vehicles = parse_value(values.next(), "vehicles")?;
        let capacity = parse_value(values.next(), "capacity")?;
        let drivers = parse_value(values.next(), "drivers")?;
        let time_active = parse_value(values.next(), "time_active")?;
        let time_mode = parse_value(values.next(), "time_mode")?;
        let cost_vehicle = parse_value(values.next(), "cost_vehicle")?;
        let cost_driver = parse_value(values.next(), "cost_driver")?;

        if let Some(extra) = header.get(7) {
            return Err(ScenarioError::UnexpectedLine(extra.to_string()));
        }

        let parcels = lines
            .filter(|line| !line.trim().is_empty())
            .map(parse_parcel)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Parsed scenario with {} parcels", parcels.len());

        Ok(Scenario {
            vehicles,
            capacity,
            drivers,
            time_active,
            time_mode,
            cost_vehicle,
            cost_driver,
            parcels,
        })
    }
}

fn parse_value<T: FromStr>(value: Option<&str>, field: &'static str) -> Result<T, ScenarioError> {
    let value = value.ok_or(ScenarioError::MissingValue(field))?;
    value.parse().map_err(|_| ScenarioError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_parcel(line: &str) -> Result<Parcel, ScenarioError> {
    let params = line
        .split_whitespace()
        .map(|param| param.parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ScenarioError::InvalidParcel(line.to_string()))?;

    match params.as_slice() {
        [origin, destination, time, ..] => Ok(Parcel {
            request_origin: *origin,
            request_destination: *destination,
            request_time: *time,
        }),
        _ => Err(ScenarioError::InvalidParcel(line.to_string())),
    }
}
