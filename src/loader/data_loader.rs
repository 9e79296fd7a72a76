use crate::config::{AlgorithmConfig, AppConfig};
use crate::models::*;
use crate::settings::{group_vehicles_by_depot, Depot, DepotGroup, Vehicle};
use geojson::FeatureCollection;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub struct DataLoader {
    data_dir: PathBuf,
    algorithms: Vec<Algorithm>,
    run_sets: Vec<RunSet>,
    depot_groups: Vec<DepotGroup>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON parsing error: {0}")]
    GeoJson(String),
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DataLoader {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            algorithms: Vec::new(),
            run_sets: Vec::new(),
            depot_groups: Vec::new(),
        }
    }

    /// Carga todos los algoritmos y, si están configurados, los depósitos
    pub fn load_all(&mut self, config: &AppConfig) -> Result<(), LoaderError> {
        if config.algorithms.is_empty() {
            return Err(LoaderError::InvalidData("no algorithms configured".into()));
        }

        let mut algorithms = Vec::new();
        let mut run_sets = Vec::new();
        for algorithm_config in &config.algorithms {
            let algorithm = self.load_algorithm(algorithm_config)?;

            let mut runs = vec![algorithm.clone()];
            for run_file in &algorithm_config.runs {
                let mut run = algorithm.clone();
                run.geojson = self.load_geojson(run_file)?;
                runs.push(run);
            }

            run_sets.push(RunSet::new(algorithm.name.clone(), runs));
            algorithms.push(algorithm);
        }
        self.algorithms = algorithms;
        self.run_sets = run_sets;

        if let (Some(vehicles), Some(depots)) = (&config.vehicles, &config.depots) {
            self.depot_groups = self.load_depot_groups(vehicles, depots)?;
        }

        Ok(())
    }

    pub fn load_algorithm(&self, config: &AlgorithmConfig) -> Result<Algorithm, LoaderError> {
        let geojson = self.load_geojson(&config.geojson)?;
        let scenario = Scenario::read_from_file(self.data_dir.join(&config.scenario))?;

        Ok(Algorithm {
            id: config.id,
            name: config.name.clone(),
            geojson,
            scenario,
            vehicles: config.vehicles.iter().map(|&id| VehicleRef { id }).collect(),
        })
    }

    /// Carga un archivo GeoJSON de rutas
    fn load_geojson(&self, filename: &str) -> Result<RouteCollection, LoaderError> {
        let file_path = self.data_dir.join(filename);
        info!("Loading {}", file_path.display());

        let reader = BufReader::new(File::open(&file_path)?);
        let feature_collection: FeatureCollection = match serde_json::from_reader(reader) {
            Ok(geojson) => geojson,
            Err(e) => {
                error!("Failed to parse GeoJSON from {}: {}", filename, e);
                return Err(LoaderError::Json(e));
            }
        };

        debug!("Found {} features in {}", feature_collection.features.len(), filename);

        RouteCollection::try_from(feature_collection).map_err(|e| {
            error!("Failed to deserialize feature: {}", e);
            LoaderError::GeoJson(format!("{}: {}", filename, e))
        })
    }

    fn load_csv<T: DeserializeOwned>(&self, filename: &str) -> Result<Vec<T>, LoaderError> {
        let file_path = self.data_dir.join(filename);
        info!("Loading {}", file_path.display());

        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&file_path)?;
        let records = reader.deserialize::<T>().collect::<Result<Vec<_>, _>>()?;

        debug!("Found {} records in {}", records.len(), filename);
        Ok(records)
    }

    pub fn load_depot_groups(&self, vehicles_file: &str, depots_file: &str) -> Result<Vec<DepotGroup>, LoaderError> {
        let vehicles: Vec<Vehicle> = self.load_csv(vehicles_file)?;
        let depots: Vec<Depot> = self.load_csv(depots_file)?;
        Ok(group_vehicles_by_depot(&vehicles, &depots))
    }

    // Getters para acceder a los datos cargados
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    pub fn run_sets(&self) -> &[RunSet] {
        &self.run_sets
    }

    pub fn depot_groups(&self) -> &[DepotGroup] {
        &self.depot_groups
    }

    pub fn find_algorithm(&self, id: u32) -> Option<&Algorithm> {
        self.algorithms.iter().find(|algorithm| algorithm.id == id)
    }
}
