use crate::models::scenario::Scenario;
use geo_types::Point;
use serde::{Deserialize, Serialize};

// Errores que pueden ocurrir al construir los datos de las gráficas
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChartError {
    #[error("Missing field: {field}")]
    MissingField { field: &'static str },
    #[error("No matching vehicle: {0}")]
    NoMatchingVehicle(u32),
    #[error("Empty feature collection")]
    EmptyCollection,
}

impl ChartError {
    pub fn missing(field: &'static str) -> Self {
        ChartError::MissingField { field }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FeatureStyle {
    #[serde(default)]
    pub color: Option<String>,
}

/// Propiedades de un feature de la solución (entrega, parada, ruta, inicio o fin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureProperties {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub vehicle: Option<u32>,
    pub number: Option<u32>,
    pub arrival_h: Option<u32>,
    pub arrival_m: Option<u32>,
    pub duration: Option<f64>,
    pub duration_h: Option<u32>,
    pub duration_m: Option<u32>,
    pub distance: Option<f64>,
    pub arrival_mode: Option<String>,
    pub style: Option<FeatureStyle>,
    pub route_number: Option<u32>,
}

/// Hora de llegada (hora, minuto). El orden compara primero la hora y luego el minuto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArrivalTime {
    pub hour: u32,
    pub minute: u32,
}

impl ArrivalTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn minutes(&self) -> u32 {
        self.hour * 60 + self.minute
    }

    pub fn hours(&self) -> f64 {
        self.minute as f64 / 60.0 + self.hour as f64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteFeature {
    pub location: Option<Point<f64>>,
    pub properties: FeatureProperties,
}

impl RouteFeature {
    pub fn new(location: Option<Point<f64>>, properties: FeatureProperties) -> Self {
        Self { location, properties }
    }

    pub fn is_point(&self) -> bool {
        self.location.is_some()
    }

    pub fn is_delivery(&self) -> bool {
        self.properties.name.as_deref() == Some("Delivery")
    }

    /// Fin de ruta; según el origen de datos viene en `name` o en `type`.
    pub fn is_end(&self) -> bool {
        self.properties.name.as_deref() == Some("end") || self.has_type("end")
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.properties.r#type.as_deref() == Some(kind)
    }

    pub fn is_manual(&self) -> bool {
        self.properties.arrival_mode.as_deref() == Some("Manual")
    }

    /// Vehículo al que pertenece el feature; las rutas lo llevan en `number`.
    pub fn vehicle_id(&self) -> Option<u32> {
        match self.properties.vehicle {
            Some(id) => Some(id),
            None if self.has_type("route") => self.properties.number,
            None => None,
        }
    }

    pub fn color(&self) -> Option<&str> {
        self.properties.style.as_ref().and_then(|style| style.color.as_deref())
    }

    pub fn arrival(&self) -> Result<ArrivalTime, ChartError> {
        let hour = self.properties.arrival_h.ok_or(ChartError::missing("arrival_h"))?;
        let minute = self.properties.arrival_m.ok_or(ChartError::missing("arrival_m"))?;
        Ok(ArrivalTime::new(hour, minute))
    }

    pub fn duration(&self) -> Result<f64, ChartError> {
        self.properties.duration.ok_or(ChartError::missing("duration"))
    }

    pub fn distance(&self) -> Result<f64, ChartError> {
        self.properties.distance.ok_or(ChartError::missing("distance"))
    }

    /// Duración total de una ruta en minutos (`duration_h` * 60 + `duration_m`).
    pub fn route_minutes(&self) -> Result<u32, ChartError> {
        let hours = self.properties.duration_h.ok_or(ChartError::missing("duration_h"))?;
        let minutes = self.properties.duration_m.ok_or(ChartError::missing("duration_m"))?;
        Ok(hours * 60 + minutes)
    }

    pub fn same_location(&self, other: &RouteFeature) -> bool {
        match (self.location, other.location) {
            (Some(a), Some(b)) => a.x() == b.x() && a.y() == b.y(),
            _ => false,
        }
    }
}

impl TryFrom<geojson::Feature> for RouteFeature {
    type Error = serde_json::Error;

    fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
        let location = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
            Some(geojson::Value::Point(coords)) if coords.len() >= 2 => Some(Point::new(coords[0], coords[1])),
            _ => None,
        };

        let properties = match feature.properties {
            Some(properties) => serde_json::from_value(serde_json::Value::Object(properties))?,
            None => FeatureProperties::default(),
        };

        Ok(RouteFeature::new(location, properties))
    }
}

/// Colección de features de una solución, en el orden en que llegaron.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteCollection {
    pub features: Vec<RouteFeature>,
}

impl RouteCollection {
    pub fn new(features: Vec<RouteFeature>) -> Self {
        Self { features }
    }

    pub fn ensure_not_empty(&self) -> Result<(), ChartError> {
        if self.features.is_empty() {
            return Err(ChartError::EmptyCollection);
        }
        Ok(())
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteFeature> {
        self.features.iter().filter(|feature| feature.has_type("route"))
    }
}

impl TryFrom<geojson::FeatureCollection> for RouteCollection {
    type Error = serde_json::Error;

    fn try_from(collection: geojson::FeatureCollection) -> Result<Self, Self::Error> {
        let features = collection
            .features
            .into_iter()
            .map(RouteFeature::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RouteCollection::new(features))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleRef {
    pub id: u32,
}

/// Resultado de un algoritmo de ruteo: rutas, escenario y vehículos.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    pub id: u32,
    pub name: String,
    pub geojson: RouteCollection,
    pub scenario: Scenario,
    pub vehicles: Vec<VehicleRef>,
}

/// Varias ejecuciones del mismo algoritmo, para los diagramas de caja.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSet {
    pub name: String,
    pub runs: Vec<Algorithm>,
}

impl RunSet {
    pub fn new(name: impl Into<String>, runs: Vec<Algorithm>) -> Self {
        Self { name: name.into(), runs }
    }

    /// Una sola ejecución por algoritmo.
    pub fn single(algorithm: &Algorithm) -> Self {
        Self::new(algorithm.name.clone(), vec![algorithm.clone()])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Point(DataPoint),
    Samples(Vec<f64>),
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<DataPoint> for DataValue {
    fn from(point: DataPoint) -> Self {
        DataValue::Point(point)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<DataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_line: Option<bool>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<DataValue>) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: None,
            border_color: None,
            fill: None,
            show_line: None,
        }
    }

    /// Serie de línea o barra: mismo color de fondo y borde, sin relleno.
    pub fn line(label: impl Into<String>, data: Vec<DataValue>, color: Option<String>) -> Self {
        Self {
            background_color: color.clone(),
            border_color: color,
            fill: Some(false),
            ..Self::new(label, data)
        }
    }

    /// Serie de comparación entre algoritmos (`showLine`).
    pub fn comparison(label: impl Into<String>, data: Vec<DataValue>, color: Option<String>) -> Self {
        Self {
            show_line: Some(true),
            ..Self::line(label, data, color)
        }
    }

    /// Serie con color de fondo únicamente (resúmenes y diagramas de caja).
    pub fn filled(label: impl Into<String>, data: Vec<DataValue>, color: Option<String>) -> Self {
        Self {
            background_color: color,
            ..Self::new(label, data)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    pub fn new(labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self { labels, datasets }
    }

    pub fn labelled(label: &str, datasets: Vec<Dataset>) -> Self {
        Self::new(vec![label.to_string()], datasets)
    }

    pub fn unlabelled(datasets: Vec<Dataset>) -> Self {
        Self::new(Vec::new(), datasets)
    }

    /// Primer valor numérico de cada serie (gráficas de barras de un solo valor).
    pub fn first_values(&self) -> Vec<f64> {
        self.datasets
            .iter()
            .filter_map(|set| match set.data.first() {
                Some(DataValue::Number(value)) => Some(*value),
                _ => None,
            })
            .collect()
    }
}

/// Redondea como `Math.round`: la mitad siempre hacia arriba.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arrival_time_ordering() {
        assert!(ArrivalTime::new(1, 59) < ArrivalTime::new(2, 0));
        assert!(ArrivalTime::new(2, 5) < ArrivalTime::new(2, 10));
        assert_eq!(ArrivalTime::new(3, 30).minutes(), 210);
        assert_eq!(ArrivalTime::new(1, 30).hours(), 1.5);
    }

    #[test]
    fn test_route_feature_from_geojson() {
        let feature: geojson::Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [4.9, 52.3] },
            "properties": {
                "name": "Delivery",
                "type": "delivery",
                "vehicle": 2,
                "arrival_h": 1,
                "arrival_m": 15,
                "duration": 1,
                "distance": 1500.5,
                "arrival_mode": "Manual",
                "parcels": [7]
            }
        }))
        .unwrap();

        let feature = RouteFeature::try_from(feature).unwrap();
        assert!(feature.is_point());
        assert!(feature.is_delivery());
        assert!(feature.is_manual());
        assert_eq!(feature.vehicle_id(), Some(2));
        assert_eq!(feature.arrival().unwrap(), ArrivalTime::new(1, 15));
        assert_eq!(feature.distance().unwrap(), 1500.5);
    }

    #[test]
    fn test_route_feature_uses_number_for_routes() {
        let feature = RouteFeature::new(
            None,
            FeatureProperties {
                r#type: Some("route".into()),
                number: Some(3),
                ..Default::default()
            },
        );
        assert_eq!(feature.vehicle_id(), Some(3));
        assert!(!feature.is_point());
    }

    #[test]
    fn test_missing_arrival_is_reported() {
        let feature = RouteFeature::new(None, FeatureProperties::default());
        assert_eq!(feature.arrival(), Err(ChartError::missing("arrival_h")));
    }

    #[test]
    fn test_round_to_half_up() {
        assert_eq!(round_to(2.345, 1), 2.3);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(95.0, 2), 95.0);
        assert_eq!(round_to(-0.5, 0), 0.0);
    }

    #[test]
    fn test_dataset_serialization() {
        let set = Dataset::comparison("ORS", vec![DataPoint::new(0.0, 0.0).into()], Some("#fff".into()));
        let value = serde_json::to_value(ChartData::unlabelled(vec![set])).unwrap();
        assert_eq!(
            value,
            json!({
                "datasets": [{
                    "label": "ORS",
                    "data": [{ "x": 0.0, "y": 0.0 }],
                    "backgroundColor": "#fff",
                    "borderColor": "#fff",
                    "fill": false,
                    "showLine": true
                }]
            })
        );
    }
}
