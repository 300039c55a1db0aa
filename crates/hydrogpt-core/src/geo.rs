//! GeoJSON feature-collection assembly
//!
//! Reshapes store rows into the standard GeoJSON structure served to the
//! front end. Geometry arrives from PostGIS as serialized GeoJSON text and is
//! re-parsed into a nested structure here. Properties have no sub-schema
//! beyond "is valid JSON".

use crate::store::{MapAreaRow, WaterPointRow};
use crate::{classify, HydroError, Result};
use serde::Serialize;
use serde_json::{json, Value};

/// A GeoJSON feature collection
#[derive(Debug, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

/// A single GeoJSON feature
#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub properties: Value,
    pub geometry: Value,
}

impl Feature {
    fn new(properties: Value, geometry: Value) -> Self {
        Self {
            kind: "Feature",
            properties,
            geometry,
        }
    }
}

impl FeatureCollection {
    fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection",
            features,
        }
    }

    /// Build the sublocation map-data collection
    pub fn from_areas(rows: Vec<MapAreaRow>) -> Result<Self> {
        let features = rows
            .into_iter()
            .map(|row| {
                let properties = json!({
                    "name": row.name,
                    "accessibility": row.accessibility.unwrap_or(0.0),
                    "category": classify(row.accessibility).as_str(),
                    "population": row.population.unwrap_or(0.0) as i64,
                });
                Ok(Feature::new(properties, parse_geometry(&row.geometry)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(features))
    }

    /// Build the water-point collection
    pub fn from_water_points(rows: Vec<WaterPointRow>) -> Result<Self> {
        let features = rows
            .into_iter()
            .map(|row| {
                let properties = json!({
                    "name": row.name.unwrap_or_else(|| "Unknown".to_string()),
                    "water_source": row.water_source.unwrap_or_else(|| "Unknown".to_string()),
                    "capacity_score": row.capacity_score.map(|c| c as i64).unwrap_or(1),
                    "status": row.status.unwrap_or_else(|| "Unknown".to_string()),
                });
                Ok(Feature::new(properties, parse_geometry(&row.geometry)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(features))
    }
}

fn parse_geometry(raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| HydroError::Database(format!("Invalid geometry from store: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> String {
        r#"{"type":"Point","coordinates":[37.8,-0.8]}"#.to_string()
    }

    #[test]
    fn test_area_feature_properties() {
        let rows = vec![MapAreaRow {
            name: "TESTAREA".to_string(),
            accessibility: Some(1.35),
            population: Some(1000.0),
            geometry: point(),
        }];

        let collection = FeatureCollection::from_areas(rows).unwrap();
        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features.len(), 1);

        let props = &collection.features[0].properties;
        assert_eq!(props["category"], "Good");
        assert_eq!(props["population"], 1000);
        assert_eq!(props["accessibility"], 1.35);
    }

    #[test]
    fn test_unscored_area_is_unknown() {
        let rows = vec![MapAreaRow {
            name: "GACABARI".to_string(),
            accessibility: None,
            population: None,
            geometry: point(),
        }];

        let collection = FeatureCollection::from_areas(rows).unwrap();
        let props = &collection.features[0].properties;
        assert_eq!(props["category"], "Unknown");
        assert_eq!(props["accessibility"], 0.0);
        assert_eq!(props["population"], 0);
    }

    #[test]
    fn test_water_point_null_defaults() {
        let rows = vec![WaterPointRow {
            name: None,
            water_source: None,
            capacity_score: None,
            status: None,
            geometry: point(),
        }];

        let collection = FeatureCollection::from_water_points(rows).unwrap();
        let props = &collection.features[0].properties;
        assert_eq!(props["name"], "Unknown");
        assert_eq!(props["water_source"], "Unknown");
        assert_eq!(props["capacity_score"], 1);
        assert_eq!(props["status"], "Unknown");
    }

    #[test]
    fn test_invalid_geometry_is_an_error() {
        let rows = vec![WaterPointRow {
            name: Some("Borehole".to_string()),
            water_source: Some("Borehole".to_string()),
            capacity_score: Some(3.0),
            status: Some("Functional".to_string()),
            geometry: "not geojson".to_string(),
        }];

        assert!(FeatureCollection::from_water_points(rows).is_err());
    }
}
