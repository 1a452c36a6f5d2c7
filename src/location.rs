use crate::data::Dataset;
use crate::error::{DashboardError, Result};
use std::collections::HashMap;

/// A geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Representative map position per country, used to center the map.
///
/// The position is the coordinates of the last located record seen for
/// that country, not a geometric centroid. Countries with no located
/// record are absent.
pub struct LocationIndex {
    by_country: HashMap<String, LatLon>,
}

impl LocationIndex {
    pub fn build(dataset: &Dataset) -> Self {
        let mut by_country = HashMap::new();
        for record in dataset.records() {
            if let Some(position) = record.position {
                by_country.insert(record.country.clone(), position);
            }
        }
        Self { by_country }
    }

    pub fn get(&self, country: &str) -> Result<LatLon> {
        self.by_country
            .get(country)
            .copied()
            .ok_or_else(|| DashboardError::NotFound(country.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_country.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_country.is_empty()
    }
}
