//! Marker data handed to the map renderer

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// `{origin, destinations}` as consumed by the map component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerState {
    pub origin: Option<GeoPoint>,
    pub destinations: Vec<GeoPoint>,
}

impl MarkerState {
    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.destinations.is_empty()
    }
}
