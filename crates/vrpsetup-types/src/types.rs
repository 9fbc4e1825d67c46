use serde::{Deserialize, Serialize};

/// Which remote service an upload is destined for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Zip codes resolved to coordinates
    Geocode,
    /// Demand points plus a vehicle constraint for route optimization
    Routing,
}

impl Flow {
    /// File input label shown before anything is uploaded
    pub fn default_file_label(&self) -> &'static str {
        match self {
            Flow::Geocode => "zipcode file",
            Flow::Routing => "demand file",
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Geocode => write!(f, "geocode"),
            Flow::Routing => write!(f, "routing"),
        }
    }
}
