use serde::Deserialize;
use std::collections::BTreeMap;

/// One page of the upstream feed: records grouped by close-approach day.
/// Keys are `YYYY-MM-DD` strings, so map order is chronological.
pub type NeoFeed = BTreeMap<String, Vec<NeoRecord>>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeoFeedResponse {
    #[serde(default)]
    pub near_earth_objects: NeoFeed,
}

/// Upstream representation of one object. Only the fields the transformer
/// reads are modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NeoRecord {
    pub id: String,
    pub name: String,
    pub estimated_diameter: EstimatedDiameter,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EstimatedDiameter {
    pub meters: DiameterBounds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiameterBounds {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

/// One recorded pass near Earth. The upstream serializes the numeric figures
/// as strings; parsing happens in the transformer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub close_approach_date: String,
    #[serde(default)]
    pub relative_velocity: RelativeVelocity,
    #[serde(default)]
    pub miss_distance: MissDistance,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default)]
    pub kilometers_per_second: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MissDistance {
    #[serde(default)]
    pub kilometers: String,
}
