use crate::feed::types::{NeoFeed, NeoRecord};
use serde::{Deserialize, Serialize};

/// Flattened, display-ready summary of one NEO's close approach on one day.
/// Canonical units: meters for size, kilometers for miss distance, km/s for
/// relative velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeoBrief {
    pub id: String,
    pub name: String,
    pub size_meters: f64,
    pub closeness_km: f64,
    pub relative_velocity_km_s: f64,
    pub hazardous: bool,
}

/// Summarizes one record for the feed day it was listed under. Records with
/// no close-approach entry on that day, or with figures that do not parse to
/// finite numbers, yield nothing.
pub fn brief_for_day(neo: &NeoRecord, day: &str) -> Option<NeoBrief> {
    let approach = neo
        .close_approach_data
        .iter()
        .find(|c| c.close_approach_date == day)?;

    let closeness_km = parse_finite(&approach.miss_distance.kilometers)?;
    let relative_velocity_km_s = parse_finite(&approach.relative_velocity.kilometers_per_second)?;

    let bounds = &neo.estimated_diameter.meters;
    let size_meters = (bounds.estimated_diameter_min + bounds.estimated_diameter_max) / 2.0;

    Some(NeoBrief {
        id: neo.id.clone(),
        name: neo.name.clone(),
        size_meters,
        closeness_km,
        relative_velocity_km_s,
        hazardous: neo.is_potentially_hazardous_asteroid,
    })
}

/// Flattens a feed page into briefs: days in map order, records in list
/// order. Unusable records are dropped silently.
pub fn briefs_from_feed(feed: &NeoFeed) -> Vec<NeoBrief> {
    let mut items = Vec::new();
    for (day, neos) in feed {
        for neo in neos {
            if let Some(brief) = brief_for_day(neo, day) {
                items.push(brief);
            }
        }
    }
    items
}

fn parse_finite(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::types::NeoFeedResponse;
    use serde_json::json;

    fn record(id: &str, approaches: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("({id}) Test"),
            "estimated_diameter": {
                "meters": { "estimated_diameter_min": 100.0, "estimated_diameter_max": 200.0 }
            },
            "is_potentially_hazardous_asteroid": false,
            "close_approach_data": approaches,
        })
    }

    fn approach(day: &str, miss_km: &str, velocity_km_s: &str) -> serde_json::Value {
        json!({
            "close_approach_date": day,
            "relative_velocity": { "kilometers_per_second": velocity_km_s },
            "miss_distance": { "kilometers": miss_km },
        })
    }

    fn feed(value: serde_json::Value) -> NeoFeed {
        serde_json::from_value::<NeoFeedResponse>(json!({ "near_earth_objects": value }))
            .unwrap()
            .near_earth_objects
    }

    #[test]
    fn summarizes_matching_approach() {
        let feed = feed(json!({
            "2024-01-01": [record("3542519", json!([approach("2024-01-01", "1000.5", "10.2")]))]
        }));

        let items = briefs_from_feed(&feed);
        assert_eq!(items.len(), 1);
        let brief = &items[0];
        assert_eq!(brief.id, "3542519");
        assert_eq!(brief.size_meters, 150.0);
        assert_eq!(brief.closeness_km, 1000.5);
        assert_eq!(brief.relative_velocity_km_s, 10.2);
        assert!(!brief.hazardous);
    }

    #[test]
    fn skips_record_without_entry_for_its_day() {
        // The approach list covers the object's full history; only the entry
        // matching the feed day counts.
        let feed = feed(json!({
            "2024-01-01": [record("1", json!([approach("2031-06-15", "500.0", "5.0")]))]
        }));
        assert!(briefs_from_feed(&feed).is_empty());
    }

    #[test]
    fn drops_non_numeric_and_non_finite_figures() {
        let feed = feed(json!({
            "2024-01-01": [
                record("1", json!([approach("2024-01-01", "not-a-number", "10.0")])),
                record("2", json!([approach("2024-01-01", "1000.0", "")])),
                record("3", json!([approach("2024-01-01", "inf", "10.0")])),
                record("4", json!([approach("2024-01-01", "1000.0", "10.0")])),
            ]
        }));

        let items = briefs_from_feed(&feed);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "4");
    }

    #[test]
    fn concatenates_days_in_order() {
        let feed = feed(json!({
            "2024-01-02": [record("b", json!([approach("2024-01-02", "2.0", "2.0")]))],
            "2024-01-01": [record("a", json!([approach("2024-01-01", "1.0", "1.0")]))],
        }));

        let briefs = briefs_from_feed(&feed);
        let ids: Vec<&str> = briefs.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn record_listed_under_two_days_yields_two_briefs() {
        let approaches = json!([
            approach("2024-01-01", "1.0", "1.0"),
            approach("2024-01-02", "2.0", "2.0"),
        ]);
        let feed = feed(json!({
            "2024-01-01": [record("x", approaches.clone())],
            "2024-01-02": [record("x", approaches)],
        }));

        let items = briefs_from_feed(&feed);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].closeness_km, 1.0);
        assert_eq!(items[1].closeness_km, 2.0);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let brief = NeoBrief {
            id: "1".to_string(),
            name: "n".to_string(),
            size_meters: 150.0,
            closeness_km: 1000.5,
            relative_velocity_km_s: 10.2,
            hazardous: true,
        };

        let v = serde_json::to_value(&brief).unwrap();
        assert_eq!(v["sizeMeters"], 150.0);
        assert_eq!(v["closenessKm"], 1000.5);
        assert_eq!(v["relativeVelocityKmS"], 10.2);
        assert_eq!(v["hazardous"], true);
    }
}
