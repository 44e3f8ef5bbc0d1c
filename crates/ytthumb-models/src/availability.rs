//! Per-request availability of thumbnail tiers.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::resolution::ResolutionTier;

/// Which tiers currently resolve to a real image for one video.
///
/// Always covers all five tiers. Serialized as a JSON object keyed by tier
/// name in descending-fidelity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailabilityMap([bool; 5]);

impl AvailabilityMap {
    /// A map with every tier unavailable.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build a map from probe results. Tiers not mentioned stay unavailable.
    pub fn from_results(results: impl IntoIterator<Item = (ResolutionTier, bool)>) -> Self {
        let mut map = Self::none();
        for (tier, available) in results {
            map.set(tier, available);
        }
        map
    }

    pub fn set(&mut self, tier: ResolutionTier, available: bool) {
        self.0[tier.index()] = available;
    }

    pub fn is_available(&self, tier: ResolutionTier) -> bool {
        self.0[tier.index()]
    }

    /// Iterate over every tier and its flag, highest fidelity first.
    pub fn iter(&self) -> impl Iterator<Item = (ResolutionTier, bool)> + '_ {
        ResolutionTier::ALL.into_iter().map(|tier| (tier, self.is_available(tier)))
    }

    /// Available tiers, highest fidelity first.
    pub fn available_tiers(&self) -> Vec<ResolutionTier> {
        self.iter()
            .filter_map(|(tier, available)| available.then_some(tier))
            .collect()
    }

    /// First available tier in descending-fidelity order.
    pub fn best_available(&self) -> Option<ResolutionTier> {
        self.iter().find_map(|(tier, available)| available.then_some(tier))
    }

    pub fn none_available(&self) -> bool {
        self.best_available().is_none()
    }
}

impl Serialize for AvailabilityMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (tier, available) in self.iter() {
            map.serialize_entry(tier.as_str(), &available)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AvailabilityMap {
    /// Unknown tier names are ignored and missing tiers are unavailable.
    /// Non-boolean flags are read by truthiness, the way browsers send them.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_results(raw.into_iter().filter_map(|(name, flag)| {
            let tier = name.parse::<ResolutionTier>().ok()?;
            Some((tier, is_truthy(&flag)))
        })))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Availability data a client echoes back from an earlier check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityHint {
    /// Raw video ID the hint was computed for. Not validated; a hint only
    /// applies when this equals the freshly derived identifier.
    pub video_id: String,
    pub available_resolutions: AvailabilityMap,
    /// When the server produced the data. Absent for older clients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl AvailabilityHint {
    /// Whether the hint is recent enough to reuse. Hints without a timestamp
    /// are always considered fresh.
    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        match self.checked_at {
            Some(checked_at) => now.signed_duration_since(checked_at) <= max_age,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_available_follows_fixed_order() {
        let map = AvailabilityMap::from_results([
            (ResolutionTier::Default, true),
            (ResolutionTier::High, true),
        ]);
        assert_eq!(map.best_available(), Some(ResolutionTier::High));
        assert_eq!(
            map.available_tiers(),
            vec![ResolutionTier::High, ResolutionTier::Default]
        );

        assert_eq!(AvailabilityMap::none().best_available(), None);
        assert!(AvailabilityMap::none().none_available());
    }

    #[test]
    fn test_serializes_all_five_tiers() {
        let map = AvailabilityMap::from_results([(ResolutionTier::MaxRes, true)]);
        let json = serde_json::to_value(map).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 5);
        assert_eq!(obj["maxresdefault"], true);
        assert_eq!(obj["sddefault"], false);
        assert_eq!(obj["default"], false);
    }

    #[test]
    fn test_deserialize_ignores_unknown_keys() {
        let map: AvailabilityMap = serde_json::from_str(
            r#"{"hqdefault": true, "hq720": true, "mqdefault": false}"#,
        )
        .unwrap();

        assert_eq!(map.available_tiers(), vec![ResolutionTier::High]);
    }

    #[test]
    fn test_deserialize_reads_flags_by_truthiness() {
        let map: AvailabilityMap = serde_json::from_str(
            r#"{"maxresdefault": "yes", "sddefault": 0, "hqdefault": 1, "mqdefault": null, "default": ""}"#,
        )
        .unwrap();

        assert_eq!(
            map.available_tiers(),
            vec![ResolutionTier::MaxRes, ResolutionTier::High]
        );
    }

    #[test]
    fn test_hint_freshness() {
        let now = Utc::now();
        let mut hint = AvailabilityHint {
            video_id: "dQw4w9WgXcQ".to_string(),
            available_resolutions: AvailabilityMap::none(),
            checked_at: None,
        };
        assert!(hint.is_fresh(Duration::seconds(300), now));

        hint.checked_at = Some(now - Duration::seconds(10));
        assert!(hint.is_fresh(Duration::seconds(300), now));

        hint.checked_at = Some(now - Duration::seconds(600));
        assert!(!hint.is_fresh(Duration::seconds(300), now));
    }

    #[test]
    fn test_hint_deserializes_from_client_payload() {
        let hint: AvailabilityHint = serde_json::from_str(
            r#"{"videoId": "dQw4w9WgXcQ", "availableResolutions": {"sddefault": true}}"#,
        )
        .unwrap();

        assert_eq!(hint.video_id, "dQw4w9WgXcQ");
        assert_eq!(hint.checked_at, None);
        assert_eq!(hint.available_resolutions.best_available(), Some(ResolutionTier::Standard));
    }
}
