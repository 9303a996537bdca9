//! Seams to services that live outside the engine.
//!
//! The crate ships no network implementation for either trait. A caller that
//! wants a hosted model or a help-center directory plugs one in here.

use crate::types::ContentKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("service unreachable: {0}")]
    Unavailable(String),
    #[error("request timed out")]
    Timeout,
    #[error("service rejected the request: {0}")]
    Rejected(String),
}

/// A hosted classifier that returns raw JSON in the `AnalysisResult` shape.
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, text: &str, kind: ContentKind) -> Result<String, CollaboratorError>;

    fn name(&self) -> &str {
        "remote_classifier"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpCenter {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Link that opens the location in a maps application
    pub map_uri: String,
}

pub trait HelpCenterProvider {
    fn nearby(&self, latitude: f64, longitude: f64) -> Result<Vec<HelpCenter>, CollaboratorError>;
}

/// Help centers near a position. Invalid coordinates and provider failures
/// both give an empty list.
pub fn find_help_centers(
    provider: &dyn HelpCenterProvider,
    latitude: f64,
    longitude: f64,
) -> Vec<HelpCenter> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if !valid {
        log::warn!("Ignoring help-center lookup for invalid position {}, {}", latitude, longitude);
        return Vec::new();
    }

    match provider.nearby(latitude, longitude) {
        Ok(centers) => {
            log::debug!("Help-center provider returned {} result(s)", centers.len());
            centers
        }
        Err(e) => {
            log::warn!("Help-center lookup failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Vec<HelpCenter>);

    impl HelpCenterProvider for FixedProvider {
        fn nearby(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Vec<HelpCenter>, CollaboratorError> {
            Ok(self.0.clone())
        }
    }

    struct DownProvider;

    impl HelpCenterProvider for DownProvider {
        fn nearby(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<Vec<HelpCenter>, CollaboratorError> {
            Err(CollaboratorError::Timeout)
        }
    }

    fn cyber_cell() -> HelpCenter {
        HelpCenter {
            name: "Cyber Crime Police Station".to_string(),
            address: "Bengaluru".to_string(),
            phone: Some("1930".to_string()),
            map_uri: "https://maps.google.com/?q=12.97,77.59".to_string(),
        }
    }

    #[test]
    fn test_provider_results_passed_through() {
        let provider = FixedProvider(vec![cyber_cell()]);
        let centers = find_help_centers(&provider, 12.9, 77.6);
        assert_eq!(centers, vec![cyber_cell()]);
    }

    #[test]
    fn test_failure_gives_empty_list() {
        assert!(find_help_centers(&DownProvider, 12.9, 77.6).is_empty());
    }

    #[test]
    fn test_invalid_position_not_forwarded() {
        let provider = FixedProvider(vec![cyber_cell()]);
        assert!(find_help_centers(&provider, 91.0, 0.0).is_empty());
        assert!(find_help_centers(&provider, f64::NAN, 0.0).is_empty());
    }

    #[test]
    fn test_help_center_json() {
        let value = serde_json::to_value(cyber_cell()).unwrap();
        assert_eq!(value["phone"], "1930");
        assert_eq!(value["name"], "Cyber Crime Police Station");
        assert!(value.get("mapUri").is_some());
    }
}
