//! Weight model
//!
//! Static lookup tables used to turn a device inventory into polling load:
//! the per-method weight multipliers and the catalogue of known device types
//! with their instance counts and default collection-method mix.

use crate::error::SizingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Protocol or mechanism a collector uses to poll a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionMethod {
    Snmpv2,
    Snmpv3,
    Wmi,
    Winrm,
    Jdbc,
    Script,
}

impl CollectionMethod {
    pub const ALL: [CollectionMethod; 6] = [
        CollectionMethod::Snmpv2,
        CollectionMethod::Snmpv3,
        CollectionMethod::Wmi,
        CollectionMethod::Winrm,
        CollectionMethod::Jdbc,
        CollectionMethod::Script,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionMethod::Snmpv2 => "snmpv2",
            CollectionMethod::Snmpv3 => "snmpv3",
            CollectionMethod::Wmi => "wmi",
            CollectionMethod::Winrm => "winrm",
            CollectionMethod::Jdbc => "jdbc",
            CollectionMethod::Script => "script",
        }
    }

    /// Default weight multiplier for this method
    pub fn default_weight(&self) -> f64 {
        match self {
            CollectionMethod::Snmpv2 => 0.8,
            CollectionMethod::Snmpv3 => 1.0,
            CollectionMethod::Wmi => 2.0,
            CollectionMethod::Winrm => 2.0,
            CollectionMethod::Jdbc => 1.5,
            CollectionMethod::Script => 5.0,
        }
    }
}

impl fmt::Display for CollectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown collection method name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection method '{0}' (expected one of: snmpv2, snmpv3, wmi, winrm, jdbc, script)")]
pub struct ParseMethodError(String);

impl FromStr for CollectionMethod {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CollectionMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

/// Weight multiplier per collection method
///
/// Shared read-only by every site during one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodWeights(BTreeMap<CollectionMethod, f64>);

impl MethodWeights {
    /// An empty table; every lookup fails until weights are added
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, method: CollectionMethod) -> Option<f64> {
        self.0.get(&method).copied()
    }

    pub fn with(mut self, method: CollectionMethod, weight: f64) -> Self {
        self.0.insert(method, weight);
        self
    }

    /// Overlay `overrides` on top of this table, key by key
    pub fn merged(&self, overrides: &MethodWeights) -> Self {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(m, w)| (*m, *w)));
        Self(merged)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollectionMethod, f64)> + '_ {
        self.0.iter().map(|(m, w)| (*m, *w))
    }

    /// Every weight must be finite and strictly positive
    pub fn validate(&self) -> Result<(), SizingError> {
        for (method, value) in self.iter() {
            if !value.is_finite() || value <= 0.0 {
                return Err(SizingError::InvalidMethodWeight { method, value });
            }
        }
        Ok(())
    }
}

impl Default for MethodWeights {
    fn default() -> Self {
        Self(
            CollectionMethod::ALL
                .into_iter()
                .map(|m| (m, m.default_weight()))
                .collect(),
        )
    }
}

impl FromIterator<(CollectionMethod, f64)> for MethodWeights {
    fn from_iter<I: IntoIterator<Item = (CollectionMethod, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Known device type with its default polling footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTemplate {
    pub name: String,
    /// Base instances per device (interfaces, volumes, ...)
    pub instances: u32,
    /// Fraction of instances collected through each method
    pub methods: BTreeMap<CollectionMethod, f64>,
}

impl DeviceTemplate {
    pub fn new(name: impl Into<String>, instances: u32, methods: &[(CollectionMethod, f64)]) -> Self {
        Self {
            name: name.into(),
            instances,
            methods: methods.iter().copied().collect(),
        }
    }
}

/// Registry of device types a site inventory may reference by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceCatalogue {
    templates: Vec<DeviceTemplate>,
}

impl DeviceCatalogue {
    pub fn new(templates: Vec<DeviceTemplate>) -> Self {
        let mut catalogue = Self { templates: Vec::new() };
        for template in templates {
            catalogue.upsert(template);
        }
        catalogue
    }

    /// Parse a catalogue from its JSON form (an array of device templates)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let templates: Vec<DeviceTemplate> = serde_json::from_str(json)?;
        Ok(Self::new(templates))
    }

    /// Look up a device type by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&DeviceTemplate> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Insert a template, replacing any existing one with the same name
    pub fn upsert(&mut self, template: DeviceTemplate) {
        match self
            .templates
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(&template.name))
        {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    /// Extend this catalogue with another, the other one winning on name clashes
    pub fn extend(&mut self, other: DeviceCatalogue) {
        for template in other.templates {
            self.upsert(template);
        }
    }

    pub fn templates(&self) -> &[DeviceTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for DeviceCatalogue {
    fn default() -> Self {
        use CollectionMethod::*;

        Self::new(vec![
            DeviceTemplate::new("Linux Servers", 75, &[(Snmpv3, 0.5), (Script, 0.5)]),
            DeviceTemplate::new("Windows Servers", 75, &[(Wmi, 0.5), (Winrm, 0.5)]),
            DeviceTemplate::new("Routers", 120, &[(Snmpv2, 0.5), (Snmpv3, 0.5)]),
            DeviceTemplate::new("Switches", 150, &[(Snmpv2, 0.5), (Snmpv3, 0.5)]),
            DeviceTemplate::new("Firewalls", 100, &[(Snmpv3, 0.7), (Script, 0.3)]),
            DeviceTemplate::new("Load Balancers", 100, &[(Snmpv3, 0.6), (Script, 0.4)]),
            DeviceTemplate::new("Wireless Controllers", 60, &[(Snmpv2, 0.5), (Snmpv3, 0.5)]),
            DeviceTemplate::new("Access Points", 20, &[(Snmpv2, 1.0)]),
            DeviceTemplate::new("Storage Arrays", 60, &[(Snmpv3, 0.3), (Script, 0.7)]),
            DeviceTemplate::new("Database Servers", 50, &[(Jdbc, 0.7), (Wmi, 0.3)]),
            DeviceTemplate::new("Hypervisors", 100, &[(Script, 1.0)]),
            DeviceTemplate::new("UPS / PDU", 15, &[(Snmpv2, 1.0)]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_table() {
        let weights = MethodWeights::default();
        assert_eq!(weights.get(CollectionMethod::Snmpv2), Some(0.8));
        assert_eq!(weights.get(CollectionMethod::Snmpv3), Some(1.0));
        assert_eq!(weights.get(CollectionMethod::Wmi), Some(2.0));
        assert_eq!(weights.get(CollectionMethod::Winrm), Some(2.0));
        assert_eq!(weights.get(CollectionMethod::Jdbc), Some(1.5));
        assert_eq!(weights.get(CollectionMethod::Script), Some(5.0));
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn test_merged_overrides_single_key() {
        let overrides = MethodWeights::empty().with(CollectionMethod::Script, 4.0);
        let merged = MethodWeights::default().merged(&overrides);

        assert_eq!(merged.get(CollectionMethod::Script), Some(4.0));
        assert_eq!(merged.get(CollectionMethod::Snmpv2), Some(0.8));
    }

    #[test]
    fn test_validate_rejects_non_positive_weight() {
        let weights = MethodWeights::default().with(CollectionMethod::Wmi, 0.0);
        assert_eq!(
            weights.validate(),
            Err(SizingError::InvalidMethodWeight {
                method: CollectionMethod::Wmi,
                value: 0.0
            })
        );

        let weights = MethodWeights::default().with(CollectionMethod::Jdbc, f64::NAN);
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("SNMPv3".parse::<CollectionMethod>(), Ok(CollectionMethod::Snmpv3));
        assert_eq!(" script ".parse::<CollectionMethod>(), Ok(CollectionMethod::Script));
        assert!("telnet".parse::<CollectionMethod>().is_err());
    }

    #[test]
    fn test_unknown_method_rejected_at_parse_time() {
        let json = r#"[{"name": "Odd", "instances": 1, "methods": {"telnet": 1.0}}]"#;
        assert!(DeviceCatalogue::from_json(json).is_err());
    }

    #[test]
    fn test_weights_json_shape() {
        let json = serde_json::to_value(MethodWeights::default()).unwrap();
        assert_eq!(json["script"], 5.0);
        assert_eq!(json["snmpv2"], 0.8);

        let parsed: MethodWeights = serde_json::from_str(r#"{"wmi": 3}"#).unwrap();
        assert_eq!(parsed.get(CollectionMethod::Wmi), Some(3.0));
        assert_eq!(parsed.get(CollectionMethod::Script), None);
    }

    #[test]
    fn test_default_catalogue_has_twelve_types() {
        let catalogue = DeviceCatalogue::default();
        assert_eq!(catalogue.len(), 12);

        let linux = catalogue.get("linux servers").unwrap();
        assert_eq!(linux.instances, 75);
        assert_eq!(linux.methods.get(&CollectionMethod::Snmpv3), Some(&0.5));
        assert_eq!(linux.methods.get(&CollectionMethod::Script), Some(&0.5));
    }

    #[test]
    fn test_catalogue_extend_overrides_by_name() {
        let mut catalogue = DeviceCatalogue::default();
        let custom = DeviceCatalogue::from_json(
            r#"[
                {"name": "Hypervisors", "instances": 200, "methods": {"script": 1.0}},
                {"name": "Mainframes", "instances": 500, "methods": {"script": 0.2, "snmpv3": 0.8}}
            ]"#,
        )
        .unwrap();

        catalogue.extend(custom);

        assert_eq!(catalogue.len(), 13);
        assert_eq!(catalogue.get("Hypervisors").unwrap().instances, 200);
        assert_eq!(catalogue.get("Mainframes").unwrap().instances, 500);
    }
}
