//! Site inventory input and resolution
//!
//! Users describe a site by device-type name and count. Resolution looks each
//! name up in a [`DeviceCatalogue`] and produces fully-specified
//! [`DeviceTypeProfile`]s, so the engine never sees a free-form device shape.

use crate::engine::SizingConfigOverrides;
use crate::error::SizingError;
use crate::models::{DeviceTypeProfile, LogVolumes, Site};
use crate::weights::{CollectionMethod, DeviceCatalogue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Devices of one type at a site, with optional overrides of the catalogue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceInput {
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<BTreeMap<CollectionMethod, f64>>,
}

impl DeviceInput {
    pub fn count(count: u32) -> Self {
        Self {
            count,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInput {
    pub name: String,
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceInput>,
    #[serde(default)]
    pub log_volumes: LogVolumes,
}

impl SiteInput {
    /// Resolve device names against `catalogue`
    pub fn resolve(&self, catalogue: &DeviceCatalogue) -> Result<Site, SizingError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SizingError::InvalidSite {
                reason: "site name must not be empty".to_string(),
            });
        }

        let mut devices = BTreeMap::new();
        for (device_name, input) in &self.devices {
            let template = catalogue.get(device_name);
            let instances = input.instances.or(template.map(|t| t.instances));
            let methods = input
                .methods
                .clone()
                .or_else(|| template.map(|t| t.methods.clone()));

            let (Some(instance_count), Some(collection_methods)) = (instances, methods) else {
                return Err(SizingError::UnknownDeviceType {
                    site: name.to_string(),
                    name: device_name.clone(),
                });
            };

            // Catalogue spelling wins so results group consistently
            let canonical = template
                .map(|t| t.name.clone())
                .unwrap_or_else(|| device_name.trim().to_string());
            if devices.contains_key(&canonical) {
                return Err(SizingError::InvalidSite {
                    reason: format!(
                        "duplicate device type '{}' on site '{}' (listed as '{}')",
                        canonical, name, device_name
                    ),
                });
            }

            devices.insert(
                canonical.clone(),
                DeviceTypeProfile {
                    name: canonical,
                    instance_count,
                    collection_methods,
                    count: input.count,
                },
            );
        }

        Ok(Site {
            name: name.to_string(),
            devices,
            log_volumes: self.log_volumes,
        })
    }
}

/// A deployment file or sizing request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentInput {
    #[serde(default)]
    pub sites: Vec<SiteInput>,
    #[serde(default)]
    pub config: SizingConfigOverrides,
}

impl DeploymentInput {
    pub fn resolve_sites(&self, catalogue: &DeviceCatalogue) -> Result<Vec<Site>, SizingError> {
        let sites = self
            .sites
            .iter()
            .map(|site| site.resolve(catalogue))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, site) in sites.iter().enumerate() {
            if sites[..i].iter().any(|other| other.name == site.name) {
                return Err(SizingError::InvalidSite {
                    reason: format!("duplicate site name '{}'", site.name),
                });
            }
        }

        Ok(sites)
    }
}
