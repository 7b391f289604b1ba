//! Device catalogue loading

use anyhow::{Context, Result};
use sizing_lib::DeviceCatalogue;
use std::path::Path;

/// Built-in catalogue extended with the device types in `path`
///
/// Entries in the file replace built-in ones with the same name.
pub async fn load_catalogue(path: &Path) -> Result<DeviceCatalogue> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalogue file {}", path.display()))?;

    let custom = DeviceCatalogue::from_json(&content)
        .with_context(|| format!("Failed to parse catalogue file {}", path.display()))?;

    let mut catalogue = DeviceCatalogue::default();
    catalogue.extend(custom);
    Ok(catalogue)
}
