//! Reference tables: capacity tiers and the device catalogue

use anyhow::Result;
use tabled::Tabled;

use crate::client::ApiClient;
use crate::output::{format_quantity, print_heading, print_json, render_table, OutputFormat};
use sizing_lib::{CapacityTier, DeviceCatalogue, DeviceTemplate, DEFAULT_TIERS};

/// Row for the tier table
#[derive(Tabled)]
struct TierRow {
    #[tabled(rename = "Tier")]
    name: String,
    #[tabled(rename = "Polling Weight Ceiling")]
    polling: String,
    #[tabled(rename = "EPS Ceiling")]
    eps: String,
}

/// Row for the catalogue table
#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "Device Type")]
    name: String,
    #[tabled(rename = "Instances")]
    instances: u32,
    #[tabled(rename = "Methods")]
    methods: String,
}

fn describe_methods(template: &DeviceTemplate) -> String {
    template
        .methods
        .iter()
        .map(|(method, fraction)| format!("{} {:.0}%", method, fraction * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Show the capacity tier table, from the service when one is given
pub async fn show_tiers(remote: Option<&ApiClient>, format: OutputFormat) -> Result<()> {
    let tiers: Vec<CapacityTier> = match remote {
        Some(client) => client.tiers().await?,
        None => DEFAULT_TIERS.to_vec(),
    };

    match format {
        OutputFormat::Json => print_json(&tiers)?,
        OutputFormat::Table => {
            print_heading("Collector Capacity Tiers");
            let rows: Vec<TierRow> = tiers
                .iter()
                .map(|t| TierRow {
                    name: t.name.to_string(),
                    polling: format_quantity(t.polling_weight_ceiling),
                    eps: format_quantity(t.eps_ceiling),
                })
                .collect();
            println!("{}", render_table(rows));
        }
    }

    Ok(())
}

/// Show the built-in device catalogue
pub fn show_catalogue(format: OutputFormat) -> Result<()> {
    let catalogue = DeviceCatalogue::default();

    match format {
        OutputFormat::Json => print_json(&catalogue)?,
        OutputFormat::Table => {
            print_heading("Device Catalogue");
            let rows: Vec<TemplateRow> = catalogue
                .templates()
                .iter()
                .map(|t| TemplateRow {
                    name: t.name.clone(),
                    instances: t.instances,
                    methods: describe_methods(t),
                })
                .collect();
            println!("{}", render_table(rows));
        }
    }

    Ok(())
}
