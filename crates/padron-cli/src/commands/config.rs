use crate::output::OutputWriter;
use anyhow::Result;
use padron_core::config::LayeredConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct ConfigEntry {
    value: String,
    source: String,
}

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(output: &OutputWriter, config: &LayeredConfig) -> Result<bool> {
    let entries: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| (key, ConfigEntry { value, source: format!("{:?}", source) }))
        .collect();

    if output.is_json() {
        output.result(&entries)?;
    } else {
        output.section("Configuration");
        output.table(
            entries
                .into_iter()
                .map(|(key, entry)| ConfigRow { key, value: entry.value, source: entry.source })
                .collect(),
        );
    }

    Ok(true)
}
