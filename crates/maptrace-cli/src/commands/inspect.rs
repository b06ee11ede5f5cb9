use crate::cli::InspectArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use maptrace_core::config::LayeredConfig;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(_args: InspectArgs, output: &OutputWriter, config: &LayeredConfig) -> Result<()> {
    let map = config.to_inspection_map();

    if output.is_json() {
        let json: serde_json::Map<String, serde_json::Value> = map
            .iter()
            .map(|(key, (value, source))| {
                (
                    key.clone(),
                    serde_json::json!({ "value": value, "source": format!("{:?}", source) }),
                )
            })
            .collect();
        return output.result(json);
    }

    output.section("Configuration");
    let mut rows: Vec<ConfigRow> = map
        .into_iter()
        .map(|(key, (value, source))| ConfigRow {
            key,
            value,
            source: format!("{:?}", source),
        })
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    output.table(rows);
    Ok(())
}
