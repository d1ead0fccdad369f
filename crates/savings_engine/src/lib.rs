use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::{fs, path::Path};

pub mod engine;
pub mod format;
pub mod report;

pub use engine::{
    project, FleetProfile, SavingsModel, ScenarioPlan, CO2_TONS_PER_MWH, PAYLOAD_FLEET_PLAN,
    SINGLE_CLASS_PLAN,
};
pub use format::{format_currency, format_number, format_quantity};
pub use report::render_table;

use models::{FleetModel, SavingsResults};

#[derive(Debug, Serialize)]
pub struct ResultsMetadata {
    pub generated_at: String,
    pub settings_version: u32,
    pub model: FleetModel,
}

/// Inputs and results written side by side so a saved file explains itself.
#[derive(Debug, Serialize)]
pub struct ResultsDocument<'a, F: Serialize> {
    pub metadata: ResultsMetadata,
    pub inputs: &'a F,
    pub results: &'a SavingsResults,
}

impl<'a, F: Serialize> ResultsDocument<'a, F> {
    pub fn new(inputs: &'a F, results: &'a SavingsResults, settings_version: u32) -> Self {
        Self {
            metadata: ResultsMetadata {
                generated_at: Local::now().to_rfc3339(),
                settings_version,
                model: results.model,
            },
            inputs,
            results,
        }
    }
}

pub fn write_results_json<F: Serialize>(document: &ResultsDocument<'_, F>, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(out_path, json).with_context(|| format!("Writing {}", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "wrote results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::PayloadFleetInputs;
    use serde_json::Value;

    #[test]
    fn test_write_results_json_creates_parent_dirs() {
        let inputs = PayloadFleetInputs::default();
        let results = inputs.calculate();
        let document = ResultsDocument::new(&inputs, &results, 7);

        let dir = std::env::temp_dir().join(format!("savings_engine_{}", std::process::id()));
        let out = dir.join("nested").join("results.json");
        write_results_json(&document, &out).unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["metadata"]["settings_version"], 7);
        assert_eq!(value["metadata"]["model"], "payload-fleet");
        assert_eq!(value["inputs"]["small_robots"], "50");
        assert_eq!(value["results"]["scenarios"].as_array().unwrap().len(), 3);
        assert_eq!(value["results"]["scenarios"][1]["assumed"], true);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_results_shape_omits_absent_figures() {
        let results = models::SingleClassInputs::default().calculate();
        let value = serde_json::to_value(&results).unwrap();
        assert!(value.get("lifetime_years").is_none());
        assert!(value["scenarios"][0].get("co2_savings_tons").is_none());
        assert_eq!(value["model"], "single-class");
    }
}
