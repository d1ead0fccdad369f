use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

mod number;

pub use number::ParsedNumber;

// Form models

/// A flat record of text fields mirrored one-to-one onto query parameters.
pub trait ParamForm: Default + Clone {
	/// Query keys in the order they are written back to the address bar.
	const KEYS: &'static [&'static str];

	fn field(&self, key: &str) -> Option<&str>;

	fn field_mut(&mut self, key: &str) -> Option<&mut String>;

	/// Replaces the text behind `key`. Returns false for keys the form does not know.
	fn set_field(&mut self, key: &str, text: impl Into<String>) -> bool {
		match self.field_mut(key) {
			Some(slot) => {
				*slot = text.into();
				true
			}
			None => false,
		}
	}
}

/// Fleet described by robot counts per payload class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadFleetInputs {
	pub small_robots: String,
	pub medium_robots: String,
	pub large_robots: String,
	pub xlarge_robots: String,
	pub energy_cost: String,
	pub operating_hours: String,
	pub lifetime_years: String,
}

impl Default for PayloadFleetInputs {
	fn default() -> Self {
		Self {
			small_robots: "50".to_string(),
			medium_robots: "20".to_string(),
			large_robots: "10".to_string(),
			xlarge_robots: "2".to_string(),
			energy_cost: "0.18".to_string(),
			operating_hours: "5000".to_string(),
			lifetime_years: "5".to_string(),
		}
	}
}

impl ParamForm for PayloadFleetInputs {
	const KEYS: &'static [&'static str] = &["sr", "mr", "lr", "xr", "ec", "h", "lt"];

	fn field(&self, key: &str) -> Option<&str> {
		let text = match key {
			"sr" => &self.small_robots,
			"mr" => &self.medium_robots,
			"lr" => &self.large_robots,
			"xr" => &self.xlarge_robots,
			"ec" => &self.energy_cost,
			"h" => &self.operating_hours,
			"lt" => &self.lifetime_years,
			_ => return None,
		};
		Some(text.as_str())
	}

	fn field_mut(&mut self, key: &str) -> Option<&mut String> {
		match key {
			"sr" => Some(&mut self.small_robots),
			"mr" => Some(&mut self.medium_robots),
			"lr" => Some(&mut self.large_robots),
			"xr" => Some(&mut self.xlarge_robots),
			"ec" => Some(&mut self.energy_cost),
			"h" => Some(&mut self.operating_hours),
			"lt" => Some(&mut self.lifetime_years),
			_ => None,
		}
	}
}

/// Fleet of identical robots, of which only a share can be optimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleClassInputs {
	pub energy_cost: String,
	pub avg_consumption_kw: String,
	pub robot_count: String,
	pub operating_hours: String,
	pub optimizable_percent: String,
}

impl Default for SingleClassInputs {
	fn default() -> Self {
		Self {
			energy_cost: "0.18".to_string(),
			avg_consumption_kw: "6.5".to_string(),
			robot_count: "3000".to_string(),
			operating_hours: "4000".to_string(),
			optimizable_percent: "100".to_string(),
		}
	}
}

impl ParamForm for SingleClassInputs {
	const KEYS: &'static [&'static str] = &["ec", "avg", "r", "h", "oz"];

	fn field(&self, key: &str) -> Option<&str> {
		let text = match key {
			"ec" => &self.energy_cost,
			"avg" => &self.avg_consumption_kw,
			"r" => &self.robot_count,
			"h" => &self.operating_hours,
			"oz" => &self.optimizable_percent,
			_ => return None,
		};
		Some(text.as_str())
	}

	fn field_mut(&mut self, key: &str) -> Option<&mut String> {
		match key {
			"ec" => Some(&mut self.energy_cost),
			"avg" => Some(&mut self.avg_consumption_kw),
			"r" => Some(&mut self.robot_count),
			"h" => Some(&mut self.operating_hours),
			"oz" => Some(&mut self.optimizable_percent),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FleetModel {
	PayloadFleet,
	SingleClass,
}

impl FleetModel {
	pub fn as_str(self) -> &'static str {
		match self {
			FleetModel::PayloadFleet => "payload-fleet",
			FleetModel::SingleClass => "single-class",
		}
	}
}

impl fmt::Display for FleetModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for FleetModel {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"payload-fleet" => Ok(FleetModel::PayloadFleet),
			"single-class" => Ok(FleetModel::SingleClass),
			other => Err(format!("unknown fleet model '{}'", other)),
		}
	}
}

// Output models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
	pub total_consumption_kw: f64,
	pub kwh_per_year: f64,
	pub mwh_per_year: f64,
	pub cost_per_year: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifetime_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
	pub pct: u32,
	pub new_kwh_per_year: f64,
	pub new_mwh_per_year: f64,
	pub new_cost: f64,
	pub annual_savings: f64,
	pub energy_savings_mwh: f64,
	pub savings_percent: f64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifetime_savings: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_energy_savings_mwh: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub co2_savings_tons: Option<f64>,
	pub highlight: bool,
	pub assumed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsResults {
	pub model: FleetModel,
	pub baseline: Baseline,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub lifetime_years: Option<f64>,
	pub optimizable_ratio: f64,
	pub scenarios: Vec<Scenario>,
	/// Query keys whose text had no numeric value and used the field fallback.
	#[serde(default)]
	pub fallbacks: Vec<String>,
}

impl SavingsResults {
	/// The scenario flagged as the typical outcome.
	pub fn assumed_scenario(&self) -> Option<&Scenario> {
		self.scenarios.iter().find(|s| s.assumed)
	}
}

// Settings models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPosition {
	Before,
	#[default]
	After,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberFormat {
	pub group_separator: String,
	pub decimal_separator: String,
	pub currency_symbol: String,
	#[serde(default)]
	pub symbol_position: SymbolPosition,
}

impl Default for NumberFormat {
	// Czech locale with euro amounts
	fn default() -> Self {
		Self {
			group_separator: "\u{a0}".to_string(),
			decimal_separator: ",".to_string(),
			currency_symbol: "€".to_string(),
			symbol_position: SymbolPosition::After,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DefaultOverrides {
	#[serde(default)]
	pub payload_fleet: BTreeMap<String, String>,
	#[serde(default)]
	pub single_class: BTreeMap<String, String>,
}

impl DefaultOverrides {
	pub fn for_model(&self, model: FleetModel) -> &BTreeMap<String, String> {
		match model {
			FleetModel::PayloadFleet => &self.payload_fleet,
			FleetModel::SingleClass => &self.single_class,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 3000,
		}
	}
}

fn default_base_currency() -> String {
	"EUR".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
	pub settings_version: u32,
	#[serde(default = "default_base_currency")]
	pub base_currency: String,
	#[serde(default)]
	pub format: NumberFormat,
	#[serde(default)]
	pub defaults: DefaultOverrides,
	#[serde(default)]
	pub server: ServerSettings,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			settings_version: 1,
			base_currency: default_base_currency(),
			format: NumberFormat::default(),
			defaults: DefaultOverrides::default(),
			server: ServerSettings::default(),
		}
	}
}
