use models::{
    Baseline, FleetModel, ParamForm, ParsedNumber, PayloadFleetInputs, SavingsResults, Scenario,
    SingleClassInputs,
};

/// Assumed draw per robot payload class in kW.
pub const SMALL_ROBOT_KW: f64 = 1.2;
pub const MEDIUM_ROBOT_KW: f64 = 1.5;
pub const LARGE_ROBOT_KW: f64 = 6.0;
pub const XLARGE_ROBOT_KW: f64 = 10.0;

/// Emissions factor of saved grid energy, t CO₂e per MWh.
pub const CO2_TONS_PER_MWH: f64 = 0.4;

/// Fixed set of improvement percentages projected for one fleet model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioPlan {
    pub improvements: &'static [u32],
    /// Percentage flagged as the typical outcome; must be one of `improvements`.
    pub typical_pct: u32,
    pub co2_tons_per_mwh: Option<f64>,
}

pub const PAYLOAD_FLEET_PLAN: ScenarioPlan = ScenarioPlan {
    improvements: &[15, 20, 25],
    typical_pct: 20,
    co2_tons_per_mwh: Some(CO2_TONS_PER_MWH),
};

pub const SINGLE_CLASS_PLAN: ScenarioPlan = ScenarioPlan {
    improvements: &[5, 10, 15, 20, 25, 30],
    typical_pct: 15,
    co2_tons_per_mwh: None,
};

/// Numeric view of a fleet once its text fields are parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FleetProfile {
    pub total_consumption_kw: f64,
    pub operating_hours_per_year: f64,
    pub energy_cost_per_kwh: f64,
    pub lifetime_years: Option<f64>,
    /// Share of the fleet the improvement applies to, in [0, 1].
    pub optimizable_ratio: f64,
}

/// Baseline and one scenario per plan entry. Pure; runs on every input change.
pub fn project(profile: &FleetProfile, plan: &ScenarioPlan) -> (Baseline, Vec<Scenario>) {
    let baseline_kwh = profile.total_consumption_kw * profile.operating_hours_per_year;
    let baseline_cost = baseline_kwh * profile.energy_cost_per_kwh;
    let ratio = profile.optimizable_ratio;

    let baseline = Baseline {
        total_consumption_kw: profile.total_consumption_kw,
        kwh_per_year: baseline_kwh,
        mwh_per_year: baseline_kwh / 1000.0,
        cost_per_year: baseline_cost,
        lifetime_cost: profile.lifetime_years.map(|years| baseline_cost * years),
    };

    let scenarios = plan
        .improvements
        .iter()
        .map(|&pct| {
            let factor = (1.0 - f64::from(pct) / 100.0).max(0.0);
            let new_kwh = baseline_kwh * factor;
            let new_cost = baseline_cost * factor;
            let annual_savings = (baseline_cost - new_cost) * ratio;
            let energy_savings_kwh = (baseline_kwh - new_kwh) * ratio;
            let total_energy_savings_mwh = profile
                .lifetime_years
                .map(|years| (energy_savings_kwh / 1000.0) * years);
            let co2_savings_tons = plan.co2_tons_per_mwh.map(|tons_per_mwh| {
                total_energy_savings_mwh.unwrap_or(energy_savings_kwh / 1000.0) * tons_per_mwh
            });
            let savings_percent = if baseline_cost > 0.0 {
                (annual_savings / baseline_cost) * 100.0
            } else {
                0.0
            };
            let typical = pct == plan.typical_pct;

            Scenario {
                pct,
                new_kwh_per_year: new_kwh,
                new_mwh_per_year: new_kwh / 1000.0,
                new_cost,
                annual_savings,
                energy_savings_mwh: energy_savings_kwh / 1000.0,
                savings_percent,
                lifetime_savings: profile.lifetime_years.map(|years| annual_savings * years),
                total_energy_savings_mwh,
                co2_savings_tons,
                highlight: typical,
                assumed: typical,
            }
        })
        .collect();

    (baseline, scenarios)
}

/// Reads form fields and remembers which ones fell back to their default.
struct FieldReader<'a, F> {
    form: &'a F,
    fallbacks: Vec<String>,
}

impl<'a, F: ParamForm> FieldReader<'a, F> {
    fn new(form: &'a F) -> Self {
        Self {
            form,
            fallbacks: Vec::new(),
        }
    }

    fn read(&mut self, key: &str, fallback: f64) -> f64 {
        let text = self.form.field(key).unwrap_or_default();
        let parsed = ParsedNumber::from_text(text, fallback);
        if parsed.is_fallback() {
            self.fallbacks.push(key.to_string());
        }
        parsed.value()
    }
}

/// Anything the engine can turn into a results table.
pub trait SavingsModel: ParamForm {
    const MODEL: FleetModel;

    fn calculate(&self) -> SavingsResults;
}

impl SavingsModel for PayloadFleetInputs {
    const MODEL: FleetModel = FleetModel::PayloadFleet;

    fn calculate(&self) -> SavingsResults {
        let mut reader = FieldReader::new(self);
        let small = reader.read("sr", 0.0);
        let medium = reader.read("mr", 0.0);
        let large = reader.read("lr", 0.0);
        let xlarge = reader.read("xr", 0.0);
        let energy_cost_per_kwh = reader.read("ec", 0.0);
        let operating_hours_per_year = reader.read("h", 0.0);
        let lifetime_years = reader.read("lt", 0.0);

        let total_consumption_kw = small * SMALL_ROBOT_KW
            + medium * MEDIUM_ROBOT_KW
            + large * LARGE_ROBOT_KW
            + xlarge * XLARGE_ROBOT_KW;

        let profile = FleetProfile {
            total_consumption_kw,
            operating_hours_per_year,
            energy_cost_per_kwh,
            lifetime_years: Some(lifetime_years),
            optimizable_ratio: 1.0,
        };
        finish(Self::MODEL, &profile, &PAYLOAD_FLEET_PLAN, reader.fallbacks)
    }
}

impl SavingsModel for SingleClassInputs {
    const MODEL: FleetModel = FleetModel::SingleClass;

    fn calculate(&self) -> SavingsResults {
        let mut reader = FieldReader::new(self);
        let energy_cost_per_kwh = reader.read("ec", 0.0);
        let avg_consumption_kw = reader.read("avg", 0.0);
        let robot_count = reader.read("r", 0.0);
        let operating_hours_per_year = reader.read("h", 0.0);
        let optimizable_percent = reader.read("oz", 100.0);

        let profile = FleetProfile {
            total_consumption_kw: robot_count * avg_consumption_kw,
            operating_hours_per_year,
            energy_cost_per_kwh,
            lifetime_years: None,
            optimizable_ratio: optimizable_percent.clamp(0.0, 100.0) / 100.0,
        };
        finish(Self::MODEL, &profile, &SINGLE_CLASS_PLAN, reader.fallbacks)
    }
}

fn finish(
    model: FleetModel,
    profile: &FleetProfile,
    plan: &ScenarioPlan,
    fallbacks: Vec<String>,
) -> SavingsResults {
    let (baseline, scenarios) = project(profile, plan);
    tracing::debug!(
        %model,
        kwh_per_year = baseline.kwh_per_year,
        cost_per_year = baseline.cost_per_year,
        fallbacks = fallbacks.len(),
        "recomputed savings"
    );
    SavingsResults {
        model,
        baseline,
        lifetime_years: profile.lifetime_years,
        optimizable_ratio: profile.optimizable_ratio,
        scenarios,
        fallbacks,
    }
}
