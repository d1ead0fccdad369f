use std::sync::Arc;

use models::{FleetModel, ParamForm, Settings};
use param_sync::seed_defaults;

pub type SharedState = Arc<AppState>;

/// Read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        for model in [FleetModel::PayloadFleet, FleetModel::SingleClass] {
            let overrides = settings.defaults.for_model(model);
            let unknown = match model {
                FleetModel::PayloadFleet => seed_defaults::<models::PayloadFleetInputs>(overrides).1,
                FleetModel::SingleClass => seed_defaults::<models::SingleClassInputs>(overrides).1,
            };
            for key in unknown {
                tracing::warn!(%model, %key, "ignoring default override for unknown field");
            }
        }
        Self { settings }
    }

    /// Built-in form defaults with the configured overrides applied.
    pub fn defaults<F: ParamForm>(&self, model: FleetModel) -> F {
        seed_defaults::<F>(self.settings.defaults.for_model(model)).0
    }
}
