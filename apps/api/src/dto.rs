mod presets;

use serde::Serialize;
use ts_rs::TS;

pub use presets::{
    ExportConfigurationDto, IncludeFlagsDto, PresetResponse, SavePresetRequest,
};

/// Health-check payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
