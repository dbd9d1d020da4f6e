use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

/// Wire shape of a partial export configuration.
///
/// Every field is optional: the consuming form applies present fields onto
/// live controls and leaves absent ones untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/export-configuration.ts"
)]
pub struct ExportConfigurationDto {
    pub format: Option<String>,
    pub entity: Option<String>,
    pub filename: Option<String>,
    pub include_pending: Option<bool>,
    pub include: Option<IncludeFlagsDto>,
    pub fields: Option<Vec<String>>,
    #[ts(type = "Array<number> | null")]
    pub ids: Option<Vec<i64>>,
    #[ts(type = "Record<string, unknown> | null")]
    pub filters: Option<BTreeMap<String, Value>>,
}

/// Wire shape of the related-resource inclusion flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/include-flags.ts"
)]
pub struct IncludeFlagsDto {
    pub customer: Option<bool>,
    pub entity: Option<bool>,
    pub protocol: Option<bool>,
    pub invoices: Option<bool>,
    pub payments: Option<bool>,
}

/// Incoming payload for preset create/update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-preset-request.ts"
)]
pub struct SavePresetRequest {
    pub name: String,
    pub description: Option<String>,
    pub configuration: ExportConfigurationDto,
}

/// API representation of a stored preset.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/preset-response.ts"
)]
pub struct PresetResponse {
    #[ts(type = "string")]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub target: String,
    pub query_string: String,
}
