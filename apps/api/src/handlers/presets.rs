use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;
use vodokanal_application::SavePresetInput;
use vodokanal_domain::{ExportConfiguration, PresetId};

use crate::dto::{ExportConfigurationDto, PresetResponse, SavePresetRequest};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct ListPresetsQuery {
    pub target: Option<String>,
}

pub async fn list_presets_handler(
    State(state): State<AppState>,
    Query(query): Query<ListPresetsQuery>,
) -> ApiResult<Json<Vec<PresetResponse>>> {
    let presets = state
        .preset_service
        .list_presets(query.target.as_deref())
        .await?
        .into_iter()
        .map(PresetResponse::from)
        .collect();

    Ok(Json(presets))
}

pub async fn create_preset_handler(
    State(state): State<AppState>,
    Json(payload): Json<SavePresetRequest>,
) -> ApiResult<(StatusCode, Json<PresetResponse>)> {
    let configuration = ExportConfiguration::try_from(payload.configuration)?;
    let preset = state
        .preset_service
        .save_preset(SavePresetInput {
            name: payload.name,
            description: payload.description,
            configuration,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PresetResponse::from(preset))))
}

pub async fn get_preset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PresetResponse>> {
    let preset = state
        .preset_service
        .get_preset(PresetId::from_uuid(id))
        .await?;

    Ok(Json(PresetResponse::from(preset)))
}

pub async fn get_preset_configuration_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExportConfigurationDto>> {
    let configuration = state
        .preset_service
        .apply_preset(PresetId::from_uuid(id))
        .await?;

    Ok(Json(ExportConfigurationDto::from(configuration)))
}

pub async fn update_preset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SavePresetRequest>,
) -> ApiResult<Json<PresetResponse>> {
    let configuration = ExportConfiguration::try_from(payload.configuration)?;
    let preset = state
        .preset_service
        .update_preset(
            PresetId::from_uuid(id),
            SavePresetInput {
                name: payload.name,
                description: payload.description,
                configuration,
            },
        )
        .await?;

    Ok(Json(PresetResponse::from(preset)))
}

pub async fn delete_preset_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .preset_service
        .delete_preset(PresetId::from_uuid(id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
