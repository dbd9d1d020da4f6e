use std::sync::Arc;

use vodokanal_core::{AppError, AppResult};
use vodokanal_domain::{ExportConfiguration, Preset, PresetId, preset_query};

use crate::preset_ports::PresetRepository;

/// Input payload for preset create/update operations.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePresetInput {
    /// Preset display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Configuration captured from the reporting form.
    pub configuration: ExportConfiguration,
}

/// Use-cases for saving and re-applying named export presets.
#[derive(Clone)]
pub struct PresetService {
    repository: Arc<dyn PresetRepository>,
}

impl PresetService {
    /// Creates the service with its persistence port.
    #[must_use]
    pub fn new(repository: Arc<dyn PresetRepository>) -> Self {
        Self { repository }
    }

    /// Encodes and persists a new preset.
    ///
    /// The configuration must carry an export entity: the preset-storage
    /// grouping key is derived from it.
    pub async fn save_preset(&self, input: SavePresetInput) -> AppResult<Preset> {
        let target = input.configuration.entity.ok_or_else(|| {
            AppError::Validation(
                "preset configuration must select an export entity".to_owned(),
            )
        })?;

        let preset = Preset::new(
            PresetId::new(),
            input.name,
            input.description,
            target.preset_target(),
            preset_query::encode(&input.configuration),
        )?;

        self.repository.save(preset.clone()).await?;
        Ok(preset)
    }

    /// Lists stored presets, optionally restricted to one target.
    pub async fn list_presets(&self, target: Option<&str>) -> AppResult<Vec<Preset>> {
        self.repository.list(target).await
    }

    /// Returns a stored preset by identifier.
    pub async fn get_preset(&self, id: PresetId) -> AppResult<Preset> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("preset '{id}' does not exist")))
    }

    /// Decodes a stored preset back into partial form field values.
    ///
    /// A corrupt query string decodes to an empty configuration; the caller
    /// applies it as "leave current form values untouched".
    pub async fn apply_preset(&self, id: PresetId) -> AppResult<ExportConfiguration> {
        let preset = self.get_preset(id).await?;
        Ok(preset_query::decode(preset.query_string()))
    }

    /// Re-encodes and replaces an existing preset.
    pub async fn update_preset(&self, id: PresetId, input: SavePresetInput) -> AppResult<Preset> {
        let target = input.configuration.entity.ok_or_else(|| {
            AppError::Validation(
                "preset configuration must select an export entity".to_owned(),
            )
        })?;

        // Verify existence first so the caller gets a 404, not a repository
        // write error.
        self.get_preset(id).await?;

        let preset = Preset::new(
            id,
            input.name,
            input.description,
            target.preset_target(),
            preset_query::encode(&input.configuration),
        )?;

        self.repository.update(preset.clone()).await?;
        Ok(preset)
    }

    /// Deletes a stored preset.
    pub async fn delete_preset(&self, id: PresetId) -> AppResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use super::{PresetService, SavePresetInput};
    use crate::preset_ports::PresetRepository;
    use vodokanal_core::{AppError, AppResult, TriState};
    use vodokanal_domain::{
        ExportConfiguration, ExportEntity, ExportFormat, FilterValue, Preset, PresetId,
    };

    #[derive(Default)]
    struct FakePresetRepository {
        presets: RwLock<HashMap<PresetId, Preset>>,
    }

    #[async_trait]
    impl PresetRepository for FakePresetRepository {
        async fn save(&self, preset: Preset) -> AppResult<()> {
            self.presets.write().await.insert(preset.id(), preset);
            Ok(())
        }

        async fn list(&self, target: Option<&str>) -> AppResult<Vec<Preset>> {
            let presets = self.presets.read().await;
            Ok(presets
                .values()
                .filter(|preset| {
                    target.is_none_or(|target| preset.target().as_str() == target)
                })
                .cloned()
                .collect())
        }

        async fn find(&self, id: PresetId) -> AppResult<Option<Preset>> {
            Ok(self.presets.read().await.get(&id).cloned())
        }

        async fn update(&self, preset: Preset) -> AppResult<()> {
            let mut presets = self.presets.write().await;
            if !presets.contains_key(&preset.id()) {
                return Err(AppError::NotFound(format!(
                    "preset '{}' does not exist",
                    preset.id()
                )));
            }
            presets.insert(preset.id(), preset);
            Ok(())
        }

        async fn delete(&self, id: PresetId) -> AppResult<()> {
            self.presets.write().await.remove(&id);
            Ok(())
        }
    }

    fn service_with_repository() -> (PresetService, Arc<FakePresetRepository>) {
        let repository = Arc::new(FakePresetRepository::default());
        (PresetService::new(repository.clone()), repository)
    }

    #[tokio::test]
    async fn save_preset_derives_the_legacy_ty_target() {
        let (service, _) = service_with_repository();

        let preset = service
            .save_preset(SavePresetInput {
                name: "open permits".to_owned(),
                description: None,
                configuration: ExportConfiguration {
                    entity: Some(ExportEntity::TechnicalConditions),
                    ..ExportConfiguration::default()
                },
            })
            .await;

        assert_eq!(
            preset.ok().map(|preset| preset.target().as_str().to_owned()),
            Some("ty".to_owned())
        );
    }

    #[tokio::test]
    async fn save_preset_requires_an_export_entity() {
        let (service, _) = service_with_repository();

        let result = service
            .save_preset(SavePresetInput {
                name: "nameless".to_owned(),
                description: None,
                configuration: ExportConfiguration::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn apply_preset_decodes_the_stored_query_string() {
        let (service, _) = service_with_repository();

        let configuration = ExportConfiguration {
            format: Some(ExportFormat::Xlsx),
            entity: Some(ExportEntity::Payments),
            include_pending: TriState::True,
            filters: BTreeMap::from([(
                "customer_id".to_owned(),
                FilterValue::Number(42.0),
            )]),
            ..ExportConfiguration::default()
        };

        let preset = match service
            .save_preset(SavePresetInput {
                name: "pending payments".to_owned(),
                description: Some("reconciliation".to_owned()),
                configuration: configuration.clone(),
            })
            .await
        {
            Ok(preset) => preset,
            Err(error) => panic!("save failed: {error}"),
        };

        let applied = service.apply_preset(preset.id()).await;
        assert_eq!(applied.ok(), Some(configuration));
    }

    #[tokio::test]
    async fn apply_preset_with_corrupt_query_string_yields_empty_configuration() {
        let (service, repository) = service_with_repository();

        let preset = match Preset::new(
            PresetId::new(),
            "legacy",
            None,
            "ty",
            "form=%7Bnot-json&&&=broken",
        ) {
            Ok(preset) => preset,
            Err(error) => panic!("preset construction failed: {error}"),
        };
        let id = preset.id();
        assert!(repository.save(preset).await.is_ok());

        let applied = service.apply_preset(id).await;
        assert_eq!(applied.ok(), Some(ExportConfiguration::default()));
    }

    #[tokio::test]
    async fn get_preset_reports_missing_ids() {
        let (service, _) = service_with_repository();

        let result = service.get_preset(PresetId::new()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_preset_keeps_the_identifier_and_reencodes() {
        let (service, _) = service_with_repository();

        let preset = match service
            .save_preset(SavePresetInput {
                name: "drafts".to_owned(),
                description: None,
                configuration: ExportConfiguration {
                    entity: Some(ExportEntity::Invoices),
                    ..ExportConfiguration::default()
                },
            })
            .await
        {
            Ok(preset) => preset,
            Err(error) => panic!("save failed: {error}"),
        };

        let updated = service
            .update_preset(
                preset.id(),
                SavePresetInput {
                    name: "issued".to_owned(),
                    description: None,
                    configuration: ExportConfiguration {
                        entity: Some(ExportEntity::Invoices),
                        include_pending: TriState::False,
                        ..ExportConfiguration::default()
                    },
                },
            )
            .await;

        let updated = match updated {
            Ok(preset) => preset,
            Err(error) => panic!("update failed: {error}"),
        };
        assert_eq!(updated.id(), preset.id());
        assert_eq!(
            updated.query_string(),
            "entity=invoices&include_pending=false"
        );
    }

    #[tokio::test]
    async fn update_preset_rejects_missing_ids() {
        let (service, _) = service_with_repository();

        let result = service
            .update_preset(
                PresetId::new(),
                SavePresetInput {
                    name: "ghost".to_owned(),
                    description: None,
                    configuration: ExportConfiguration {
                        entity: Some(ExportEntity::Customers),
                        ..ExportConfiguration::default()
                    },
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
