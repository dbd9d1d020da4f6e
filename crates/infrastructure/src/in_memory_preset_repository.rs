use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vodokanal_application::PresetRepository;
use vodokanal_core::{AppError, AppResult};
use vodokanal_domain::{Preset, PresetId};

/// In-memory preset repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryPresetRepository {
    presets: RwLock<HashMap<PresetId, Preset>>,
}

impl InMemoryPresetRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            presets: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl PresetRepository for InMemoryPresetRepository {
    async fn save(&self, preset: Preset) -> AppResult<()> {
        let mut presets = self.presets.write().await;

        if presets.contains_key(&preset.id()) {
            return Err(AppError::Conflict(format!(
                "preset '{}' already exists",
                preset.id()
            )));
        }

        presets.insert(preset.id(), preset);
        Ok(())
    }

    async fn list(&self, target: Option<&str>) -> AppResult<Vec<Preset>> {
        let presets = self.presets.read().await;

        let mut values: Vec<Preset> = presets
            .values()
            .filter(|preset| target.is_none_or(|target| preset.target().as_str() == target))
            .cloned()
            .collect();
        values.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));

        Ok(values)
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
        if self.presets.write().await.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("preset '{id}' does not exist")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryPresetRepository;
    use vodokanal_application::PresetRepository;
    use vodokanal_core::AppError;
    use vodokanal_domain::{Preset, PresetId};

    fn preset(name: &str, target: &str) -> Preset {
        match Preset::new(PresetId::new(), name, None, target, "entity=invoices") {
            Ok(preset) => preset,
            Err(error) => panic!("preset construction failed: {error}"),
        }
    }

    #[tokio::test]
    async fn save_rejects_duplicate_identifiers() {
        let repository = InMemoryPresetRepository::new();
        let preset = preset("monthly", "invoices");

        assert!(repository.save(preset.clone()).await.is_ok());
        let result = repository.save(preset).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn list_filters_by_target_and_sorts_by_name() {
        let repository = InMemoryPresetRepository::new();
        assert!(repository.save(preset("zealous", "ty")).await.is_ok());
        assert!(repository.save(preset("annual", "ty")).await.is_ok());
        assert!(repository.save(preset("other", "payments")).await.is_ok());

        let listed = match repository.list(Some("ty")).await {
            Ok(listed) => listed,
            Err(error) => panic!("list failed: {error}"),
        };
        let names: Vec<&str> = listed.iter().map(|preset| preset.name().as_str()).collect();
        assert_eq!(names, vec!["annual", "zealous"]);
    }

    #[tokio::test]
    async fn update_and_delete_require_an_existing_preset() {
        let repository = InMemoryPresetRepository::new();
        let missing = preset("ghost", "ty");

        assert!(matches!(
            repository.update(missing.clone()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repository.delete(missing.id()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
