use async_trait::async_trait;
use vodokanal_core::AppResult;
use vodokanal_domain::{Preset, PresetId};

/// Repository port for preset persistence.
#[async_trait]
pub trait PresetRepository: Send + Sync {
    /// Persists a new preset.
    async fn save(&self, preset: Preset) -> AppResult<()>;

    /// Lists presets, optionally restricted to one target.
    async fn list(&self, target: Option<&str>) -> AppResult<Vec<Preset>>;

    /// Looks up a preset by identifier.
    async fn find(&self, id: PresetId) -> AppResult<Option<Preset>>;

    /// Replaces an existing preset.
    async fn update(&self, preset: Preset) -> AppResult<()>;

    /// Deletes a preset by identifier.
    async fn delete(&self, id: PresetId) -> AppResult<()>;
}
