use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodokanal_core::{AppResult, NonEmptyString};

/// Stable preset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetId(Uuid);

impl PresetId {
    /// Creates a random preset identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a preset identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PresetId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PresetId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A named, persisted filter/export configuration.
///
/// `query_string` is exactly the output of the preset query codec; `target`
/// groups presets by the export entity they apply to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    id: PresetId,
    name: NonEmptyString,
    description: Option<String>,
    target: NonEmptyString,
    query_string: String,
}

impl Preset {
    /// Creates a validated preset record.
    pub fn new(
        id: PresetId,
        name: impl Into<String>,
        description: Option<String>,
        target: impl Into<String>,
        query_string: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
            target: NonEmptyString::new(target)?,
            query_string: query_string.into(),
        })
    }

    /// Returns the preset identifier.
    #[must_use]
    pub fn id(&self) -> PresetId {
        self.id
    }

    /// Returns the preset display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the preset-storage grouping key.
    #[must_use]
    pub fn target(&self) -> &NonEmptyString {
        &self.target
    }

    /// Returns the encoded configuration query string.
    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query_string
    }
}

#[cfg(test)]
mod tests {
    use super::{Preset, PresetId};

    #[test]
    fn preset_requires_non_empty_name() {
        let result = Preset::new(PresetId::new(), "  ", None, "ty", "");
        assert!(result.is_err());
    }

    #[test]
    fn blank_description_is_dropped() {
        let preset = Preset::new(
            PresetId::new(),
            "overdue invoices",
            Some("   ".to_owned()),
            "invoices",
            "entity=invoices",
        );
        assert_eq!(
            preset.ok().and_then(|preset| preset.description().map(str::to_owned)),
            None
        );
    }
}
