use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use vodokanal_core::{AppError, TriState};

/// Supported export output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Portable document report.
    Pdf,
    /// Spreadsheet report.
    Xlsx,
}

impl ExportFormat {
    /// All supported formats.
    pub const ALL: [Self; 2] = [Self::Pdf, Self::Xlsx];

    /// Returns a stable storage value for the format.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pdf" => Ok(Self::Pdf),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(AppError::Validation(format!(
                "unknown export format '{value}'"
            ))),
        }
    }
}

/// Backend resource a report export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportEntity {
    /// Utility-connection permit records (ТУ).
    TechnicalConditions,
    /// Legal entities.
    Entities,
    /// Accounting protocols.
    Protocols,
    /// Customer records.
    Customers,
    /// Payment records.
    Payments,
    /// Issued invoices.
    Invoices,
    /// Connection applications.
    Applications,
}

impl ExportEntity {
    /// All supported export entities.
    pub const ALL: [Self; 7] = [
        Self::TechnicalConditions,
        Self::Entities,
        Self::Protocols,
        Self::Customers,
        Self::Payments,
        Self::Invoices,
        Self::Applications,
    ];

    /// Returns a stable storage value for the entity.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalConditions => "technical_conditions",
            Self::Entities => "entities",
            Self::Protocols => "protocols",
            Self::Customers => "customers",
            Self::Payments => "payments",
            Self::Invoices => "invoices",
            Self::Applications => "applications",
        }
    }

    /// Returns the preset-storage grouping key.
    ///
    /// Equal to [`Self::as_str`] except for the legacy rename of
    /// technical conditions to `ty`.
    #[must_use]
    pub fn preset_target(&self) -> &'static str {
        match self {
            Self::TechnicalConditions => "ty",
            other => other.as_str(),
        }
    }
}

impl FromStr for ExportEntity {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "technical_conditions" => Ok(Self::TechnicalConditions),
            "entities" => Ok(Self::Entities),
            "protocols" => Ok(Self::Protocols),
            "customers" => Ok(Self::Customers),
            "payments" => Ok(Self::Payments),
            "invoices" => Ok(Self::Invoices),
            "applications" => Ok(Self::Applications),
            _ => Err(AppError::Validation(format!(
                "unknown export entity '{value}'"
            ))),
        }
    }
}

/// Tri-state inclusion flags for related resources in an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncludeFlags {
    /// Include the customer record.
    pub customer: TriState,
    /// Include the related legal entity.
    pub entity: TriState,
    /// Include the accounting protocol.
    pub protocol: TriState,
    /// Include issued invoices.
    pub invoices: TriState,
    /// Include registered payments.
    pub payments: TriState,
}

impl IncludeFlags {
    /// Fixed wire names of the five flags, in serialization order.
    pub const NAMES: [&'static str; 5] =
        ["customer", "entity", "protocol", "invoices", "payments"];

    /// Returns `(name, state)` pairs in serialization order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, TriState); 5] {
        [
            ("customer", self.customer),
            ("entity", self.entity),
            ("protocol", self.protocol),
            ("invoices", self.invoices),
            ("payments", self.payments),
        ]
    }

    /// Sets a flag by wire name; unknown names are ignored.
    pub fn set(&mut self, name: &str, state: TriState) {
        match name {
            "customer" => self.customer = state,
            "entity" => self.entity = state,
            "protocol" => self.protocol = state,
            "invoices" => self.invoices = state,
            "payments" => self.payments = state,
            _ => {}
        }
    }

    /// Returns whether every flag is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, state)| state.is_unset())
    }
}

/// Scalar or list value carried under a `filters.*` key.
///
/// `Flag` exists on the encode side only: booleans are stringified on the
/// wire and decode back as [`FilterValue::Text`]. A single text value that
/// parses as a finite number decodes back as [`FilterValue::Number`]. Both
/// asymmetries are contractual, not accidental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A sequence of string values.
    List(Vec<String>),
    /// A boolean value.
    Flag(bool),
    /// A numeric value.
    Number(f64),
    /// A free-text value.
    Text(String),
}

impl FilterValue {
    /// Returns whether the value contributes nothing to a query string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Flag(_) | Self::Number(_) => false,
        }
    }
}

/// Structured export/filter configuration captured from a reporting form.
///
/// Every field is optional; an empty configuration is valid. Filter keys are
/// whatever the consuming form placed under the `filters.*` namespace, never
/// validated here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfiguration {
    /// Export output format.
    pub format: Option<ExportFormat>,
    /// Export target entity.
    pub entity: Option<ExportEntity>,
    /// Requested output file name.
    pub filename: Option<String>,
    /// Whether pending payments/invoices are included.
    pub include_pending: TriState,
    /// Related-resource inclusion flags.
    pub include: IncludeFlags,
    /// Ordered field names selected for export.
    pub fields: Vec<String>,
    /// Ordered record identifiers restricting the export.
    pub ids: Vec<i64>,
    /// Filter-field values keyed by caller-owned names.
    pub filters: BTreeMap<String, FilterValue>,
}

impl ExportConfiguration {
    /// Returns whether every field is absent or empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.format.is_none()
            && self.entity.is_none()
            && self.filename.is_none()
            && self.include_pending.is_unset()
            && self.include.is_empty()
            && self.fields.is_empty()
            && self.ids.is_empty()
            && self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ExportEntity, ExportFormat, FilterValue, IncludeFlags};
    use vodokanal_core::TriState;

    #[test]
    fn entity_storage_values_round_trip() {
        for entity in ExportEntity::ALL {
            let parsed = ExportEntity::from_str(entity.as_str());
            assert_eq!(parsed.ok(), Some(entity));
        }
    }

    #[test]
    fn format_rejects_unknown_values() {
        assert!(ExportFormat::from_str("csv").is_err());
    }

    #[test]
    fn technical_conditions_target_uses_legacy_rename() {
        assert_eq!(ExportEntity::TechnicalConditions.preset_target(), "ty");
        assert_eq!(ExportEntity::Payments.preset_target(), "payments");
    }

    #[test]
    fn include_flags_ignore_unknown_names() {
        let mut flags = IncludeFlags::default();
        flags.set("owner", TriState::True);
        assert!(flags.is_empty());

        flags.set("customer", TriState::False);
        assert!(!flags.is_empty());
        assert_eq!(flags.customer, TriState::False);
    }

    #[test]
    fn blank_filter_values_are_detected() {
        assert!(FilterValue::Text("  ".to_owned()).is_blank());
        assert!(FilterValue::List(Vec::new()).is_blank());
        assert!(!FilterValue::Flag(false).is_blank());
        assert!(!FilterValue::Number(0.0).is_blank());
    }
}
