use std::collections::BTreeMap;

use serde_json::Value;
use vodokanal_core::{AppError, AppResult, TriState};
use vodokanal_domain::{ExportConfiguration, FilterValue, IncludeFlags, Preset};

use super::types::{ExportConfigurationDto, IncludeFlagsDto, PresetResponse};

impl From<Preset> for PresetResponse {
    fn from(preset: Preset) -> Self {
        Self {
            id: preset.id().as_uuid(),
            name: preset.name().as_str().to_owned(),
            description: preset.description().map(str::to_owned),
            target: preset.target().as_str().to_owned(),
            query_string: preset.query_string().to_owned(),
        }
    }
}

impl TryFrom<ExportConfigurationDto> for ExportConfiguration {
    type Error = AppError;

    fn try_from(dto: ExportConfigurationDto) -> Result<Self, Self::Error> {
        let mut include = IncludeFlags::default();
        if let Some(flags) = dto.include {
            include.customer = TriState::from(flags.customer);
            include.entity = TriState::from(flags.entity);
            include.protocol = TriState::from(flags.protocol);
            include.invoices = TriState::from(flags.invoices);
            include.payments = TriState::from(flags.payments);
        }

        let filters = dto
            .filters
            .unwrap_or_default()
            .into_iter()
            .map(|(name, value)| {
                filter_value_from_json(name.as_str(), value).map(|value| (name, value))
            })
            .collect::<AppResult<BTreeMap<_, _>>>()?;

        Ok(Self {
            format: dto.format.as_deref().map(str::parse).transpose()?,
            entity: dto.entity.as_deref().map(str::parse).transpose()?,
            filename: dto.filename,
            include_pending: TriState::from(dto.include_pending),
            include,
            fields: dto.fields.unwrap_or_default(),
            ids: dto.ids.unwrap_or_default(),
            filters,
        })
    }
}

impl From<ExportConfiguration> for ExportConfigurationDto {
    fn from(configuration: ExportConfiguration) -> Self {
        let include = (!configuration.include.is_empty()).then(|| IncludeFlagsDto {
            customer: configuration.include.customer.as_bool(),
            entity: configuration.include.entity.as_bool(),
            protocol: configuration.include.protocol.as_bool(),
            invoices: configuration.include.invoices.as_bool(),
            payments: configuration.include.payments.as_bool(),
        });

        let filters = (!configuration.filters.is_empty()).then(|| {
            configuration
                .filters
                .into_iter()
                .map(|(name, value)| (name, filter_value_to_json(value)))
                .collect()
        });

        Self {
            format: configuration.format.map(|format| format.as_str().to_owned()),
            entity: configuration.entity.map(|entity| entity.as_str().to_owned()),
            filename: configuration.filename,
            include_pending: configuration.include_pending.as_bool(),
            include,
            fields: (!configuration.fields.is_empty()).then_some(configuration.fields),
            ids: (!configuration.ids.is_empty()).then_some(configuration.ids),
            filters,
        }
    }
}

fn filter_value_from_json(name: &str, value: Value) -> AppResult<FilterValue> {
    match value {
        Value::String(text) => Ok(FilterValue::Text(text)),
        Value::Bool(flag) => Ok(FilterValue::Flag(flag)),
        Value::Number(number) => number.as_f64().map(FilterValue::Number).ok_or_else(|| {
            AppError::Validation(format!("filter '{name}' holds a non-representable number"))
        }),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(AppError::Validation(format!(
                    "filter '{name}' sequences may only hold strings, got {other}"
                ))),
            })
            .collect::<AppResult<Vec<_>>>()
            .map(FilterValue::List),
        other => Err(AppError::Validation(format!(
            "filter '{name}' must be a string, number, boolean or string sequence, got {other}"
        ))),
    }
}

fn filter_value_to_json(value: FilterValue) -> Value {
    match value {
        FilterValue::Text(text) => Value::String(text),
        FilterValue::Flag(flag) => Value::Bool(flag),
        FilterValue::Number(number) => serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FilterValue::List(values) => {
            Value::Array(values.into_iter().map(Value::String).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::super::types::ExportConfigurationDto;
    use vodokanal_core::TriState;
    use vodokanal_domain::{ExportConfiguration, ExportEntity, ExportFormat, FilterValue};

    #[test]
    fn configuration_dto_converts_with_typed_fields() {
        let dto = ExportConfigurationDto {
            format: Some("xlsx".to_owned()),
            entity: Some("payments".to_owned()),
            include_pending: Some(true),
            filters: Some(BTreeMap::from([
                ("customer_id".to_owned(), json!(42)),
                ("statuses".to_owned(), json!(["sent", "paid"])),
            ])),
            ..ExportConfigurationDto::default()
        };

        let configuration = match ExportConfiguration::try_from(dto) {
            Ok(configuration) => configuration,
            Err(error) => panic!("conversion failed: {error}"),
        };
        assert_eq!(configuration.format, Some(ExportFormat::Xlsx));
        assert_eq!(configuration.entity, Some(ExportEntity::Payments));
        assert_eq!(configuration.include_pending, TriState::True);
        assert_eq!(
            configuration.filters.get("customer_id"),
            Some(&FilterValue::Number(42.0))
        );
        assert_eq!(
            configuration.filters.get("statuses"),
            Some(&FilterValue::List(vec!["sent".to_owned(), "paid".to_owned()]))
        );
    }

    #[test]
    fn configuration_dto_rejects_unknown_format() {
        let dto = ExportConfigurationDto {
            format: Some("csv".to_owned()),
            ..ExportConfigurationDto::default()
        };

        assert!(ExportConfiguration::try_from(dto).is_err());
    }

    #[test]
    fn configuration_dto_rejects_nested_filter_objects() {
        let dto = ExportConfigurationDto {
            filters: Some(BTreeMap::from([(
                "range".to_owned(),
                json!({"from": 1, "to": 2}),
            )])),
            ..ExportConfigurationDto::default()
        };

        assert!(ExportConfiguration::try_from(dto).is_err());
    }

    #[test]
    fn empty_collections_map_back_to_absent_fields() {
        let dto = ExportConfigurationDto::from(ExportConfiguration::default());
        assert_eq!(dto.fields, None);
        assert_eq!(dto.ids, None);
        assert_eq!(dto.filters, None);
        assert!(dto.include.is_none());
        assert_eq!(dto.include_pending, None);
    }
}
