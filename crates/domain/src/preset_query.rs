//! Bidirectional codec between an [`ExportConfiguration`] and the flat,
//! URL-encoded query string persisted with a preset.
//!
//! `encode` and `decode` are independent pure functions and both are total:
//! encode falls back to a whole-configuration JSON document under the `form`
//! key when the flat shape cannot carry a value, and decode treats every
//! malformed field as absent instead of failing.

use serde_json::{Map, Number, Value};
use url::form_urlencoded;
use vodokanal_core::{AppError, AppResult, TriState};

use crate::export::{ExportConfiguration, FilterValue};

const KEY_FORMAT: &str = "export";
const KEY_ENTITY: &str = "entity";
const KEY_FILENAME: &str = "filename";
const KEY_INCLUDE_PENDING: &str = "include_pending";
const KEY_FIELDS: &str = "fields";
const KEY_IDS: &str = "ids";
const KEY_FORM: &str = "form";

const INCLUDE_PREFIX: &str = "include.";
const FILTERS_PREFIX: &str = "filters.";

/// Serializes a configuration into a flat query string.
///
/// Never fails: when the flat shape cannot represent a value the whole
/// configuration is written as a JSON document under the `form` key.
/// Output ordering follows field declaration order but only key/value set
/// membership is contractual.
#[must_use]
pub fn encode(configuration: &ExportConfiguration) -> String {
    encode_flat(configuration).unwrap_or_else(|_| encode_fallback(configuration))
}

/// Parses a query string back into a partial configuration.
///
/// Never fails: unknown keys are ignored and unreadable values leave the
/// corresponding field unset. A corrupt query string decodes to an empty
/// configuration.
#[must_use]
pub fn decode(query_string: &str) -> ExportConfiguration {
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query_string.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    // The escape-hatch document bypasses every flat rule when it parses.
    if let Some((_, raw)) = pairs.iter().find(|(key, _)| key == KEY_FORM)
        && let Ok(configuration) = serde_json::from_str::<ExportConfiguration>(raw)
    {
        return configuration;
    }

    let mut configuration = ExportConfiguration::default();
    for (key, value) in &pairs {
        match key.as_str() {
            KEY_FORMAT => configuration.format = value.parse().ok(),
            KEY_ENTITY => configuration.entity = value.parse().ok(),
            KEY_FILENAME => {
                configuration.filename = (!value.is_empty()).then(|| value.clone());
            }
            KEY_INCLUDE_PENDING => {
                configuration.include_pending = TriState::parse_repr(value);
            }
            KEY_FIELDS => configuration.fields = split_segments(value),
            KEY_IDS => {
                configuration.ids = split_segments(value)
                    .iter()
                    .filter_map(|segment| segment.parse().ok())
                    .collect();
            }
            _ => {
                if let Some(flag) = key.strip_prefix(INCLUDE_PREFIX) {
                    configuration.include.set(flag, TriState::parse_repr(value));
                } else if let Some(name) = key.strip_prefix(FILTERS_PREFIX) {
                    configuration
                        .filters
                        .insert(name.to_owned(), coerce_filter_value(value));
                }
            }
        }
    }

    configuration
}

fn encode_flat(configuration: &ExportConfiguration) -> AppResult<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let Some(format) = configuration.format {
        serializer.append_pair(KEY_FORMAT, format.as_str());
    }
    if let Some(entity) = configuration.entity {
        serializer.append_pair(KEY_ENTITY, entity.as_str());
    }
    if let Some(filename) = configuration.filename.as_deref() {
        let trimmed = filename.trim();
        if !trimmed.is_empty() {
            serializer.append_pair(KEY_FILENAME, trimmed);
        }
    }
    if let Some(repr) = configuration.include_pending.repr() {
        serializer.append_pair(KEY_INCLUDE_PENDING, repr);
    }
    for (name, state) in configuration.include.entries() {
        if let Some(repr) = state.repr() {
            serializer.append_pair(&format!("{INCLUDE_PREFIX}{name}"), repr);
        }
    }
    if !configuration.fields.is_empty() {
        serializer.append_pair(KEY_FIELDS, &configuration.fields.join(","));
    }
    if !configuration.ids.is_empty() {
        let joined = configuration
            .ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        serializer.append_pair(KEY_IDS, &joined);
    }
    for (name, value) in &configuration.filters {
        if value.is_blank() {
            continue;
        }
        serializer.append_pair(
            &format!("{FILTERS_PREFIX}{name}"),
            &stringify_filter_value(value)?,
        );
    }

    Ok(serializer.finish())
}

fn encode_fallback(configuration: &ExportConfiguration) -> String {
    let document = configuration_document(configuration);
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair(KEY_FORM, &document.to_string());
    serializer.finish()
}

fn stringify_filter_value(value: &FilterValue) -> AppResult<String> {
    match value {
        FilterValue::Text(text) => Ok(text.clone()),
        FilterValue::Flag(flag) => Ok(flag.to_string()),
        FilterValue::Number(number) if number.is_finite() => Ok(number.to_string()),
        FilterValue::Number(number) => Err(AppError::Validation(format!(
            "filter value '{number}' is not a finite number"
        ))),
        FilterValue::List(values) => Ok(values.join(",")),
    }
}

/// Whole-configuration JSON document for the `form` escape hatch.
///
/// Filter values JSON cannot carry (non-finite numbers) are dropped, the
/// same way blank values are dropped from the flat shape.
fn configuration_document(configuration: &ExportConfiguration) -> Value {
    let mut document = Map::new();

    if let Some(format) = configuration.format {
        document.insert("format".to_owned(), Value::String(format.as_str().to_owned()));
    }
    if let Some(entity) = configuration.entity {
        document.insert("entity".to_owned(), Value::String(entity.as_str().to_owned()));
    }
    if let Some(filename) = configuration.filename.as_deref() {
        let trimmed = filename.trim();
        if !trimmed.is_empty() {
            document.insert("filename".to_owned(), Value::String(trimmed.to_owned()));
        }
    }
    if let Some(repr) = configuration.include_pending.repr() {
        document.insert("include_pending".to_owned(), Value::String(repr.to_owned()));
    }
    if !configuration.include.is_empty() {
        let mut flags = Map::new();
        for (name, state) in configuration.include.entries() {
            if let Some(repr) = state.repr() {
                flags.insert(name.to_owned(), Value::String(repr.to_owned()));
            }
        }
        document.insert("include".to_owned(), Value::Object(flags));
    }
    if !configuration.fields.is_empty() {
        document.insert(
            "fields".to_owned(),
            Value::Array(
                configuration
                    .fields
                    .iter()
                    .map(|field| Value::String(field.clone()))
                    .collect(),
            ),
        );
    }
    if !configuration.ids.is_empty() {
        document.insert(
            "ids".to_owned(),
            Value::Array(configuration.ids.iter().map(|id| Value::from(*id)).collect()),
        );
    }
    if !configuration.filters.is_empty() {
        let mut filters = Map::new();
        for (name, value) in &configuration.filters {
            if value.is_blank() {
                continue;
            }
            if let Some(json_value) = filter_value_document(value) {
                filters.insert(name.clone(), json_value);
            }
        }
        if !filters.is_empty() {
            document.insert("filters".to_owned(), Value::Object(filters));
        }
    }

    Value::Object(document)
}

fn filter_value_document(value: &FilterValue) -> Option<Value> {
    match value {
        FilterValue::Text(text) => Some(Value::String(text.clone())),
        FilterValue::Flag(flag) => Some(Value::Bool(*flag)),
        FilterValue::Number(number) => Number::from_f64(*number).map(Value::Number),
        FilterValue::List(values) => Some(Value::Array(
            values.iter().map(|item| Value::String(item.clone())).collect(),
        )),
    }
}

/// Coerces a raw `filters.*` value with the contractual precedence:
/// comma present, then finite number, then verbatim text.
fn coerce_filter_value(raw: &str) -> FilterValue {
    if raw.contains(',') {
        return FilterValue::List(raw.split(',').map(str::to_owned).collect());
    }
    if let Ok(number) = raw.parse::<f64>()
        && number.is_finite()
    {
        return FilterValue::Number(number);
    }

    FilterValue::Text(raw.to_owned())
}

fn split_segments(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}
