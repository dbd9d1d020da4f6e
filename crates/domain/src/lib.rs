//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod export;
mod preset;
pub mod preset_query;

pub use export::{ExportConfiguration, ExportEntity, ExportFormat, FilterValue, IncludeFlags};
pub use preset::{Preset, PresetId};
