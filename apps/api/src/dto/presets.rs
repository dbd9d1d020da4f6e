mod conversions;
mod types;

pub use types::{ExportConfigurationDto, IncludeFlagsDto, PresetResponse, SavePresetRequest};
