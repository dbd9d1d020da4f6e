//! Application use-cases and persistence ports.

#![forbid(unsafe_code)]

mod preset_ports;
mod preset_service;

pub use preset_ports::PresetRepository;
pub use preset_service::{PresetService, SavePresetInput};
