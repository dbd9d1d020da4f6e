use vodokanal_application::PresetService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub preset_service: PresetService,
}
