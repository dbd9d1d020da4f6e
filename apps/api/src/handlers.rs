mod health;
mod presets;

pub use health::health_handler;
pub use presets::{
    create_preset_handler, delete_preset_handler, get_preset_configuration_handler,
    get_preset_handler, list_presets_handler, update_preset_handler,
};
