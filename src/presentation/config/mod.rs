mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    CardSettings, CorsSettings, ExportSettings, LimitSettings, LoggingSettings, ServerSettings,
    Settings, TranscriptionProviderSetting, TranscriptionSettings,
};
