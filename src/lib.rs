pub mod alerts;
pub mod api;
pub mod capture;
pub mod chat;
pub mod emotion;
pub mod monitor;
pub mod session;
pub mod settings;
pub mod telemetry;

pub use alerts::{AlertDispatcher, EmergencyKind};
pub use api::ApiClient;
pub use capture::{MediaSource, SyntheticCamera};
pub use chat::ChatEngine;
pub use emotion::{EmotionReading, EmotionStore};
pub use monitor::MonitorController;
pub use settings::SettingsStore;
