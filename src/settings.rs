use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".into(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Seconds between capture ticks.
    pub interval_secs: u64,
    /// Upper bound on one capture-and-analyze attempt.
    pub tick_timeout_secs: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            interval_secs: 3,
            tick_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Device index; negative means access is denied.
    pub device: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: 0,
            width: 640,
            height: 480,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    api: ApiSettings,
    capture: CaptureSettings,
    camera: CameraSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn api(&self) -> ApiSettings {
        self.data.read().unwrap().api.clone()
    }

    pub fn capture(&self) -> CaptureSettings {
        self.data.read().unwrap().capture.clone()
    }

    pub fn camera(&self) -> CameraSettings {
        self.data.read().unwrap().camera.clone()
    }

    pub fn update_capture(&self, settings: CaptureSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.capture = settings;
        self.persist(&guard)
    }

    pub fn update_api_base_url(&self, base_url: &str) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.api.base_url = base_url.to_string();
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("maitri-settings-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = SettingsStore::new(scratch_path()).unwrap();
        assert_eq!(store.capture().interval_secs, 3);
        assert_eq!(store.api().base_url, "http://localhost:5000/api");
        assert_eq!(store.camera().device, 0);
    }

    #[test]
    fn update_persists_and_reloads() {
        let path = scratch_path();
        let store = SettingsStore::new(path.clone()).unwrap();
        store
            .update_capture(CaptureSettings {
                interval_secs: 7,
                tick_timeout_secs: 20,
            })
            .unwrap();

        let reloaded = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.capture().interval_secs, 7);
        // Unrelated sections keep their defaults.
        assert_eq!(reloaded.camera().width, 640);
        let _ = fs::remove_file(path);
    }
}
