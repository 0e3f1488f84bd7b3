//! Media sources feeding the capture loop.

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use rand::Rng;

use crate::api::AudioFeatures;
use crate::settings::CameraSettings;

/// Chance that a sampled frame contains a usable face.
const FACE_DETECT_PROBABILITY: f64 = 0.7;

/// One sampled frame, ready to ship to the analysis service.
#[derive(Debug, Clone)]
pub struct FrameSample {
    /// Base64-encoded JPEG frame.
    pub video_base64: String,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
    pub audio: Option<AudioFeatures>,
}

/// A device the capture loop can pull frames from. Implementations own the
/// device handle; `release` must leave it reusable by other processes.
pub trait MediaSource: Send {
    /// Open the device. Called once before the loop starts.
    fn acquire(&mut self) -> Result<()>;

    /// Grab the current frame.
    fn sample(&mut self) -> Result<FrameSample>;

    /// Whether the current frame contains a face worth analyzing.
    fn face_visible(&mut self) -> bool;

    /// Close the device. Must be idempotent.
    fn release(&mut self);
}

/// Stand-in camera that emits synthetic frames. Real frame grabbing plugs in
/// behind the same trait.
pub struct SyntheticCamera {
    settings: CameraSettings,
    acquired: bool,
}

impl SyntheticCamera {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            acquired: false,
        }
    }
}

impl MediaSource for SyntheticCamera {
    fn acquire(&mut self) -> Result<()> {
        // Negative device index models a denied camera permission.
        if self.settings.device < 0 {
            bail!("camera access denied for device {}", self.settings.device);
        }
        self.acquired = true;
        Ok(())
    }

    fn sample(&mut self) -> Result<FrameSample> {
        if !self.acquired {
            bail!("camera sampled before acquire");
        }

        let mut rng = rand::thread_rng();
        let mut frame = vec![0u8; 512];
        rng.fill(frame.as_mut_slice());

        Ok(FrameSample {
            video_base64: STANDARD.encode(&frame),
            width: self.settings.width,
            height: self.settings.height,
            captured_at: Utc::now(),
            audio: Some(AudioFeatures {
                duration: 2.0,
                sample_rate: 44_100,
                features: "placeholder_audio_features".to_string(),
            }),
        })
    }

    fn face_visible(&mut self) -> bool {
        rand::thread_rng().gen_bool(FACE_DETECT_PROBABILITY)
    }

    fn release(&mut self) {
        self.acquired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_fails_for_denied_device() {
        let mut camera = SyntheticCamera::new(CameraSettings {
            device: -1,
            width: 640,
            height: 480,
        });
        assert!(camera.acquire().is_err());
    }

    #[test]
    fn sample_requires_acquire() {
        let mut camera = SyntheticCamera::new(CameraSettings::default());
        assert!(camera.sample().is_err());

        camera.acquire().unwrap();
        let sample = camera.sample().unwrap();
        assert!(!sample.video_base64.is_empty());
        assert_eq!(sample.width, 640);

        camera.release();
        assert!(camera.sample().is_err());
    }
}
