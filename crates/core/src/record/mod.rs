use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{render::SphereSnapshot, Result};

/// Configuration options for the recording subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSettings {
    /// Keep one frame out of every `stride` frames.
    pub stride: u32,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self { stride: 1 }
    }
}

/// One captured frame of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: f64,
    pub hover: bool,
    pub spheres: Vec<SphereSnapshot>,
}

/// Collects frame snapshots so a headless run can be inspected afterwards.
#[derive(Debug, Default)]
pub struct Recorder {
    settings: RecordingSettings,
    is_recording: bool,
    frames: Vec<FrameRecord>,
}

impl Recorder {
    pub fn new(settings: RecordingSettings) -> Self {
        Self {
            settings,
            is_recording: false,
            frames: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.is_recording = true;
    }

    pub fn stop(&mut self) {
        self.is_recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn capture(&mut self, record: FrameRecord) {
        if !self.is_recording {
            return;
        }
        let stride = u64::from(self.settings.stride.max(1));
        if record.frame % stride == 0 {
            self.frames.push(record);
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.frames)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
