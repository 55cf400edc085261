use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::{config::VideoConfig, Result, SphereError};

/// What prompted a call to [`VideoSource::play`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayTrigger {
    /// Page load; browsers may refuse this.
    Autoplay,
    /// A click or other user gesture.
    UserGesture,
}

/// Host-side video element backing the sphere texture.
pub trait VideoSource {
    fn set_muted(&mut self, muted: bool) -> Result<()>;
    fn set_looping(&mut self, looping: bool) -> Result<()>;
    fn play(&mut self, trigger: PlayTrigger) -> Result<()>;
    fn is_playing(&self) -> bool;
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Binding of a video element to the sphere material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoTexture {
    pub element_id: String,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl VideoTexture {
    pub fn linear(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Stopped,
    Playing,
    /// Autoplay was refused; waiting for a user gesture.
    Blocked,
}

/// Owns the video source and tracks whether playback got going.
pub struct VideoPlayback {
    source: Box<dyn VideoSource>,
    texture: VideoTexture,
    state: PlaybackState,
}

impl VideoPlayback {
    /// Applies the muted and loop flags to `source` before anything plays.
    pub fn new(mut source: Box<dyn VideoSource>, config: &VideoConfig) -> Result<Self> {
        source.set_muted(config.muted)?;
        source.set_looping(config.looping)?;
        Ok(Self {
            source,
            texture: VideoTexture::linear(config.element_id.clone()),
            state: PlaybackState::Stopped,
        })
    }

    pub fn texture(&self) -> &VideoTexture {
        &self.texture
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Attempts autoplay. A rejection is logged and leaves playback blocked;
    /// it is not retried until [`VideoPlayback::resume_on_gesture`].
    pub fn autoplay(&mut self) {
        self.try_play(PlayTrigger::Autoplay);
    }

    /// Retries playback after a user gesture if autoplay was refused.
    pub fn resume_on_gesture(&mut self) {
        if self.state == PlaybackState::Blocked {
            self.try_play(PlayTrigger::UserGesture);
        }
    }

    fn try_play(&mut self, trigger: PlayTrigger) {
        match self.source.play(trigger) {
            Ok(()) => {
                tracing::info!(element = %self.texture.element_id, ?trigger, "video playing");
                self.state = PlaybackState::Playing;
            }
            Err(err) => {
                tracing::warn!(
                    element = %self.texture.element_id,
                    error = %err,
                    "video playback needs a user interaction"
                );
                self.state = PlaybackState::Blocked;
            }
        }
    }
}

impl std::fmt::Debug for VideoPlayback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoPlayback")
            .field("texture", &self.texture)
            .field("state", &self.state)
            .finish()
    }
}

/// Whether a [`HeadlessVideo`] accepts playback without a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoplayPolicy {
    #[default]
    Allowed,
    /// Muted videos may autoplay; anything else needs a gesture.
    AllowMuted,
    RequiresGesture,
}

/// Observable state of a [`HeadlessVideo`] element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementState {
    pub muted: bool,
    pub looping: bool,
    pub playing: bool,
    /// Number of `play()` calls, successful or not.
    pub attempts: usize,
}

/// In-memory video element used by the headless host and tests. Clones share
/// the same element, so a caller can keep one to watch what the playback
/// side did with it.
#[derive(Debug, Clone, Default)]
pub struct HeadlessVideo {
    policy: AutoplayPolicy,
    element: Arc<Mutex<ElementState>>,
}

impl HeadlessVideo {
    pub fn new(policy: AutoplayPolicy) -> Self {
        Self {
            policy,
            element: Arc::default(),
        }
    }

    pub fn element(&self) -> Result<ElementState> {
        Ok(*self.lock_element()?)
    }

    fn lock_element(&self) -> Result<MutexGuard<'_, ElementState>> {
        self.element
            .lock()
            .map_err(|_| SphereError::msg("video element has been poisoned"))
    }
}

impl VideoSource for HeadlessVideo {
    fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.lock_element()?.muted = muted;
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.lock_element()?.looping = looping;
        Ok(())
    }

    fn play(&mut self, trigger: PlayTrigger) -> Result<()> {
        let policy = self.policy;
        let mut element = self.lock_element()?;
        element.attempts += 1;
        let allowed = match (policy, trigger) {
            (_, PlayTrigger::UserGesture) | (AutoplayPolicy::Allowed, _) => true,
            (AutoplayPolicy::AllowMuted, PlayTrigger::Autoplay) => element.muted,
            (AutoplayPolicy::RequiresGesture, PlayTrigger::Autoplay) => false,
        };
        if allowed {
            element.playing = true;
            Ok(())
        } else {
            Err(SphereError::AutoplayRejected(
                "play() requires a user gesture".to_string(),
            ))
        }
    }

    fn is_playing(&self) -> bool {
        self.lock_element().is_ok_and(|element| element.playing)
    }
}
