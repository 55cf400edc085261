//! Core library for the decorative sphere widgets.
//!
//! The interesting part is the animation-timing core: easing curves
//! ([`easing`]), multi-phase rotation sequences ([`sequence`]) and the
//! per-sphere registry that steps them every frame ([`timeline`]). Around it
//! sit thin stand-ins for what a browser page would provide: a camera and
//! picking ([`scene`], [`hit`]), continuous motion ([`driver`]), a video
//! texture source ([`video`]) and a render target ([`render`]). [`Stage`]
//! wires everything together behind a small event/frame API so the widgets
//! can be driven headlessly.

pub mod config;
pub mod driver;
pub mod easing;
pub mod error;
pub mod hit;
pub mod input;
pub mod record;
pub mod render;
pub mod scene;
pub mod sequence;
pub mod stage;
pub mod timeline;
pub mod video;
pub mod widget;

pub use config::{
    AppConfig, CameraConfig, FloatConfig, IdleSphereConfig, MotionConfig, ScrollSphereConfig,
    VideoConfig, ViewportConfig,
};
pub use driver::{Fade, SceneDriver};
pub use easing::{ease_out_cubic, ease_out_quad, CubicBezier, Easing};
pub use error::{Result, SphereError};
pub use hit::{test_hit, HoverState, Ray};
pub use input::{CanvasRect, HostEvent, HostRequest, PointerState, TimedEvent};
pub use record::{FrameRecord, Recorder, RecordingSettings};
pub use render::{RenderGraph, RenderTarget, SphereSnapshot};
pub use scene::{Camera, Scene, Sphere, SphereDescriptor, SphereId};
pub use sequence::{AnimationSequence, Phase, SequenceKind, SequenceState, StepOutcome, Target};
pub use stage::Stage;
pub use timeline::{FrameClock, Scheduler, SequenceEvent, SequenceHandle};
pub use video::{
    AutoplayPolicy, ElementState, HeadlessVideo, PlaybackState, VideoPlayback, VideoSource,
};
pub use widget::{AppearState, IdleSphere, ScrollSphere};
