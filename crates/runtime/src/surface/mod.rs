//! Presentation surface contract.
//!
//! Modes and the reward sequencer never draw anything themselves. They ask a
//! [`Surface`] to create opaque handles, restyle and animate them, and bind
//! input regions. Animations are fire-and-forget on the surface side; callers
//! own the timing and wait on the session clock.

mod handles;
mod recording;

use std::fmt;
use std::time::Duration;

pub use handles::{HandleSet, ScopedHandles};
pub use recording::{RecordingSurface, SurfaceOp};

/// Opaque identifier of a presentation element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Position in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at `distance` from `self` along `angle` (radians).
    pub fn offset_polar(self, angle: f32, distance: f32) -> Self {
        Self::new(self.x + angle.cos() * distance, self.y + angle.sin() * distance)
    }
}

/// Size of the drawable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Point at fractional coordinates of the area.
    pub fn at(&self, fx: f32, fy: f32) -> Point {
        Point::new(self.width * fx, self.height * fy)
    }

    /// `count` evenly spaced points on the horizontal line at `fy`.
    pub fn row(&self, count: usize, fy: f32) -> Vec<Point> {
        let step = self.width / (count as f32 + 1.0);
        (1..=count)
            .map(|i| Point::new(step * i as f32, self.height * fy))
            .collect()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextRole {
    Prompt,
    Option,
    Feedback,
    Multiplier,
    CoinAmount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconKind {
    Speaker,
    Gift,
    Treasure,
    Coin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Success,
    Explosion,
    Glow,
    Sparkle,
}

/// What a handle shows.
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    Text { text: String, role: TextRole },
    /// Tappable area, labelled for accessibility and debugging.
    Region { label: String },
    /// One progress dot of a streak round.
    Indicator { filled: bool },
    Divider,
    /// Full-screen dimming layer that swallows input.
    Overlay,
    Icon(IconKind),
    Particle(ParticleKind),
}

impl Visual {
    pub fn text(text: impl Into<String>, role: TextRole) -> Self {
        Visual::Text {
            text: text.into(),
            role,
        }
    }

    pub fn region(label: impl Into<String>) -> Self {
        Visual::Region {
            label: label.into(),
        }
    }
}

/// Style changes applied to an existing handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Normal,
    Correct,
    Wrong,
    Filled,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenKind {
    FadeIn,
    FadeOut,
    ScaleIn,
    Shake,
    Bounce,
    Pulse,
    Flash,
    /// Move by the given offset while fading out.
    Burst { dx: f32, dy: f32 },
}

/// Animation request. The surface plays it; the caller waits `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub duration: Duration,
}

impl Tween {
    pub const fn new(kind: TweenKind, duration: Duration) -> Self {
        Self { kind, duration }
    }
}

/// Rendering and audio device consumed by modes and the reward sequencer.
///
/// All calls are non-blocking. Destroying an unknown or already destroyed
/// handle is a no-op.
pub trait Surface: Send + Sync {
    fn bounds(&self) -> Bounds;

    fn create(&self, visual: Visual, at: Point) -> HandleId;

    fn restyle(&self, handle: HandleId, style: Style);

    fn animate(&self, handle: HandleId, tween: Tween);

    fn destroy(&self, handle: HandleId);

    /// Makes `handle` deliver activations to the session.
    fn bind_input(&self, handle: HandleId);

    fn play_audio(&self, key: &str);

    fn stop_audio(&self);
}
