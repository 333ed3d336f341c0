//! Headless surface that records every call.
//!
//! Used by the test suite and by the headless client. It keeps the set of
//! live handles so leaks and double releases are observable.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Bounds, HandleId, Point, Style, Surface, Tween, Visual};

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    Create {
        handle: HandleId,
        visual: Visual,
        at: Point,
    },
    Restyle {
        handle: HandleId,
        style: Style,
    },
    Animate {
        handle: HandleId,
        tween: Tween,
    },
    Destroy {
        handle: HandleId,
    },
    BindInput {
        handle: HandleId,
    },
    PlayAudio {
        key: String,
    },
    StopAudio,
}

#[derive(Debug, Default)]
struct RecordingState {
    next_id: u64,
    live: BTreeMap<HandleId, Visual>,
    interactive: BTreeSet<HandleId>,
    ops: Vec<SurfaceOp>,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    bounds: Bounds,
    state: Mutex<RecordingState>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: Bounds) -> Self {
        Self {
            bounds,
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every call so far, in order.
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.state().ops.clone()
    }

    pub fn live_count(&self) -> usize {
        self.state().live.len()
    }

    pub fn is_live(&self, handle: HandleId) -> bool {
        self.state().live.contains_key(&handle)
    }

    pub fn visual(&self, handle: HandleId) -> Option<Visual> {
        self.state().live.get(&handle).cloned()
    }

    /// Live handles whose visual matches `predicate`.
    pub fn live_matching(&self, predicate: impl Fn(&Visual) -> bool) -> Vec<HandleId> {
        self.state()
            .live
            .iter()
            .filter(|(_, visual)| predicate(visual))
            .map(|(handle, _)| *handle)
            .collect()
    }

    /// Whether `handle` is live and bound for input.
    pub fn is_interactive(&self, handle: HandleId) -> bool {
        let state = self.state();
        state.live.contains_key(&handle) && state.interactive.contains(&handle)
    }

    /// Audio keys passed to `play_audio`, in order.
    pub fn audio_log(&self) -> Vec<String> {
        self.state()
            .ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::PlayAudio { key } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&self) {
        self.state().ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn create(&self, visual: Visual, at: Point) -> HandleId {
        let mut state = self.state();
        state.next_id += 1;
        let handle = HandleId(state.next_id);

        state.live.insert(handle, visual.clone());
        state.ops.push(SurfaceOp::Create { handle, visual, at });
        handle
    }

    fn restyle(&self, handle: HandleId, style: Style) {
        let mut state = self.state();
        if let Some(Visual::Indicator { filled }) = state.live.get_mut(&handle) {
            match style {
                Style::Filled => *filled = true,
                Style::Empty => *filled = false,
                _ => {}
            }
        }
        state.ops.push(SurfaceOp::Restyle { handle, style });
    }

    fn animate(&self, handle: HandleId, tween: Tween) {
        self.state().ops.push(SurfaceOp::Animate { handle, tween });
    }

    fn destroy(&self, handle: HandleId) {
        let mut state = self.state();
        if state.live.remove(&handle).is_none() {
            tracing::trace!(%handle, "destroy of unknown handle ignored");
            return;
        }
        state.interactive.remove(&handle);
        state.ops.push(SurfaceOp::Destroy { handle });
    }

    fn bind_input(&self, handle: HandleId) {
        let mut state = self.state();
        state.interactive.insert(handle);
        state.ops.push(SurfaceOp::BindInput { handle });
    }

    fn play_audio(&self, key: &str) {
        tracing::debug!(key, "play audio");
        self.state().ops.push(SurfaceOp::PlayAudio {
            key: key.to_owned(),
        });
    }

    fn stop_audio(&self) {
        self.state().ops.push(SurfaceOp::StopAudio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::TextRole;

    #[test]
    fn tracks_live_handles_and_ignores_double_destroy() {
        let surface = RecordingSurface::new();
        let text = surface.create(Visual::text("KATT", TextRole::Prompt), Point::default());
        let region = surface.create(Visual::region("🐱"), Point::default());
        surface.bind_input(region);

        assert!(surface.is_interactive(region));
        surface.destroy(region);
        surface.destroy(region);

        assert!(surface.is_live(text));
        assert!(!surface.is_interactive(region));
        let destroys = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::Destroy { .. }))
            .count();
        assert_eq!(destroys, 1);
    }

    #[test]
    fn indicator_restyle_updates_fill() {
        let surface = RecordingSurface::new();
        let dot = surface.create(Visual::Indicator { filled: false }, Point::default());

        surface.restyle(dot, Style::Filled);
        assert_eq!(surface.visual(dot), Some(Visual::Indicator { filled: true }));
    }
}
