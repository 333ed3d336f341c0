//! Ownership helpers for surface handles.

use super::{HandleId, Point, Surface, Visual};

/// Handles owned by a mode instance, released together on cleanup.
#[derive(Debug, Default)]
pub struct HandleSet {
    handles: Vec<HandleId>,
}

impl HandleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, surface: &dyn Surface, visual: Visual, at: Point) -> HandleId {
        let handle = surface.create(visual, at);
        self.handles.push(handle);
        handle
    }

    pub fn contains(&self, handle: HandleId) -> bool {
        self.handles.contains(&handle)
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Destroys every handle, newest first. Returns how many were released.
    pub fn release_all(&mut self, surface: &dyn Surface) -> usize {
        let released = self.handles.len();
        for handle in self.handles.drain(..).rev() {
            surface.destroy(handle);
        }
        released
    }
}

/// Handles owned by one reward stage.
///
/// Everything created through the guard is destroyed when it goes out of
/// scope, including when the owning future is dropped mid-stage.
pub struct ScopedHandles<'s> {
    surface: &'s dyn Surface,
    handles: HandleSet,
}

impl<'s> ScopedHandles<'s> {
    pub fn new(surface: &'s dyn Surface) -> Self {
        Self {
            surface,
            handles: HandleSet::new(),
        }
    }

    pub fn create(&mut self, visual: Visual, at: Point) -> HandleId {
        self.handles.create(self.surface, visual, at)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for ScopedHandles<'_> {
    fn drop(&mut self) {
        self.handles.release_all(self.surface);
    }
}
