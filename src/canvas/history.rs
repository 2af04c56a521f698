use std::collections::VecDeque;

use eframe::egui::Color32;

use crate::canvas::surface::Surface;

/// How many snapshots the undo stack retains before evicting the oldest.
pub const MAX_SNAPSHOTS: usize = 20;

/// Immutable full copy of the surface at a point in time. Dimensions are
/// part of the snapshot because crop and resize change them.
pub struct Snapshot {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

impl Snapshot {
    fn of(surface: &Surface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            pixels: surface.pixels().to_vec(),
        }
    }

    fn restore(self, surface: &mut Surface) {
        surface.replace(self.width, self.height, self.pixels);
    }
}

/// Bounded snapshot-based undo/redo over the surface.
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Capture the surface before a mutating action. Evicts the oldest
    /// snapshot beyond the bound and invalidates everything redoable.
    pub fn record(&mut self, surface: &Surface) {
        if self.undo_stack.len() == MAX_SNAPSHOTS {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(Snapshot::of(surface));
        self.redo_stack.clear();
    }

    /// Restore the most recent snapshot. Returns false (and touches nothing)
    /// when there is nothing to undo.
    pub fn undo(&mut self, surface: &mut Surface) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(Snapshot::of(surface));
        snapshot.restore(surface);
        true
    }

    /// Symmetric counterpart of `undo`.
    pub fn redo(&mut self, surface: &mut Surface) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push_back(Snapshot::of(surface));
        snapshot.restore(surface);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
}
